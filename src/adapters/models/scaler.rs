//! Standard (z-score) scaler shared by all models.

use super::dataset::TrainingSet;
use crate::domain::{FeatureVector, FEATURE_COUNT};
use crate::ports::{ClassifierError, Normalizer, ScaledFeatures};

/// Per-feature mean and standard deviation frozen at fit time.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: [f64; FEATURE_COUNT],
    scale: [f64; FEATURE_COUNT],
}

impl StandardScaler {
    /// Fit on a dataset. Constant features get a unit scale.
    #[must_use]
    pub fn fit(data: &TrainingSet) -> Self {
        let (mean, var) = data.moments();
        let mut scale = [1.0; FEATURE_COUNT];
        for (s, v) in scale.iter_mut().zip(var) {
            let std = v.sqrt();
            if std > 0.0 {
                *s = std;
            }
        }
        Self { mean, scale }
    }

    /// Build from explicit statistics.
    #[must_use]
    pub fn from_parts(mean: [f64; FEATURE_COUNT], scale: [f64; FEATURE_COUNT]) -> Self {
        Self { mean, scale }
    }

    #[must_use]
    pub fn mean(&self) -> &[f64; FEATURE_COUNT] {
        &self.mean
    }

    #[must_use]
    pub fn scale(&self) -> &[f64; FEATURE_COUNT] {
        &self.scale
    }

    /// Scale one row without validating the statistics.
    #[must_use]
    pub fn apply(&self, row: &ScaledFeatures) -> ScaledFeatures {
        let mut out = [0.0; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            out[i] = (row[i] - self.mean[i]) / self.scale[i];
        }
        out
    }
}

impl Normalizer for StandardScaler {
    fn transform(&self, features: &FeatureVector) -> Result<ScaledFeatures, ClassifierError> {
        for i in 0..FEATURE_COUNT {
            let usable = self.mean[i].is_finite() && self.scale[i].is_finite() && self.scale[i] > 0.0;
            if !usable {
                return Err(ClassifierError::DegenerateNormalizer(i));
            }
        }
        Ok(self.apply(features.as_array()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_and_transform() {
        let data = TrainingSet::new(
            vec![[1.0; FEATURE_COUNT], [3.0; FEATURE_COUNT]],
            vec![0, 1],
        )
        .expect("Valid");
        let scaler = StandardScaler::fit(&data);

        let scaled = scaler
            .transform(&FeatureVector([3.0; FEATURE_COUNT]))
            .expect("Should scale");
        assert_eq!(scaled, [1.0; FEATURE_COUNT]);
    }

    #[test]
    fn test_constant_feature_gets_unit_scale() {
        let mut a = [0.0; FEATURE_COUNT];
        let mut b = [0.0; FEATURE_COUNT];
        a[0] = -1.0;
        b[0] = 1.0;
        let data = TrainingSet::new(vec![a, b], vec![0, 1]).expect("Valid");
        let scaler = StandardScaler::fit(&data);
        assert_eq!(scaler.scale()[1], 1.0);
    }

    #[test]
    fn test_degenerate_statistics_are_rejected() {
        let mut scale = [1.0; FEATURE_COUNT];
        scale[2] = 0.0;
        let scaler = StandardScaler::from_parts([0.0; FEATURE_COUNT], scale);
        assert_eq!(
            scaler.transform(&FeatureVector([1.0; FEATURE_COUNT])),
            Err(ClassifierError::DegenerateNormalizer(2))
        );
    }
}
