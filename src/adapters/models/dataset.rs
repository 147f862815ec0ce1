//! Labeled training data shared by every model.

use crate::domain::FEATURE_COUNT;
use crate::ports::{ClassifierError, ScaledFeatures};

/// Row-major samples with binary labels.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSet {
    samples: Vec<ScaledFeatures>,
    labels: Vec<u8>,
}

impl TrainingSet {
    /// Validate and wrap a dataset.
    ///
    /// # Errors
    /// Returns `ClassifierError::Training` if the lengths differ, a label is
    /// not 0/1, a value is not finite, or one of the classes is missing.
    pub fn new(samples: Vec<ScaledFeatures>, labels: Vec<u8>) -> Result<Self, ClassifierError> {
        if samples.len() != labels.len() {
            return Err(ClassifierError::Training(format!(
                "{} samples but {} labels",
                samples.len(),
                labels.len()
            )));
        }
        if labels.iter().any(|&y| y > 1) {
            return Err(ClassifierError::Training("labels must be 0 or 1".into()));
        }
        if samples.iter().flatten().any(|v| !v.is_finite()) {
            return Err(ClassifierError::Training("non-finite feature value".into()));
        }

        let set = Self { samples, labels };
        let positives = set.positives();
        if positives == 0 || positives == set.len() {
            return Err(ClassifierError::Training(
                "both classes must be present".into(),
            ));
        }
        Ok(set)
    }

    #[must_use]
    pub fn samples(&self) -> &[ScaledFeatures] {
        &self.samples
    }

    #[must_use]
    pub fn labels(&self) -> &[u8] {
        &self.labels
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn positives(&self) -> usize {
        self.labels.iter().filter(|&&y| y == 1).count()
    }

    /// Same labels, every sample passed through `f`.
    #[must_use]
    pub fn map_samples<F>(&self, f: F) -> Self
    where
        F: Fn(&ScaledFeatures) -> ScaledFeatures,
    {
        Self {
            samples: self.samples.iter().map(f).collect(),
            labels: self.labels.clone(),
        }
    }

    /// Per-feature mean and population variance.
    #[must_use]
    pub fn moments(&self) -> ([f64; FEATURE_COUNT], [f64; FEATURE_COUNT]) {
        moments(self.samples.iter())
    }
}

/// Mean and population variance of a set of rows.
pub(crate) fn moments<'a, I>(rows: I) -> ([f64; FEATURE_COUNT], [f64; FEATURE_COUNT])
where
    I: Iterator<Item = &'a ScaledFeatures> + Clone,
{
    let mut mean = [0.0; FEATURE_COUNT];
    let mut var = [0.0; FEATURE_COUNT];
    let n = rows.clone().count();
    if n == 0 {
        return (mean, var);
    }

    for row in rows.clone() {
        for (m, x) in mean.iter_mut().zip(row) {
            *m += x;
        }
    }
    for m in &mut mean {
        *m /= n as f64;
    }
    for row in rows {
        for ((v, m), x) in var.iter_mut().zip(&mean).zip(row) {
            *v += (x - m).powi(2);
        }
    }
    for v in &mut var {
        *v /= n as f64;
    }
    (mean, var)
}
