//! k-nearest-neighbours vote over the stored training set.

use super::dataset::TrainingSet;
use crate::ports::{ensure_finite, BinaryClassifier, ClassifierError, ClassifierOutput, ScaledFeatures};

#[derive(Debug, Clone)]
pub struct KNearestNeighbors {
    k: usize,
    data: TrainingSet,
}

impl KNearestNeighbors {
    pub const NAME: &'static str = "knn";
    pub const DEFAULT_K: usize = 5;

    /// # Errors
    /// Returns `ClassifierError::Training` if `k` is zero or exceeds the
    /// number of samples.
    pub fn fit(data: &TrainingSet, k: usize) -> Result<Self, ClassifierError> {
        if k == 0 || k > data.len() {
            return Err(ClassifierError::Training(format!(
                "k={k} is invalid for {} samples",
                data.len()
            )));
        }
        Ok(Self {
            k,
            data: data.clone(),
        })
    }

    /// Fraction of positives among the `k` closest samples (Euclidean).
    /// Equal distances are broken by training order.
    fn positive_fraction(&self, x: &ScaledFeatures) -> f64 {
        let mut distances: Vec<(f64, usize)> = self
            .data
            .samples()
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let d: f64 = s.iter().zip(x).map(|(a, b)| (a - b).powi(2)).sum();
                (d, i)
            })
            .collect();
        distances.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let labels = self.data.labels();
        let positives = distances
            .iter()
            .take(self.k)
            .filter(|(_, i)| labels[*i] == 1)
            .count();
        positives as f64 / self.k as f64
    }
}

impl BinaryClassifier for KNearestNeighbors {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn predict(&self, features: &ScaledFeatures) -> Result<ClassifierOutput, ClassifierError> {
        ensure_finite(features)?;
        let p = self.positive_fraction(features);
        Ok(ClassifierOutput::with_probability(u8::from(p > 0.5), p))
    }
}
