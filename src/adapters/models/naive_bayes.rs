//! Gaussian naive Bayes.

use super::dataset::{moments, TrainingSet};
use crate::domain::FEATURE_COUNT;
use crate::ports::{ensure_finite, BinaryClassifier, ClassifierError, ClassifierOutput, ScaledFeatures};

/// Variance floor as a fraction of the largest feature variance.
const VAR_SMOOTHING: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
struct ClassStats {
    log_prior: f64,
    mean: [f64; FEATURE_COUNT],
    var: [f64; FEATURE_COUNT],
}

impl ClassStats {
    fn joint_log_likelihood(&self, x: &ScaledFeatures) -> f64 {
        let mut ll = self.log_prior;
        for i in 0..FEATURE_COUNT {
            let var = self.var[i];
            ll -= 0.5 * (2.0 * std::f64::consts::PI * var).ln();
            ll -= (x[i] - self.mean[i]).powi(2) / (2.0 * var);
        }
        ll
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GaussianNaiveBayes {
    negative: ClassStats,
    positive: ClassStats,
}

impl GaussianNaiveBayes {
    pub const NAME: &'static str = "naive_bayes";

    /// # Errors
    /// Returns `ClassifierError::Training` if every feature has zero variance.
    pub fn fit(data: &TrainingSet) -> Result<Self, ClassifierError> {
        let (_, overall_var) = data.moments();
        let max_var = overall_var.iter().copied().fold(0.0, f64::max);
        let epsilon = VAR_SMOOTHING * max_var;
        if epsilon <= 0.0 {
            return Err(ClassifierError::Training("all features are constant".into()));
        }

        let n = data.len() as f64;
        let class_stats = |label: u8| {
            let rows = data
                .samples()
                .iter()
                .zip(data.labels())
                .filter(move |(_, y)| **y == label)
                .map(|(x, _)| x);
            let count = rows.clone().count() as f64;
            let (mean, mut var) = moments(rows);
            for v in &mut var {
                *v += epsilon;
            }
            ClassStats {
                log_prior: (count / n).ln(),
                mean,
                var,
            }
        };

        Ok(Self {
            negative: class_stats(0),
            positive: class_stats(1),
        })
    }

    /// Normalized posterior of the positive class via log-sum-exp.
    fn positive_posterior(&self, x: &ScaledFeatures) -> f64 {
        let neg = self.negative.joint_log_likelihood(x);
        let pos = self.positive.joint_log_likelihood(x);
        let max = neg.max(pos);
        let log_norm = max + ((neg - max).exp() + (pos - max).exp()).ln();
        (pos - log_norm).exp()
    }
}

impl BinaryClassifier for GaussianNaiveBayes {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn predict(&self, features: &ScaledFeatures) -> Result<ClassifierOutput, ClassifierError> {
        ensure_finite(features)?;
        let p = self.positive_posterior(features);
        if !p.is_finite() {
            return Err(ClassifierError::InvalidProbability(p));
        }
        Ok(ClassifierOutput::with_probability(u8::from(p > 0.5), p))
    }
}
