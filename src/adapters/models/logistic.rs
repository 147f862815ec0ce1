//! L2-regularized logistic regression fitted by full-batch gradient descent.

use super::dataset::TrainingSet;
use super::sigmoid;
use crate::domain::FEATURE_COUNT;
use crate::ports::{ensure_finite, BinaryClassifier, ClassifierError, ClassifierOutput, ScaledFeatures};

/// Training settings.
#[derive(Debug, Clone, Copy)]
pub struct LogisticParams {
    /// Inverse regularization strength
    pub c: f64,
    pub max_iter: usize,
    pub learning_rate: f64,
    /// Stop once every gradient component is below this
    pub tolerance: f64,
}

impl Default for LogisticParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 1000,
            learning_rate: 0.5,
            tolerance: 1e-6,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogisticRegression {
    weights: [f64; FEATURE_COUNT],
    intercept: f64,
}

impl LogisticRegression {
    pub const NAME: &'static str = "logistic";

    /// Minimize `C * sum(log_loss) + 0.5 * |w|^2` (intercept unpenalized).
    ///
    /// # Errors
    /// Returns `ClassifierError::Training` for non-positive `c` or learning rate.
    pub fn fit(data: &TrainingSet, params: LogisticParams) -> Result<Self, ClassifierError> {
        if !(params.c > 0.0 && params.learning_rate > 0.0) {
            return Err(ClassifierError::Training(
                "C and learning rate must be positive".into(),
            ));
        }

        let n = data.len() as f64;
        let mut model = Self {
            weights: [0.0; FEATURE_COUNT],
            intercept: 0.0,
        };

        for iteration in 0..params.max_iter {
            let mut grad_w = [0.0; FEATURE_COUNT];
            let mut grad_b = 0.0;
            for (x, &y) in data.samples().iter().zip(data.labels()) {
                let residual = sigmoid(model.decision(x)) - f64::from(y);
                for (g, xi) in grad_w.iter_mut().zip(x) {
                    *g += residual * xi;
                }
                grad_b += residual;
            }

            for (g, w) in grad_w.iter_mut().zip(&model.weights) {
                *g = (params.c * *g + w) / n;
            }
            grad_b = params.c * grad_b / n;

            let converged = grad_w.iter().all(|g| g.abs() < params.tolerance)
                && grad_b.abs() < params.tolerance;
            if converged {
                tracing::debug!("Logistic regression converged after {} iterations", iteration);
                break;
            }

            for (w, g) in model.weights.iter_mut().zip(&grad_w) {
                *w -= params.learning_rate * g;
            }
            model.intercept -= params.learning_rate * grad_b;
        }

        Ok(model)
    }

    fn decision(&self, x: &ScaledFeatures) -> f64 {
        self.intercept
            + self
                .weights
                .iter()
                .zip(x)
                .map(|(w, xi)| w * xi)
                .sum::<f64>()
    }

    #[must_use]
    pub fn weights(&self) -> &[f64; FEATURE_COUNT] {
        &self.weights
    }
}

impl BinaryClassifier for LogisticRegression {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn predict(&self, features: &ScaledFeatures) -> Result<ClassifierOutput, ClassifierError> {
        ensure_finite(features)?;
        let z = self.decision(features);
        Ok(ClassifierOutput::with_probability(u8::from(z > 0.0), sigmoid(z)))
    }
}
