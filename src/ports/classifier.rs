//! Classifier port: Traits for fitted binary models and feature scaling.
//!
//! Both traits are implemented by models trained once at startup and then
//! shared read-only between concurrent prediction calls.

use crate::domain::{FeatureVector, ModelPrediction, FEATURE_COUNT};

/// Feature vector after normalization.
pub type ScaledFeatures = [f64; FEATURE_COUNT];

/// Errors raised while fitting or evaluating a model.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifierError {
    #[error("Non-finite value in feature {0}")]
    NonFiniteInput(usize),

    #[error("Model produced an invalid probability: {0}")]
    InvalidProbability(f64),

    #[error("Training data rejected: {0}")]
    Training(String),

    #[error("Normalizer statistics unusable for feature {0}")]
    DegenerateNormalizer(usize),
}

/// Raw verdict of one classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierOutput {
    /// Hard label (0 or 1)
    pub label: u8,

    /// Positive-class probability, when the model estimates one natively
    pub probability: Option<f64>,
}

impl ClassifierOutput {
    #[must_use]
    pub fn with_probability(label: u8, probability: f64) -> Self {
        Self {
            label,
            probability: Some(probability),
        }
    }

    #[must_use]
    pub fn label_only(label: u8) -> Self {
        Self {
            label,
            probability: None,
        }
    }

    /// Turn the output into a prediction, using the label as probability
    /// when the model has no native estimate.
    ///
    /// # Errors
    /// Returns `ClassifierError::InvalidProbability` if the estimate is not a
    /// finite value in `[0, 1]`.
    pub fn into_prediction(self) -> Result<ModelPrediction, ClassifierError> {
        let label = u8::from(self.label != 0);
        let probability = self.probability.unwrap_or(f64::from(label));
        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(ClassifierError::InvalidProbability(probability));
        }
        Ok(ModelPrediction {
            prediction: label,
            probability,
        })
    }
}

/// A fitted binary classifier.
pub trait BinaryClassifier: Send + Sync {
    /// Stable model name used in results.
    fn name(&self) -> &str;

    /// Evaluate one normalized feature vector.
    ///
    /// # Errors
    /// Any `ClassifierError`; the caller substitutes a neutral fallback.
    fn predict(&self, features: &ScaledFeatures) -> Result<ClassifierOutput, ClassifierError>;
}

/// Frozen feature scaling shared by every classifier.
pub trait Normalizer: Send + Sync {
    /// Scale a raw feature vector.
    ///
    /// # Errors
    /// Returns an error if the fitted statistics are unusable.
    fn transform(&self, features: &FeatureVector) -> Result<ScaledFeatures, ClassifierError>;
}

/// Reject vectors with NaN or infinite entries.
///
/// # Errors
/// Returns `ClassifierError::NonFiniteInput` with the first offending index.
pub fn ensure_finite(features: &ScaledFeatures) -> Result<(), ClassifierError> {
    match features.iter().position(|v| !v.is_finite()) {
        Some(i) => Err(ClassifierError::NonFiniteInput(i)),
        None => Ok(()),
    }
}
