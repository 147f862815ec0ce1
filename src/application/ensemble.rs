//! Ensemble predictor: run every model on one vector and aggregate.

use crate::domain::{EnsembleResult, FeatureVector, ModelOutcome};
use crate::ports::{BinaryClassifier, Normalizer};
use crate::MedivueError;

/// Scale `vector` once, evaluate each model and average the probabilities.
///
/// A model that fails contributes the neutral fallback and is reported as a
/// failure; the remaining models still run.
///
/// # Errors
/// Returns `MedivueError::Computation` if the shared normalizer cannot scale
/// the vector.
pub fn predict_all(
    normalizer: &dyn Normalizer,
    models: &[Box<dyn BinaryClassifier>],
    vector: &FeatureVector,
) -> Result<EnsembleResult, MedivueError> {
    let scaled = normalizer
        .transform(vector)
        .map_err(|e| MedivueError::Computation(format!("feature scaling failed: {e}")))?;

    let outcomes = models
        .iter()
        .map(|model| {
            let name = model.name().to_string();
            let outcome = match model.predict(&scaled).and_then(|out| out.into_prediction()) {
                Ok(prediction) => ModelOutcome::Success(prediction),
                Err(e) => {
                    tracing::warn!(model = %name, reason = %e, "Model failed; using fallback");
                    ModelOutcome::Failure {
                        reason: e.to_string(),
                    }
                }
            };
            (name, outcome)
        })
        .collect();

    let result = EnsembleResult::from_outcomes(outcomes);
    tracing::debug!(
        "Ensemble probability {:.4} over {} models",
        result.aggregate_probability(),
        models.len()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::models::StandardScaler;
    use crate::domain::{ModelPrediction, FEATURE_COUNT};
    use crate::ports::{ClassifierError, ClassifierOutput, ScaledFeatures};
    use proptest::prelude::*;

    /// Returns a fixed output, or an error when `output` is `None`.
    struct Fixed {
        name: &'static str,
        output: Option<ClassifierOutput>,
    }

    impl BinaryClassifier for Fixed {
        fn name(&self) -> &str {
            self.name
        }

        fn predict(&self, _: &ScaledFeatures) -> Result<ClassifierOutput, ClassifierError> {
            self.output
                .ok_or_else(|| ClassifierError::Training("stub failure".into()))
        }
    }

    fn fixed(name: &'static str, output: Option<ClassifierOutput>) -> Box<dyn BinaryClassifier> {
        Box::new(Fixed { name, output })
    }

    fn identity() -> StandardScaler {
        StandardScaler::from_parts([0.0; FEATURE_COUNT], [1.0; FEATURE_COUNT])
    }

    #[test]
    fn test_failure_is_isolated_and_averaged_as_half() {
        let models = vec![
            fixed("a", Some(ClassifierOutput::with_probability(1, 0.75))),
            fixed("b", None),
            fixed("c", Some(ClassifierOutput::with_probability(0, 0.25))),
        ];
        let result = predict_all(&identity(), &models, &FeatureVector([1.0; FEATURE_COUNT]))
            .expect("Should aggregate");

        assert_eq!(result.aggregate_probability(), 0.5);
        assert!(!result.needs_attention());
        let failures: Vec<_> = result.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "b");
        assert_eq!(result.outcomes()[1].1.effective(), ModelPrediction::FALLBACK);
    }

    #[test]
    fn test_label_only_model_uses_label_as_probability() {
        let models = vec![fixed("hard", Some(ClassifierOutput::label_only(1)))];
        let result = predict_all(&identity(), &models, &FeatureVector([0.0; FEATURE_COUNT]))
            .expect("Should aggregate");
        assert_eq!(result.aggregate_probability(), 1.0);
        assert!(result.needs_attention());
    }

    #[test]
    fn test_invalid_probability_becomes_failure() {
        let models = vec![fixed("bad", Some(ClassifierOutput::with_probability(1, 2.0)))];
        let result = predict_all(&identity(), &models, &FeatureVector([0.0; FEATURE_COUNT]))
            .expect("Should aggregate");
        assert_eq!(result.aggregate_probability(), 0.5);
        assert_eq!(result.failures().count(), 1);
    }

    #[test]
    fn test_degenerate_normalizer_is_computation_error() {
        let scaler = StandardScaler::from_parts([f64::NAN; FEATURE_COUNT], [1.0; FEATURE_COUNT]);
        let models = vec![fixed("a", Some(ClassifierOutput::label_only(0)))];
        let err = predict_all(&scaler, &models, &FeatureVector([0.0; FEATURE_COUNT]))
            .expect_err("Should fail");
        assert!(matches!(err, MedivueError::Computation(_)));
        assert!(!err.is_client_error());
    }

    proptest! {
        #[test]
        fn prop_aggregate_is_mean_in_unit_interval(
            probs in proptest::collection::vec(proptest::option::of(0.0f64..=1.0), 1..8)
        ) {
            let models: Vec<Box<dyn BinaryClassifier>> = probs
                .iter()
                .map(|p| fixed("m", p.map(|p| ClassifierOutput::with_probability(u8::from(p > 0.5), p))))
                .collect();
            let result = predict_all(&identity(), &models, &FeatureVector([0.0; FEATURE_COUNT]))
                .expect("Should aggregate");

            let expected = probs.iter().map(|p| p.unwrap_or(0.5)).sum::<f64>() / probs.len() as f64;
            let aggregate = result.aggregate_probability();
            prop_assert!((0.0..=1.0).contains(&aggregate));
            prop_assert!((aggregate - expected).abs() < 1e-12);
            prop_assert_eq!(result.needs_attention(), aggregate > 0.5);
        }
    }
}
