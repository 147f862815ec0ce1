//! Prediction use case: the single entry point of the core.

use std::sync::Arc;

use super::analyzer::analyze;
use super::context::{Catalog, InferenceContext};
use super::ensemble::predict_all;
use super::recommendations::synthesize;
use crate::domain::{FeatureVector, HealthInput, PredictionReport, RiskLevel};
use crate::MedivueError;

/// Runs the full pipeline against a shared, immutable context.
#[derive(Debug, Clone)]
pub struct PredictionService {
    context: Arc<InferenceContext>,
}

impl PredictionService {
    #[must_use]
    pub fn new(context: Arc<InferenceContext>) -> Self {
        Self { context }
    }

    #[must_use]
    pub fn context(&self) -> &InferenceContext {
        &self.context
    }

    #[must_use]
    pub fn catalog(&self) -> Catalog {
        self.context.catalog()
    }

    /// Produce the ensemble verdict and category analysis for one input.
    ///
    /// # Errors
    /// Returns `MedivueError::Computation` if the shared normalizer fails.
    /// Individual model failures are reported inside the result instead.
    pub fn predict(&self, input: &HealthInput) -> Result<PredictionReport, MedivueError> {
        let ctx = &self.context;
        tracing::debug!(
            raw_text_len = input.symptoms.raw_text.len(),
            "Running prediction"
        );

        // Step 1: feature extraction
        let vector = FeatureVector::extract(input, ctx.reading_policy());
        tracing::debug!("Extracted features, symptom_count={}", vector.symptom_count());

        // Step 2: ensemble
        let ensemble = predict_all(ctx.normalizer(), ctx.models(), &vector)?;
        let risk = RiskLevel::from_probability(ensemble.aggregate_probability());

        // Step 3: categories (independent of the vector)
        let category_analysis = analyze(
            ctx.registry(),
            &input.symptoms.merged(),
            &input.symptoms.raw_text,
        );
        tracing::debug!("Matched {} categories", category_analysis.len());

        // Step 4: recommendations
        let recommendations = synthesize(&category_analysis, risk);

        tracing::info!(
            probability = ensemble.aggregate_probability(),
            risk = %risk,
            categories = category_analysis.len(),
            "Prediction complete"
        );

        Ok(PredictionReport {
            ensemble,
            risk,
            category_analysis,
            recommendations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::models::StandardScaler;
    use crate::config::EngineConfig;
    use crate::domain::{CategoryRegistry, Priority, ReadingPolicy, SymptomFlags, FEATURE_COUNT};
    use crate::ports::{BinaryClassifier, ClassifierError, ClassifierOutput, ScaledFeatures};
    use std::sync::OnceLock;

    /// Probability moves linearly with the first scaled feature.
    struct HeartRateProbe;

    impl BinaryClassifier for HeartRateProbe {
        fn name(&self) -> &str {
            "probe"
        }

        fn predict(&self, x: &ScaledFeatures) -> Result<ClassifierOutput, ClassifierError> {
            let p = (0.5 + x[0] / 2.0).clamp(0.0, 1.0);
            Ok(ClassifierOutput::with_probability(u8::from(p > 0.5), p))
        }
    }

    fn stub_service(policy: ReadingPolicy) -> PredictionService {
        // heart_rate 72 maps to 0.5, 172 to 1.0
        let mut mean = [0.0; FEATURE_COUNT];
        let mut scale = [1.0; FEATURE_COUNT];
        mean[0] = 72.0;
        scale[0] = 100.0;
        let context = InferenceContext::new(
            CategoryRegistry::standard().expect("Registry"),
            Box::new(StandardScaler::from_parts(mean, scale)),
            vec![Box::new(HeartRateProbe)],
            policy,
        )
        .expect("Context");
        PredictionService::new(Arc::new(context))
    }

    fn trained_service() -> &'static PredictionService {
        static SERVICE: OnceLock<PredictionService> = OnceLock::new();
        SERVICE.get_or_init(|| {
            let context = InferenceContext::initialize(&EngineConfig::default()).expect("Initialize");
            PredictionService::new(Arc::new(context))
        })
    }

    fn input_with_heart_rate(hr: f64) -> HealthInput {
        let mut input = HealthInput::default();
        input.face_metrics.set("heart_rate", hr);
        input
    }

    #[test]
    fn test_empty_input_yields_fallback_recommendation() {
        let report = stub_service(ReadingPolicy::Legacy)
            .predict(&HealthInput::default())
            .expect("Predict");

        assert_eq!(report.probability(), 0.5);
        assert!(!report.needs_attention());
        assert_eq!(report.risk, RiskLevel::Moderate);
        assert!(report.category_analysis.is_empty());
        assert_eq!(report.recommendations.len(), 1);
        assert_eq!(report.recommendations[0].priority, Priority::Low);
    }

    #[test]
    fn test_high_reading_is_urgent() {
        let report = stub_service(ReadingPolicy::Legacy)
            .predict(&input_with_heart_rate(172.0))
            .expect("Predict");
        assert_eq!(report.probability(), 1.0);
        assert!(report.needs_attention());
        assert_eq!(report.risk, RiskLevel::High);
        assert_eq!(report.recommendations[0].priority, Priority::Urgent);
    }

    #[test]
    fn test_reading_policy_controls_zero_readings() {
        // Legacy treats 0 bpm as missing (72), strict keeps it.
        let legacy = stub_service(ReadingPolicy::Legacy)
            .predict(&input_with_heart_rate(0.0))
            .expect("Predict");
        let strict = stub_service(ReadingPolicy::Strict)
            .predict(&input_with_heart_rate(0.0))
            .expect("Predict");
        assert_eq!(legacy.probability(), 0.5);
        assert!((strict.probability() - 0.14).abs() < 1e-9);
        assert_eq!(strict.risk, RiskLevel::Low);
    }

    #[test]
    fn test_internal_flag_wins_in_category_analysis() {
        let mut input = HealthInput::default();
        input.symptoms.physical = [("cough", true)].into_iter().collect();
        input.symptoms.internal = [("cough", false)].into_iter().collect::<SymptomFlags>();

        let report = stub_service(ReadingPolicy::Legacy).predict(&input).expect("Predict");
        assert!(report.category_analysis.is_empty());
    }

    #[test]
    fn test_trained_ensemble_reports_six_models() {
        let report = trained_service()
            .predict(&HealthInput::default())
            .expect("Predict");

        let names: Vec<&str> = report.ensemble.predictions().map(|(n, _)| n).collect();
        assert_eq!(
            names,
            ["logistic", "decision_tree", "knn", "naive_bayes", "adaboost", "random_forest"]
        );
        assert_eq!(report.ensemble.failures().count(), 0);
        assert!((0.0..=1.0).contains(&report.probability()));
    }

    #[test]
    fn test_trained_predictions_are_idempotent() {
        let mut input = input_with_heart_rate(128.0);
        input.face_metrics.set("spo2", 91.0);
        input.symptoms.raw_text = "chest pain and a cough".into();
        input.symptoms.internal.insert("chest_pain", true);

        let service = trained_service();
        let first = service.predict(&input).expect("Predict");
        let second = service.predict(&input).expect("Predict");
        assert_eq!(first, second);
    }

    #[test]
    fn test_non_finite_reading_falls_back_per_model() {
        // "inf" is a numeric string, so it survives coercion as a reading.
        let input: HealthInput =
            serde_json::from_value(serde_json::json!({ "face_metrics": { "heart_rate": "inf" } }))
                .expect("Should parse");
        let report = trained_service().predict(&input).expect("Predict");

        assert_eq!(report.ensemble.failures().count(), 6);
        assert_eq!(report.probability(), 0.5);
        assert_eq!(report.risk, RiskLevel::Moderate);
    }
}
