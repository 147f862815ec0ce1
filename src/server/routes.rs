//! Endpoint handlers.

use axum::{body::Bytes, extract::State, Json};
use serde_json::{json, Value};

use super::{ApiError, AppState};
use crate::application::Catalog;
use crate::domain::HealthInput;
use crate::MedivueError;

/// Liveness check.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "models_loaded": state.service.context().models().len(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Model and category names.
pub async fn models(State(state): State<AppState>) -> Json<Catalog> {
    Json(state.service.catalog())
}

/// Decode a request body, rejecting anything without usable content.
fn parse_input(body: &[u8]) -> Result<HealthInput, MedivueError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| MedivueError::InvalidInput(format!("Malformed JSON: {e}")))?;

    match &value {
        Value::Object(map) if !map.is_empty() => {}
        _ => return Err(MedivueError::InvalidInput("No data provided".into())),
    }

    serde_json::from_value(value)
        .map_err(|e| MedivueError::InvalidInput(format!("Invalid health input: {e}")))
}

/// Run the prediction pipeline and wrap the report in the success envelope.
pub async fn predict(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>, ApiError> {
    let input = parse_input(&body)?;
    let report = state.service.predict(&input)?;

    let mut envelope = serde_json::to_value(&report).map_err(MedivueError::from)?;
    if let Value::Object(map) = &mut envelope {
        map.insert("success".into(), Value::Bool(true));
        map.insert(
            "timestamp".into(),
            Value::String(chrono::Utc::now().to_rfc3339()),
        );
    }
    Ok(Json(envelope))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::models::StandardScaler;
    use crate::application::InferenceContext;
    use crate::domain::{CategoryRegistry, ReadingPolicy, FEATURE_COUNT};
    use crate::ports::{BinaryClassifier, ClassifierError, ClassifierOutput, ScaledFeatures};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    struct Constant(f64);

    impl BinaryClassifier for Constant {
        fn name(&self) -> &str {
            "constant"
        }

        fn predict(&self, _: &ScaledFeatures) -> Result<ClassifierOutput, ClassifierError> {
            Ok(ClassifierOutput::with_probability(u8::from(self.0 > 0.5), self.0))
        }
    }

    fn state(probability: f64) -> AppState {
        let context = InferenceContext::new(
            CategoryRegistry::standard().expect("Registry"),
            Box::new(StandardScaler::from_parts([0.0; FEATURE_COUNT], [1.0; FEATURE_COUNT])),
            vec![Box::new(Constant(probability))],
            ReadingPolicy::Legacy,
        )
        .expect("Context");
        AppState::new(context)
    }

    async fn call_predict(body: &'static str) -> (StatusCode, Value) {
        let response = predict(State(state(0.75)), Bytes::from_static(body.as_bytes()))
            .await
            .into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Body");
        (status, serde_json::from_slice(&bytes).expect("JSON body"))
    }

    #[tokio::test]
    async fn test_predict_success_envelope() {
        let (status, json) = call_predict(
            r#"{"symptoms": {"physical": {"cough": true}, "raw_text": "chest pain and cough"}}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert!(json["timestamp"].is_string());
        assert_eq!(json["ensemble"]["probability"], 0.75);
        assert_eq!(json["ensemble"]["risk"]["level"], "High");
        assert_eq!(json["category_analysis"][0]["category"], "respiratory");
        assert_eq!(json["category_analysis"][0]["score"], 3);
        assert_eq!(json["category_analysis"][1]["category"], "cardiac");
        assert_eq!(json["recommendations"][0]["priority"], "urgent");
    }

    #[tokio::test]
    async fn test_predict_rejects_missing_data() {
        for body in ["null", "{}", "[1, 2]", "\"text\"", "{not json", ""] {
            let (status, json) = call_predict(body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
            assert_eq!(json["success"], false);
            assert!(json["error"].is_string());
        }
    }

    #[tokio::test]
    async fn test_predict_rejects_wrongly_typed_sections() {
        let (status, _) = call_predict(r#"{"symptoms": "coughing"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_fields_are_accepted() {
        let (status, json) = call_predict(r#"{"documents": {"files": []}}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["recommendations"][0]["priority"], "urgent");
    }

    #[tokio::test]
    async fn test_health_and_models() {
        let Json(health) = health(State(state(0.2))).await;
        assert_eq!(health["status"], "ok");
        assert_eq!(health["models_loaded"], 1);

        let Json(catalog) = models(State(state(0.2))).await;
        assert_eq!(catalog.models, vec!["constant".to_string()]);
        assert_eq!(catalog.disease_categories.len(), 10);
    }
}
