//! Shared handler state.

use std::sync::Arc;

use crate::application::{InferenceContext, PredictionService};

/// Cheap to clone; the context behind it is immutable.
#[derive(Debug, Clone)]
pub struct AppState {
    pub service: PredictionService,
}

impl AppState {
    #[must_use]
    pub fn new(context: InferenceContext) -> Self {
        Self {
            service: PredictionService::new(Arc::new(context)),
        }
    }
}
