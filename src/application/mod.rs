//! Application layer: Use cases and services.
//!
//! This module wires domain rules to the fitted models held by the
//! [`InferenceContext`] to implement the prediction use case.

mod analyzer;
mod context;
mod ensemble;
mod prediction;
mod recommendations;

pub use analyzer::analyze;
pub use context::{Catalog, InferenceContext};
pub use ensemble::predict_all;
pub use prediction::PredictionService;
pub use recommendations::synthesize;
