//! Domain layer: Core types and rules.
//!
//! This module contains pure Rust types with no I/O. The category registry
//! is validated once at construction and read-only afterwards.

mod category;
mod diagnosis;
mod features;
mod input;
mod report;

pub use category::{CategoryDefinition, CategoryRegistry, RegistryError, Urgency};
pub use diagnosis::{EnsembleResult, ModelOutcome, ModelPrediction, RiskLevel};
pub use features::{FeatureVector, ReadingPolicy, DEFAULT_READINGS, FEATURE_COUNT, FEATURE_NAMES};
pub use input::{FaceMetrics, HealthInput, SymptomFlags, SymptomReport};
pub use report::{CategoryScore, Priority, PredictionReport, Recommendation};
