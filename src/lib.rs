//! # MediVue
//!
//! Ensemble health-screening inference over camera-derived physiological
//! metrics and self-reported symptoms.
//!
//! This crate provides:
//! - A six-model "needs attention" ensemble trained once at startup
//! - Rule-based disease category ranking from symptom flags and free text
//! - Risk tiering and recommendation synthesis
//! - A thin HTTP boundary for local deployment
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (health input, features, categories, results)
//! - `ports`: Trait definitions for fitted models and feature scaling
//! - `adapters`: Concrete model implementations, synthetic training data, log sanitization
//! - `application`: The inference context and the prediction use case
//! - `config`: Environment-driven engine settings
//! - `server`: HTTP request handling

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod server;

pub use application::{InferenceContext, PredictionService};
pub use config::EngineConfig;
pub use domain::{HealthInput, PredictionReport, RiskLevel};

/// Result type for MediVue operations
pub type Result<T> = std::result::Result<T, MedivueError>;

/// Main error type for MediVue
#[derive(Debug, thiserror::Error)]
pub enum MedivueError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Computation failed: {0}")]
    Computation(String),

    #[error("Model error: {0}")]
    Model(#[from] ports::ClassifierError),

    #[error("Invalid category registry: {0}")]
    Registry(#[from] domain::RegistryError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MedivueError {
    /// Whether the failure was caused by the caller's payload rather than by
    /// the engine itself.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}
