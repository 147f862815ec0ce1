//! Adapters layer: Concrete implementations of ports.
//!
//! - `models`: from-scratch classifiers and the shared scaler
//! - `synthetic`: seeded training data for startup fitting
//! - `sanitize`: redaction for log output

pub mod models;
pub mod sanitize;
pub mod synthetic;
