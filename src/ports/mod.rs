//! Ports layer: Trait definitions for fitted models.
//!
//! Following Hexagonal Architecture, these traits define the boundary between
//! the prediction use case and the concrete model implementations, so tests
//! can substitute stubs for trained models.

mod classifier;

pub use classifier::{
    ensure_finite, BinaryClassifier, ClassifierError, ClassifierOutput, Normalizer, ScaledFeatures,
};
