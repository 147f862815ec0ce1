//! Immutable inference context.
//!
//! Built once at startup and handed to every prediction call by reference.
//! Nothing in it is mutated afterwards, so concurrent callers need no locks.

use crate::adapters::{models, synthetic};
use crate::config::EngineConfig;
use crate::domain::{CategoryRegistry, ReadingPolicy};
use crate::ports::{BinaryClassifier, Normalizer};
use crate::MedivueError;

/// Registry, shared scaler and fitted models.
pub struct InferenceContext {
    registry: CategoryRegistry,
    normalizer: Box<dyn Normalizer>,
    models: Vec<Box<dyn BinaryClassifier>>,
    reading_policy: ReadingPolicy,
}

/// Read-only listing of what the context can evaluate.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Catalog {
    pub models: Vec<String>,
    pub disease_categories: Vec<&'static str>,
}

impl InferenceContext {
    /// Assemble a context from already-fitted parts.
    ///
    /// # Errors
    /// Returns `MedivueError::Config` if `models` is empty.
    pub fn new(
        registry: CategoryRegistry,
        normalizer: Box<dyn Normalizer>,
        models: Vec<Box<dyn BinaryClassifier>>,
        reading_policy: ReadingPolicy,
    ) -> Result<Self, MedivueError> {
        if models.is_empty() {
            return Err(MedivueError::Config(
                "inference context needs at least one model".into(),
            ));
        }
        Ok(Self {
            registry,
            normalizer,
            models,
            reading_policy,
        })
    }

    /// Generate the synthetic training set, fit the shared scaler and train
    /// the full ensemble.
    ///
    /// # Errors
    /// Returns an error if the registry is invalid or training fails.
    pub fn initialize(config: &EngineConfig) -> Result<Self, MedivueError> {
        tracing::info!(
            "Training ensemble on {} synthetic samples (seed {})",
            config.training_samples,
            config.training_seed
        );

        let registry = CategoryRegistry::standard()?;
        let raw = synthetic::generate(config.training_seed, config.training_samples)?;
        let scaler = models::StandardScaler::fit(&raw);
        let scaled = raw.map_samples(|x| scaler.apply(x));
        let trained = models::train_ensemble(&scaled, config.training_seed)?;

        let context = Self::new(registry, Box::new(scaler), trained, config.reading_policy)?;
        tracing::info!(
            "Inference context ready: {} models, {} categories",
            context.models.len(),
            context.registry.len()
        );
        Ok(context)
    }

    #[must_use]
    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    #[must_use]
    pub fn normalizer(&self) -> &dyn Normalizer {
        self.normalizer.as_ref()
    }

    #[must_use]
    pub fn models(&self) -> &[Box<dyn BinaryClassifier>] {
        &self.models
    }

    #[must_use]
    pub fn reading_policy(&self) -> ReadingPolicy {
        self.reading_policy
    }

    #[must_use]
    pub fn model_names(&self) -> Vec<String> {
        self.models.iter().map(|m| m.name().to_string()).collect()
    }

    #[must_use]
    pub fn catalog(&self) -> Catalog {
        Catalog {
            models: self.model_names(),
            disease_categories: self.registry.names(),
        }
    }
}

impl std::fmt::Debug for InferenceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceContext")
            .field("models", &self.model_names())
            .field("categories", &self.registry.len())
            .field("reading_policy", &self.reading_policy)
            .finish_non_exhaustive()
    }
}
