//! Engine configuration.
//!
//! Overrides are read from the environment on a best-effort basis: a value
//! that does not parse or is out of range is logged and ignored.

use serde::{Deserialize, Serialize};

use crate::adapters::synthetic::{DEFAULT_SAMPLES, DEFAULT_SEED};
use crate::domain::ReadingPolicy;

/// Smallest synthetic training set accepted.
pub const MIN_TRAINING_SAMPLES: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Treatment of zero metric readings (`MEDIVUE_READING_POLICY`)
    pub reading_policy: ReadingPolicy,
    /// Seed for data generation and the random forest (`MEDIVUE_TRAINING_SEED`)
    pub training_seed: u64,
    /// Synthetic rows drawn at startup (`MEDIVUE_TRAINING_SAMPLES`)
    pub training_samples: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reading_policy: ReadingPolicy::Legacy,
            training_seed: DEFAULT_SEED,
            training_samples: DEFAULT_SAMPLES,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn from_env_or_default() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(v) = lookup("MEDIVUE_READING_POLICY") {
            match v.parse::<ReadingPolicy>() {
                Ok(policy) => cfg.reading_policy = policy,
                Err(e) => tracing::warn!("Ignoring MEDIVUE_READING_POLICY: {}", e),
            }
        }

        if let Some(v) = lookup("MEDIVUE_TRAINING_SEED") {
            match v.trim().parse::<u64>() {
                Ok(seed) => cfg.training_seed = seed,
                Err(e) => tracing::warn!("Ignoring MEDIVUE_TRAINING_SEED: {}", e),
            }
        }

        if let Some(v) = lookup("MEDIVUE_TRAINING_SAMPLES") {
            match v.trim().parse::<usize>() {
                Ok(n) if n >= MIN_TRAINING_SAMPLES => cfg.training_samples = n,
                Ok(n) => tracing::warn!(
                    "Ignoring MEDIVUE_TRAINING_SAMPLES={}: minimum is {}",
                    n,
                    MIN_TRAINING_SAMPLES
                ),
                Err(e) => tracing::warn!("Ignoring MEDIVUE_TRAINING_SAMPLES: {}", e),
            }
        }

        cfg
    }
}
