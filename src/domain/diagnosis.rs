//! Ensemble prediction and risk tier types.

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};

/// Risk tier derived from the ensemble probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    /// Below 0.3
    Low,
    /// From 0.3 up to (excluding) 0.6
    Moderate,
    /// 0.6 and above
    High,
}

impl RiskLevel {
    /// Classify an ensemble probability.
    #[must_use]
    pub fn from_probability(probability: f64) -> Self {
        if probability < 0.3 {
            Self::Low
        } else if probability < 0.6 {
            Self::Moderate
        } else {
            Self::High
        }
    }

    /// Get a human-readable description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Low => "No immediate concerns",
            Self::Moderate => "Monitor symptoms",
            Self::High => "Consult a doctor",
        }
    }

    /// Display color as a CSS hex string.
    #[must_use]
    pub fn color(&self) -> &'static str {
        match self {
            Self::Low => "#22c55e",      // Green
            Self::Moderate => "#f59e0b", // Amber
            Self::High => "#ef4444",     // Red
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for RiskLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("RiskLevel", 3)?;
        s.serialize_field("level", self.label())?;
        s.serialize_field("color", self.color())?;
        s.serialize_field("description", self.description())?;
        s.end()
    }
}

/// One model's verdict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPrediction {
    /// Binary label (0 = healthy, 1 = needs attention)
    pub prediction: u8,

    /// Probability of the positive class (0.0 to 1.0)
    pub probability: f64,
}

impl ModelPrediction {
    /// Neutral verdict substituted for a model that failed.
    pub const FALLBACK: Self = Self {
        prediction: 0,
        probability: 0.5,
    };
}

/// What happened when one model was run.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutcome {
    Success(ModelPrediction),
    Failure { reason: String },
}

impl ModelOutcome {
    /// The prediction that enters the aggregate.
    #[must_use]
    pub fn effective(&self) -> ModelPrediction {
        match self {
            Self::Success(p) => *p,
            Self::Failure { .. } => ModelPrediction::FALLBACK,
        }
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }
}

/// Per-model outcomes plus their unweighted mean.
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleResult {
    outcomes: Vec<(String, ModelOutcome)>,
    aggregate_probability: f64,
}

impl EnsembleResult {
    /// Aggregate a batch of outcomes, in model order.
    ///
    /// Failed models contribute the fallback probability. An empty batch
    /// aggregates to the fallback probability as well.
    #[must_use]
    pub fn from_outcomes(outcomes: Vec<(String, ModelOutcome)>) -> Self {
        let aggregate_probability = if outcomes.is_empty() {
            ModelPrediction::FALLBACK.probability
        } else {
            let sum: f64 = outcomes.iter().map(|(_, o)| o.effective().probability).sum();
            sum / outcomes.len() as f64
        };

        Self {
            outcomes,
            aggregate_probability,
        }
    }

    #[must_use]
    pub fn aggregate_probability(&self) -> f64 {
        self.aggregate_probability
    }

    /// Strictly above one half.
    #[must_use]
    pub fn needs_attention(&self) -> bool {
        self.aggregate_probability > 0.5
    }

    #[must_use]
    pub fn outcomes(&self) -> &[(String, ModelOutcome)] {
        &self.outcomes
    }

    /// Effective prediction per model, fallbacks included.
    pub fn predictions(&self) -> impl Iterator<Item = (&str, ModelPrediction)> {
        self.outcomes.iter().map(|(n, o)| (n.as_str(), o.effective()))
    }

    /// Models that failed, with the reason.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outcomes.iter().filter_map(|(n, o)| match o {
            ModelOutcome::Failure { reason } => Some((n.as_str(), reason.as_str())),
            ModelOutcome::Success(_) => None,
        })
    }
}

/// Serializes as `{model_name: {prediction, probability}}` in model order.
pub(crate) struct ModelTable<'a>(pub &'a EnsembleResult);

impl Serialize for ModelTable<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.outcomes.len()))?;
        for (name, prediction) in self.0.predictions() {
            map.serialize_entry(name, &prediction)?;
        }
        map.end()
    }
}
