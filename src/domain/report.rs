//! Output types of a prediction call.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use super::category::Urgency;
use super::diagnosis::{EnsembleResult, ModelTable, RiskLevel};

/// Ranked match of one registry category against the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryScore {
    pub category: &'static str,
    /// +1 per matched symptom flag, +2 per distinct keyword found in the text
    pub score: u32,
    pub matched_symptoms: Vec<&'static str>,
    pub matched_keywords: Vec<&'static str>,
    /// First `min(score + 1, len)` registry diseases
    pub possible_diseases: Vec<&'static str>,
    pub urgency: Urgency,
    pub recommendation: &'static str,
}

/// Priority of a recommendation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Moderate,
    High,
    Urgent,
}

/// One actionable recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub text: &'static str,
    pub icon: &'static str,
}

/// Everything the core produces for one input.
///
/// The generation timestamp is added by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionReport {
    pub ensemble: EnsembleResult,
    pub risk: RiskLevel,
    pub category_analysis: Vec<CategoryScore>,
    pub recommendations: Vec<Recommendation>,
}

impl PredictionReport {
    #[must_use]
    pub fn probability(&self) -> f64 {
        self.ensemble.aggregate_probability()
    }

    #[must_use]
    pub fn needs_attention(&self) -> bool {
        self.ensemble.needs_attention()
    }
}

#[derive(Serialize)]
struct EnsembleSummary<'a> {
    probability: f64,
    needs_attention: bool,
    risk: &'a RiskLevel,
}

#[derive(Serialize)]
struct FailureEntry<'a> {
    model: &'a str,
    reason: &'a str,
}

impl Serialize for PredictionReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let failures: Vec<FailureEntry<'_>> = self
            .ensemble
            .failures()
            .map(|(model, reason)| FailureEntry { model, reason })
            .collect();

        let fields = if failures.is_empty() { 4 } else { 5 };
        let mut s = serializer.serialize_struct("PredictionReport", fields)?;
        s.serialize_field(
            "ensemble",
            &EnsembleSummary {
                probability: self.probability(),
                needs_attention: self.needs_attention(),
                risk: &self.risk,
            },
        )?;
        s.serialize_field("individual_models", &ModelTable(&self.ensemble))?;
        if failures.is_empty() {
            s.skip_field("model_failures")?;
        } else {
            s.serialize_field("model_failures", &failures)?;
        }
        s.serialize_field("category_analysis", &self.category_analysis)?;
        s.serialize_field("recommendations", &self.recommendations)?;
        s.end()
    }
}
