//! Disease category registry.
//!
//! A fixed table of categories scored against reported symptoms. The table is
//! validated once when the registry is built and is read-only afterwards.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// How quickly a category's findings should be acted upon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Moderate,
    High,
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Moderate => write!(f, "moderate"),
            Self::High => write!(f, "high"),
        }
    }
}

/// One registry entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDefinition {
    pub name: &'static str,
    /// Structured symptom keys (+1 each when present)
    pub symptoms: &'static [&'static str],
    /// Lower-case phrases searched in the free text (+2 each when found)
    pub keywords: &'static [&'static str],
    /// Related camera metrics; may be empty
    pub metrics: &'static [&'static str],
    /// Candidate diagnoses, most common first
    pub diseases: &'static [&'static str],
    pub urgency: Urgency,
    pub recommendation: &'static str,
}

/// Errors detected while validating a registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Duplicate category: {0}")]
    DuplicateCategory(&'static str),

    #[error("Category {0} lists no diseases")]
    NoDiseases(&'static str),

    #[error("Category {0} has neither symptom keys nor keywords")]
    NothingToMatch(&'static str),

    #[error("Category {category} keyword '{keyword}' must be non-empty lower case")]
    InvalidKeyword {
        category: &'static str,
        keyword: &'static str,
    },
}

/// Validated, ordered set of categories.
///
/// Declaration order is significant: it is the final tie-break when ranking.
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    categories: Vec<CategoryDefinition>,
}

impl CategoryRegistry {
    /// Build a registry, validating every entry.
    ///
    /// # Errors
    /// Returns the first `RegistryError` found.
    pub fn new(categories: Vec<CategoryDefinition>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for category in &categories {
            if !seen.insert(category.name) {
                return Err(RegistryError::DuplicateCategory(category.name));
            }
            if category.diseases.is_empty() {
                return Err(RegistryError::NoDiseases(category.name));
            }
            if category.symptoms.is_empty() && category.keywords.is_empty() {
                return Err(RegistryError::NothingToMatch(category.name));
            }
            if let Some(keyword) = category
                .keywords
                .iter()
                .copied()
                .find(|k| k.is_empty() || k.to_lowercase() != *k)
            {
                return Err(RegistryError::InvalidKeyword {
                    category: category.name,
                    keyword,
                });
            }
        }
        Ok(Self { categories })
    }

    /// The built-in ten-category table.
    ///
    /// # Errors
    /// Only if the built-in table itself is inconsistent.
    pub fn standard() -> Result<Self, RegistryError> {
        Self::new(STANDARD_CATEGORIES.to_vec())
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryDefinition> {
        self.categories.iter()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CategoryDefinition> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Category names in declaration order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.categories.iter().map(|c| c.name).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

const STANDARD_CATEGORIES: [CategoryDefinition; 10] = [
    CategoryDefinition {
        name: "respiratory",
        symptoms: &["cough", "breathing_difficulty", "sore_throat"],
        keywords: &["cough", "shortness of breath", "wheezing", "sore throat", "congestion", "asthma"],
        metrics: &["breathing_rate", "spo2"],
        diseases: &["Common Cold", "Flu", "Asthma", "Bronchitis", "COVID-19"],
        urgency: Urgency::Moderate,
        recommendation: "Rest, stay hydrated and watch your oxygen saturation. Seek care if breathing worsens.",
    },
    CategoryDefinition {
        name: "cardiac",
        symptoms: &["chest_pain", "fatigue", "dizziness"],
        keywords: &["chest pain", "palpitations", "heart pain", "racing heart", "irregular heartbeat", "chest tightness"],
        metrics: &["heart_rate", "hrv"],
        diseases: &["Hypertension", "Arrhythmia", "Heart Disease"],
        urgency: Urgency::High,
        recommendation: "Avoid exertion and have your heart checked. Call emergency services if chest pain is severe.",
    },
    CategoryDefinition {
        name: "neurological",
        symptoms: &["headache", "dizziness", "fatigue"],
        keywords: &["headache", "migraine", "dizzy", "vertigo", "numbness", "tremor", "seizure", "confusion"],
        metrics: &["facial_symmetry", "head_tremor", "fatigue_perclos"],
        diseases: &["Migraine", "Stroke Risk", "Parkinson Risk", "Fatigue Syndrome"],
        urgency: Urgency::High,
        recommendation: "Rest in a quiet place. Sudden facial drooping or slurred speech needs emergency care.",
    },
    CategoryDefinition {
        name: "gastrointestinal",
        symptoms: &["nausea", "vomiting", "abdominal_pain"],
        keywords: &["nausea", "vomit", "stomach pain", "abdominal", "diarrhea", "bloating", "heartburn"],
        metrics: &[],
        diseases: &["Gastritis", "Food Poisoning", "IBS"],
        urgency: Urgency::Moderate,
        recommendation: "Keep to light meals and fluids. See a doctor if pain or vomiting persists beyond a day.",
    },
    CategoryDefinition {
        name: "dermatological",
        symptoms: &["rash", "skin_discoloration", "swelling"],
        keywords: &["rash", "itch", "hives", "discoloration", "yellowing", "blister"],
        metrics: &["skin_status"],
        diseases: &["Allergic Reaction", "Eczema", "Dermatitis", "Jaundice"],
        urgency: Urgency::Low,
        recommendation: "Avoid irritants and keep the area clean. Yellowing skin should be checked by a doctor.",
    },
    CategoryDefinition {
        name: "mental_health",
        symptoms: &["fatigue", "headache"],
        keywords: &["stress", "anxious", "anxiety", "depressed", "panic", "insomnia", "overwhelmed"],
        metrics: &["distress_score", "primary_emotion", "fatigue_perclos"],
        diseases: &["Stress", "Anxiety", "Depression", "Burnout"],
        urgency: Urgency::Moderate,
        recommendation: "Take regular breaks and keep a sleep routine. Talking to a counsellor can help.",
    },
    CategoryDefinition {
        name: "oncology",
        symptoms: &[],
        keywords: &["lump", "unexplained weight loss", "night sweats", "persistent fatigue", "unusual bleeding"],
        metrics: &[],
        diseases: &["Benign Growth", "Lymphoma Risk", "Cancer Screening Recommended"],
        urgency: Urgency::High,
        recommendation: "Book a screening appointment. Early examination matters for new lumps or weight loss.",
    },
    CategoryDefinition {
        name: "thyroid",
        symptoms: &["fatigue", "swelling"],
        keywords: &["weight gain", "cold intolerance", "hair loss", "neck swelling", "goiter"],
        metrics: &[],
        diseases: &["Hypothyroidism", "Hyperthyroidism", "Goiter"],
        urgency: Urgency::Moderate,
        recommendation: "Ask your doctor for a thyroid panel (TSH, T4).",
    },
    CategoryDefinition {
        name: "infectious",
        symptoms: &["fever", "body_ache", "sore_throat"],
        keywords: &["fever", "chills", "infection", "body ache", "sweating", "temperature"],
        metrics: &[],
        diseases: &["Viral Infection", "Bacterial Infection", "Influenza", "Sepsis Risk"],
        urgency: Urgency::Moderate,
        recommendation: "Rest, drink fluids and track your temperature. A fever lasting over three days needs a doctor.",
    },
    CategoryDefinition {
        name: "lymphatic",
        symptoms: &["swelling", "fever"],
        keywords: &["swollen glands", "swollen lymph", "lymph node", "tender neck"],
        metrics: &[],
        diseases: &["Lymphadenitis", "Mononucleosis", "Lymphedema"],
        urgency: Urgency::Moderate,
        recommendation: "Monitor swollen nodes. Nodes that grow or persist beyond two weeks should be examined.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry_is_valid() {
        let registry = CategoryRegistry::standard().expect("Built-in table should validate");
        assert_eq!(registry.len(), 10);
        assert_eq!(registry.names()[0], "respiratory");
        assert_eq!(registry.names()[9], "lymphatic");
        assert!(registry.get("cardiac").is_some_and(|c| c.keywords.contains(&"chest pain")));
    }

    #[test]
    fn test_rejects_duplicates() {
        let first = STANDARD_CATEGORIES[0].clone();
        let err = CategoryRegistry::new(vec![first.clone(), first]).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateCategory("respiratory"));
    }

    #[test]
    fn test_rejects_uppercase_keyword() {
        let mut bad = STANDARD_CATEGORIES[1].clone();
        bad.keywords = &["Chest Pain"];
        assert!(matches!(
            CategoryRegistry::new(vec![bad]),
            Err(RegistryError::InvalidKeyword { keyword: "Chest Pain", .. })
        ));
    }

    #[test]
    fn test_rejects_unmatchable_category() {
        let mut bad = STANDARD_CATEGORIES[6].clone();
        bad.keywords = &[];
        assert_eq!(
            CategoryRegistry::new(vec![bad]).unwrap_err(),
            RegistryError::NothingToMatch("oncology")
        );
    }

    #[test]
    fn test_rejects_empty_diseases() {
        let mut bad = STANDARD_CATEGORIES[3].clone();
        bad.diseases = &[];
        assert_eq!(
            CategoryRegistry::new(vec![bad]).unwrap_err(),
            RegistryError::NoDiseases("gastrointestinal")
        );
    }
}
