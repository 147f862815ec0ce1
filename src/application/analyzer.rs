//! Category analyzer: rule-based ranking of registry categories.

use crate::domain::{CategoryRegistry, CategoryScore, SymptomFlags};

const SYMPTOM_POINTS: u32 = 1;
const KEYWORD_POINTS: u32 = 2;

/// Score every registry category against the symptom flags and free text.
///
/// Categories scoring zero are dropped. The rest are ordered by score,
/// highest first; equal scores keep registry order.
#[must_use]
pub fn analyze(
    registry: &CategoryRegistry,
    symptoms: &SymptomFlags,
    raw_text: &str,
) -> Vec<CategoryScore> {
    let text = raw_text.to_lowercase();

    let mut scores: Vec<CategoryScore> = registry
        .iter()
        .filter_map(|category| {
            let matched_symptoms: Vec<&'static str> = category
                .symptoms
                .iter()
                .copied()
                .filter(|s| symptoms.is_present(s))
                .collect();
            let matched_keywords: Vec<&'static str> = category
                .keywords
                .iter()
                .copied()
                .filter(|k| text.contains(k))
                .collect();

            let score = SYMPTOM_POINTS * matched_symptoms.len() as u32
                + KEYWORD_POINTS * matched_keywords.len() as u32;
            if score == 0 {
                return None;
            }

            let keep = (score as usize + 1).min(category.diseases.len());
            Some(CategoryScore {
                category: category.name,
                score,
                matched_symptoms,
                matched_keywords,
                possible_diseases: category.diseases[..keep].to_vec(),
                urgency: category.urgency,
                recommendation: category.recommendation,
            })
        })
        .collect();

    // sort_by is stable
    scores.sort_by(|a, b| b.score.cmp(&a.score));
    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> CategoryRegistry {
        CategoryRegistry::standard().expect("Registry")
    }

    fn flags(present: &[&str]) -> SymptomFlags {
        present.iter().map(|s| (*s, true)).collect()
    }

    #[test]
    fn test_symptom_and_keyword_points() {
        let result = analyze(&registry(), &flags(&["cough"]), "chest pain and cough");

        assert_eq!(result[0].category, "respiratory");
        assert_eq!(result[0].score, 3);
        assert_eq!(result[0].matched_symptoms, vec!["cough"]);
        assert_eq!(result[0].matched_keywords, vec!["cough"]);
        assert_eq!(result[0].possible_diseases.len(), 4);

        assert_eq!(result[1].category, "cardiac");
        assert_eq!(result[1].score, 2);
        assert_eq!(result[1].possible_diseases, vec!["Hypertension", "Arrhythmia", "Heart Disease"]);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_keyword_counts_once_and_ignores_case() {
        let result = analyze(&registry(), &SymptomFlags::default(), "COUGH cough Cough");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].score, 2);
    }

    #[test]
    fn test_keywords_match_as_substrings() {
        // "vomiting" contains "vomit"
        let result = analyze(&registry(), &SymptomFlags::default(), "I keep vomiting");
        assert_eq!(result[0].category, "gastrointestinal");
        assert_eq!(result[0].matched_keywords, vec!["vomit"]);
    }

    #[test]
    fn test_ties_keep_registry_order() {
        let result = analyze(&registry(), &flags(&["fatigue"]), "");
        let names: Vec<&str> = result.iter().map(|c| c.category).collect();
        assert_eq!(names, ["cardiac", "neurological", "mental_health", "thyroid"]);
        assert!(result.iter().all(|c| c.score == 1));
        assert!(result.iter().all(|c| c.possible_diseases.len() == 2));
    }

    #[test]
    fn test_absent_and_false_flags_score_nothing() {
        let mut symptoms = flags(&[]);
        symptoms.insert("cough", false);
        assert!(analyze(&registry(), &symptoms, "").is_empty());
    }
}
