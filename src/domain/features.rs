//! Fixed-order feature vector fed to the ensemble.

use serde::{Deserialize, Serialize};

use super::input::HealthInput;

/// Number of features in a [`FeatureVector`].
pub const FEATURE_COUNT: usize = 7;

/// Feature names, in vector order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "heart_rate",
    "spo2",
    "breathing_rate",
    "facial_symmetry",
    "distress_score",
    "fatigue_perclos",
    "symptom_count",
];

/// Readings assumed when a metric is missing: a healthy adult at rest.
pub const DEFAULT_READINGS: [f64; FEATURE_COUNT - 1] = [
    72.0, // heart_rate (bpm)
    98.0, // spo2 (%)
    16.0, // breathing_rate (breaths/min)
    95.0, // facial_symmetry (%)
    0.1,  // distress_score
    10.0, // fatigue_perclos (%)
];

/// How metric readings equal to zero are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingPolicy {
    /// Absent, null and zero readings all fall back to the default.
    #[default]
    Legacy,
    /// Only absent or null readings fall back; an explicit zero is kept.
    Strict,
}

impl ReadingPolicy {
    fn resolve(self, reading: Option<f64>, default: f64) -> f64 {
        match (self, reading) {
            (Self::Legacy, Some(v)) if v != 0.0 => v,
            (Self::Strict, Some(v)) => v,
            _ => default,
        }
    }
}

impl std::str::FromStr for ReadingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(Self::Legacy),
            "strict" => Ok(Self::Strict),
            other => Err(format!("unknown reading policy '{other}'")),
        }
    }
}

/// `[heart_rate, spo2, breathing_rate, facial_symmetry, distress_score,
/// fatigue_perclos, symptom_count]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Build the vector from a health input. Never fails.
    #[must_use]
    pub fn extract(input: &HealthInput, policy: ReadingPolicy) -> Self {
        let mut values = [0.0; FEATURE_COUNT];
        for (i, default) in DEFAULT_READINGS.iter().enumerate() {
            let reading = input.face_metrics.reading(FEATURE_NAMES[i]);
            values[i] = policy.resolve(reading, *default);
        }
        values[FEATURE_COUNT - 1] = input.symptoms.active_count() as f64;
        Self(values)
    }

    #[must_use]
    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    #[must_use]
    pub fn symptom_count(&self) -> f64 {
        self.0[FEATURE_COUNT - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::input::SymptomReport;
    use proptest::prelude::*;

    fn input_with(metrics: &[(&str, f64)], symptoms: SymptomReport) -> HealthInput {
        HealthInput {
            face_metrics: metrics.iter().map(|(k, v)| ((*k).to_string(), *v)).collect(),
            symptoms,
        }
    }

    #[test]
    fn test_empty_input_uses_defaults() {
        let v = FeatureVector::extract(&HealthInput::default(), ReadingPolicy::Legacy);
        assert_eq!(v.0, [72.0, 98.0, 16.0, 95.0, 0.1, 10.0, 0.0]);
    }

    #[test]
    fn test_readings_override_defaults() {
        let input = input_with(&[("heart_rate", 110.0), ("distress_score", 0.8)], SymptomReport::default());
        let v = FeatureVector::extract(&input, ReadingPolicy::Legacy);
        assert_eq!(v.0[0], 110.0);
        assert_eq!(v.0[4], 0.8);
        assert_eq!(v.0[1], 98.0);
    }

    #[test]
    fn test_zero_reading_policy() {
        let input = input_with(&[("heart_rate", 0.0)], SymptomReport::default());
        assert_eq!(FeatureVector::extract(&input, ReadingPolicy::Legacy).0[0], 72.0);
        assert_eq!(FeatureVector::extract(&input, ReadingPolicy::Strict).0[0], 0.0);
    }

    #[test]
    fn test_symptom_count() {
        let symptoms = SymptomReport {
            physical: [("rash", true), ("swelling", false)].into_iter().collect(),
            internal: [("fever", true), ("cough", true)].into_iter().collect(),
            raw_text: String::new(),
        };
        let v = FeatureVector::extract(&input_with(&[], symptoms), ReadingPolicy::Legacy);
        assert_eq!(v.symptom_count(), 3.0);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("STRICT".parse::<ReadingPolicy>(), Ok(ReadingPolicy::Strict));
        assert_eq!(" legacy".parse::<ReadingPolicy>(), Ok(ReadingPolicy::Legacy));
        assert!("lenient".parse::<ReadingPolicy>().is_err());
    }

    proptest! {
        #[test]
        fn metrics_free_input_yields_default_vector(
            flags in proptest::collection::vec(any::<bool>(), 0..12)
        ) {
            let symptoms = SymptomReport {
                internal: flags.iter().enumerate().map(|(i, f)| (format!("s{i}"), *f)).collect(),
                ..SymptomReport::default()
            };
            let expected = flags.iter().filter(|f| **f).count() as f64;
            let v = FeatureVector::extract(&input_with(&[], symptoms), ReadingPolicy::Legacy);
            prop_assert_eq!(&v.0[..6], &DEFAULT_READINGS[..]);
            prop_assert_eq!(v.symptom_count(), expected);
        }
    }
}
