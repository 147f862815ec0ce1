//! Health input types received from the capture frontend.
//!
//! The payload mixes camera-derived readings, symptom flags gathered from a
//! chat, and the raw chat transcript. Every field is optional: absence is
//! treated as "no evidence", never as an error.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Snapshot of everything known about the user at prediction time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthInput {
    /// Camera-derived physiological metrics
    #[serde(default, deserialize_with = "null_as_default")]
    pub face_metrics: FaceMetrics,

    /// Reported symptoms
    #[serde(default, deserialize_with = "null_as_default")]
    pub symptoms: SymptomReport,
}

/// Free-form metric mapping as sent by the camera pipeline.
///
/// Only numeric-coercible values count as readings; status strings and
/// nested objects (e.g. `skin_rgb`) are carried but ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaceMetrics(BTreeMap<String, Value>);

impl FaceMetrics {
    /// Numeric reading for `name`, if one is present.
    ///
    /// Numbers are taken as-is, numeric strings are parsed and booleans map
    /// to 1/0. Anything else (null, text, objects) is `None`.
    #[must_use]
    pub fn reading(&self, name: &str) -> Option<f64> {
        match self.0.get(name)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Set a numeric reading.
    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        let value = serde_json::Number::from_f64(value).map_or(Value::Null, Value::Number);
        self.0.insert(name.into(), value);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, f64)> for FaceMetrics {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut metrics = Self::default();
        for (name, value) in iter {
            metrics.set(name, value);
        }
        metrics
    }
}

/// Symptoms reported through the chat.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymptomReport {
    /// Visible symptoms (rash, swelling, ...)
    #[serde(default, deserialize_with = "null_as_default")]
    pub physical: SymptomFlags,

    /// Symptoms that are hard to observe (fever, chest pain, ...)
    #[serde(default, deserialize_with = "null_as_default")]
    pub internal: SymptomFlags,

    /// Everything the user typed, possibly empty
    #[serde(default, deserialize_with = "null_as_default")]
    pub raw_text: String,
}

impl SymptomReport {
    /// Number of present flags across both mappings.
    ///
    /// A key present in both `physical` and `internal` counts twice.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.physical.active_count() + self.internal.active_count()
    }

    /// Single view over both mappings; `internal` wins on shared keys.
    #[must_use]
    pub fn merged(&self) -> SymptomFlags {
        let mut merged = self.physical.clone();
        merged
            .0
            .extend(self.internal.0.iter().map(|(k, v)| (k.clone(), *v)));
        merged
    }
}

/// Symptom name to present/absent mapping.
///
/// Deserializes from any JSON object, using truthiness for the values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SymptomFlags(BTreeMap<String, bool>);

impl SymptomFlags {
    #[must_use]
    pub fn is_present(&self, symptom: &str) -> bool {
        self.0.get(symptom).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.0.values().filter(|present| **present).count()
    }

    pub fn insert(&mut self, symptom: impl Into<String>, present: bool) {
        self.0.insert(symptom.into(), present);
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for SymptomFlags {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<'de> Deserialize<'de> for SymptomFlags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        Ok(Self(
            raw.into_iter()
                .map(|(name, value)| (name, is_truthy(&value)))
                .collect(),
        ))
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
