//! Core types shared across the summarization pipeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The five semantic fields every summary reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKey {
    Background,
    Motivation,
    Experience,
    FutureGoals,
    Readiness,
}

impl AnswerKey {
    /// All keys in rendering order.
    pub const ALL: [AnswerKey; 5] = [
        AnswerKey::Background,
        AnswerKey::Motivation,
        AnswerKey::Experience,
        AnswerKey::FutureGoals,
        AnswerKey::Readiness,
    ];

    /// The key as it appears in structured output.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerKey::Background => "background",
            AnswerKey::Motivation => "motivation",
            AnswerKey::Experience => "experience",
            AnswerKey::FutureGoals => "future_goals",
            AnswerKey::Readiness => "readiness",
        }
    }

    /// Answer-set keys that may hold this field, in priority order.
    ///
    /// Interview scripts have used different question keys over time;
    /// the first non-empty match wins.
    pub fn source_keys(&self) -> &'static [&'static str] {
        match self {
            AnswerKey::Background => &["background", "full_name_background"],
            AnswerKey::Motivation => &["motivation", "why_company", "why_lunartech"],
            AnswerKey::Experience => &["experience"],
            AnswerKey::FutureGoals => &["future_goals", "goals"],
            AnswerKey::Readiness => &["readiness"],
        }
    }

    /// Human-readable label used by the markdown renderer.
    pub fn label(&self) -> &'static str {
        match self {
            AnswerKey::Background => "Background",
            AnswerKey::Motivation => "Motivation",
            AnswerKey::Experience => "Experience",
            AnswerKey::FutureGoals => "Goals",
            AnswerKey::Readiness => "Readiness",
        }
    }
}

impl fmt::Display for AnswerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answers collected by the interview, keyed by question key.
///
/// Null values in serialized input are dropped on load, so every stored
/// value is a string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Option<String>>")]
pub struct AnswerSet(BTreeMap<String, String>);

impl AnswerSet {
    /// Create an empty answer set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer, replacing any previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Get the answer stored under an exact key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|s| s.as_str())
    }

    /// First non-empty answer among `keys`, or the empty string.
    pub fn pick(&self, keys: &[&str]) -> &str {
        keys.iter()
            .filter_map(|k| self.get(k))
            .find(|v| !v.is_empty())
            .unwrap_or("")
    }

    /// Best available source text for a semantic field.
    pub fn resolve(&self, key: AnswerKey) -> &str {
        self.pick(key.source_keys())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, Option<String>>> for AnswerSet {
    fn from(map: BTreeMap<String, Option<String>>) -> Self {
        Self(
            map.into_iter()
                .filter_map(|(k, v)| v.map(|v| (k, v)))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Overall candidate suitability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suitability {
    Strong,
    Average,
    Weak,
}

impl Suitability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Suitability::Strong => "strong",
            Suitability::Average => "average",
            Suitability::Weak => "weak",
        }
    }

    /// Parse an exact literal. Anything else (including different case) is rejected.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "strong" => Some(Suitability::Strong),
            "average" => Some(Suitability::Average),
            "weak" => Some(Suitability::Weak),
            _ => None,
        }
    }
}

impl fmt::Display for Suitability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When the candidate can start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessFlag {
    ReadyNow,
    Date,
    NeedsPrep,
    Unknown,
}

impl ReadinessFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadinessFlag::ReadyNow => "ready_now",
            ReadinessFlag::Date => "date",
            ReadinessFlag::NeedsPrep => "needs_prep",
            ReadinessFlag::Unknown => "unknown",
        }
    }

    /// Parse an exact literal.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ready_now" => Some(ReadinessFlag::ReadyNow),
            "date" => Some(ReadinessFlag::Date),
            "needs_prep" => Some(ReadinessFlag::NeedsPrep),
            "unknown" => Some(ReadinessFlag::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for ReadinessFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One string per semantic field, serialized in a fixed key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerFields {
    pub background: String,
    pub motivation: String,
    pub experience: String,
    pub future_goals: String,
    pub readiness: String,
}

impl AnswerFields {
    /// Build every field from a function of its key.
    pub fn from_fn(mut f: impl FnMut(AnswerKey) -> String) -> Self {
        Self {
            background: f(AnswerKey::Background),
            motivation: f(AnswerKey::Motivation),
            experience: f(AnswerKey::Experience),
            future_goals: f(AnswerKey::FutureGoals),
            readiness: f(AnswerKey::Readiness),
        }
    }

    pub fn get(&self, key: AnswerKey) -> &str {
        match key {
            AnswerKey::Background => &self.background,
            AnswerKey::Motivation => &self.motivation,
            AnswerKey::Experience => &self.experience,
            AnswerKey::FutureGoals => &self.future_goals,
            AnswerKey::Readiness => &self.readiness,
        }
    }
}
