//! Typed view of whatever the model returned.
//!
//! Every field is optional. A field whose JSON type does not match (a number
//! where a string was expected, an array where an object was expected) is
//! treated as absent rather than failing the whole decode.

use serde_json::Value;
use std::collections::BTreeMap;

use crate::extract::JsonObject;
use crate::types::AnswerKey;

/// Partial summary decoded from model output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawModelOutput {
    pub raw_answers: Option<BTreeMap<String, String>>,
    pub notes: Option<BTreeMap<String, String>>,
    pub evaluation: Option<String>,
    pub suitability: Option<String>,
    pub readiness_flag: Option<String>,
    pub principles_alignment: Option<BTreeMap<String, String>>,
}

impl RawModelOutput {
    /// Leniently decode the six expected top-level keys.
    pub fn from_object(obj: &JsonObject) -> Self {
        Self {
            raw_answers: string_map(obj, "raw_answers"),
            notes: string_map(obj, "notes"),
            evaluation: string_field(obj, "evaluation"),
            suitability: string_field(obj, "suitability"),
            readiness_flag: string_field(obj, "readiness_flag"),
            principles_alignment: string_map(obj, "principles_alignment"),
        }
    }

    /// Non-blank note for a field.
    ///
    /// The canonical key is tried first, then the field's answer-set aliases.
    pub fn note(&self, key: AnswerKey) -> Option<&str> {
        let notes = self.notes.as_ref()?;
        std::iter::once(key.as_str())
            .chain(key.source_keys().iter().copied())
            .filter_map(|k| notes.get(k))
            .map(|v| v.as_str())
            .find(|v| !v.trim().is_empty())
    }

    /// Non-blank evidence for a principle, matched by exact name.
    pub fn evidence(&self, principle: &str) -> Option<&str> {
        self.principles_alignment
            .as_ref()?
            .get(principle)
            .map(|v| v.as_str())
            .filter(|v| !v.trim().is_empty())
    }

    /// Non-blank evaluation text.
    pub fn evaluation(&self) -> Option<&str> {
        self.evaluation
            .as_deref()
            .filter(|v| !v.trim().is_empty())
    }

    /// True when no expected key was recovered.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

fn string_field(obj: &JsonObject, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

fn string_map(obj: &JsonObject, key: &str) -> Option<BTreeMap<String, String>> {
    let inner = obj.get(key)?.as_object()?;
    Some(
        inner
            .iter()
            .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
            .collect(),
    )
}
