//! The structured summary record and its JSON Schema.
//!
//! A `StructuredSummary` is always complete: coercion fills every field,
//! and the embedded schema describes exactly what a valid record looks like.

mod schema;

pub use schema::{is_valid_summary, validate_summary_schema, SchemaError};

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::types::{AnswerFields, ReadinessFlag, Suitability};

/// The authoritative output of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredSummary {
    /// Best available answer text per field, verbatim
    pub raw_answers: AnswerFields,

    /// Short note per field (model-supplied or a truncated answer)
    pub notes: AnswerFields,

    /// Overall evaluation, never empty
    pub evaluation: String,

    pub suitability: Suitability,

    pub readiness_flag: ReadinessFlag,

    /// Evidence per principle, in principle order
    pub principles_alignment: PrinciplesAlignment,
}

/// Ordered principle name to evidence mapping.
///
/// Serializes as a JSON object whose keys keep insertion order. Names are
/// unique; inserting an existing name is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrinciplesAlignment {
    entries: Vec<(String, String)>,
}

impl PrinciplesAlignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a principle. Returns false if the name was already present.
    pub fn insert(&mut self, name: impl Into<String>, evidence: impl Into<String>) -> bool {
        let name = name.into();
        if self.entries.iter().any(|(n, _)| *n == name) {
            return false;
        }
        self.entries.push((name, evidence.into()));
        true
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, e)| e.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, e)| (n.as_str(), e.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for PrinciplesAlignment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, evidence) in &self.entries {
            map.serialize_entry(name, evidence)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PrinciplesAlignment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AlignmentVisitor;

        impl<'de> Visitor<'de> for AlignmentVisitor {
            type Value = PrinciplesAlignment;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of principle names to evidence strings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut alignment = PrinciplesAlignment::new();
                while let Some((name, evidence)) = access.next_entry::<String, String>()? {
                    alignment.insert(name, evidence);
                }
                Ok(alignment)
            }
        }

        deserializer.deserialize_map(AlignmentVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_keeps_insertion_order() {
        let mut alignment = PrinciplesAlignment::new();
        alignment.insert("Grit", "");
        alignment.insert("Curiosity", "Asked about the syllabus");
        alignment.insert("Aardvark", "");

        let json = serde_json::to_string(&alignment).unwrap();
        assert_eq!(
            json,
            r#"{"Grit":"","Curiosity":"Asked about the syllabus","Aardvark":""}"#
        );
    }

    #[test]
    fn test_alignment_first_insert_wins() {
        let mut alignment = PrinciplesAlignment::new();
        assert!(alignment.insert("Grit", "first"));
        assert!(!alignment.insert("Grit", "second"));
        assert_eq!(alignment.len(), 1);
        assert_eq!(alignment.get("Grit"), Some("first"));
    }

    #[test]
    fn test_alignment_deserialize_preserves_order() {
        let alignment: PrinciplesAlignment =
            serde_json::from_str(r#"{"Zeal": "x", "Ambition": ""}"#).unwrap();
        assert_eq!(alignment.names().collect::<Vec<_>>(), vec!["Zeal", "Ambition"]);
    }
}
