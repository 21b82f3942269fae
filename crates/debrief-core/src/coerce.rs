//! Coercion of partial model output into a complete summary.
//!
//! Coercion is total: every field has a deterministic default computed from
//! the raw answers alone, so `coerce(None, ..)` is the template summary.

use crate::model_output::RawModelOutput;
use crate::principles::parse_principles;
use crate::summary::{PrinciplesAlignment, StructuredSummary};
use crate::text::shorten;
use crate::types::{AnswerFields, AnswerKey, AnswerSet, ReadinessFlag, Suitability};

/// Evaluation used when the model supplied none.
pub const TEMPLATE_EVALUATION: &str =
    "Template summary: Candidate provided responses. Enable richer evaluation via the model backend.";

/// Motivation or experience longer than this (in chars) rates `strong`.
pub const STRONG_ANSWER_CHARS: usize = 120;

/// Motivation or experience longer than this (in chars) rates `average`.
pub const AVERAGE_ANSWER_CHARS: usize = 40;

const READY_NOW_MARKERS: &[&str] = &["immediate", "ready", "now"];
const DATE_MARKERS: &[&str] = &["week", "month", " from ", "start "];
const NEEDS_PREP_MARKERS: &[&str] = &["prep", "support", "refresh", "not ready"];

/// Merges model output, raw answers and heuristics into a `StructuredSummary`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaCoercer;

impl SchemaCoercer {
    pub fn new() -> Self {
        Self
    }

    /// Build a complete summary.
    ///
    /// `raw_answers` always come from `answers`; the model's own echo of the
    /// answers is ignored.
    pub fn coerce(
        &self,
        raw: Option<&RawModelOutput>,
        answers: &AnswerSet,
        principles_text: &str,
    ) -> StructuredSummary {
        let raw_answers = AnswerFields::from_fn(|key| answers.resolve(key).to_string());

        let notes = AnswerFields::from_fn(|key| {
            let source = raw
                .and_then(|r| r.note(key))
                .unwrap_or_else(|| raw_answers.get(key));
            shorten(source)
        });

        let suitability = raw
            .and_then(|r| r.suitability.as_deref())
            .and_then(Suitability::parse)
            .unwrap_or_else(|| {
                suitability_from_lengths(
                    raw_answers.get(AnswerKey::Motivation),
                    raw_answers.get(AnswerKey::Experience),
                )
            });

        let readiness_flag = raw
            .and_then(|r| r.readiness_flag.as_deref())
            .and_then(ReadinessFlag::parse)
            .unwrap_or_else(|| readiness_from_text(raw_answers.get(AnswerKey::Readiness)));

        let evaluation = raw
            .and_then(|r| r.evaluation())
            .map(|e| e.trim().to_string())
            .unwrap_or_else(|| TEMPLATE_EVALUATION.to_string());

        let mut principles_alignment = PrinciplesAlignment::new();
        for name in parse_principles(principles_text) {
            let evidence = raw.and_then(|r| r.evidence(&name)).unwrap_or("");
            principles_alignment.insert(name.as_str(), evidence);
        }

        StructuredSummary {
            raw_answers,
            notes,
            evaluation,
            suitability,
            readiness_flag,
            principles_alignment,
        }
    }
}

/// Length-based suitability when the model gave no usable rating.
///
/// Only motivation and experience are inspected.
pub fn suitability_from_lengths(motivation: &str, experience: &str) -> Suitability {
    let motivation = motivation.chars().count();
    let experience = experience.chars().count();

    if motivation > STRONG_ANSWER_CHARS || experience > STRONG_ANSWER_CHARS {
        Suitability::Strong
    } else if motivation > AVERAGE_ANSWER_CHARS || experience > AVERAGE_ANSWER_CHARS {
        Suitability::Average
    } else {
        Suitability::Weak
    }
}

/// Readiness inferred from the readiness answer. First matching category wins.
pub fn readiness_from_text(text: &str) -> ReadinessFlag {
    if text.is_empty() {
        return ReadinessFlag::Unknown;
    }

    let lowered = text.to_lowercase();
    let mentions = |markers: &[&str]| markers.iter().any(|m| lowered.contains(m));

    if mentions(READY_NOW_MARKERS) {
        ReadinessFlag::ReadyNow
    } else if mentions(DATE_MARKERS) {
        ReadinessFlag::Date
    } else if mentions(NEEDS_PREP_MARKERS) {
        ReadinessFlag::NeedsPrep
    } else {
        ReadinessFlag::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_json_object;
    use crate::summary::validate_summary_schema;
    use crate::text::NOTE_MAX_CHARS;
    use proptest::prelude::*;

    fn answers(pairs: &[(&str, &str)]) -> AnswerSet {
        pairs.iter().copied().collect()
    }

    fn coerce_template(pairs: &[(&str, &str)], principles: &str) -> StructuredSummary {
        SchemaCoercer::new().coerce(None, &answers(pairs), principles)
    }

    fn raw_from(text: &str) -> RawModelOutput {
        RawModelOutput::from_object(&extract_json_object(text).unwrap())
    }

    #[test]
    fn test_ready_now_from_answer() {
        let summary = coerce_template(&[("readiness", "I am ready now")], "");
        assert_eq!(summary.readiness_flag, ReadinessFlag::ReadyNow);
    }

    #[test]
    fn test_readiness_categories_in_order() {
        assert_eq!(readiness_from_text("starting next month"), ReadinessFlag::Date);
        assert_eq!(readiness_from_text("Two WEEKS notice"), ReadinessFlag::Date);
        assert_eq!(readiness_from_text("I need to brush up, some prep"), ReadinessFlag::NeedsPrep);
        assert_eq!(readiness_from_text("Would like extra support"), ReadinessFlag::NeedsPrep);
        assert_eq!(readiness_from_text("Perhaps"), ReadinessFlag::Unknown);
        assert_eq!(readiness_from_text(""), ReadinessFlag::Unknown);
        // "not ready" contains "ready", and the ready_now category is checked first.
        assert_eq!(readiness_from_text("not ready yet"), ReadinessFlag::ReadyNow);
    }

    #[test]
    fn test_suitability_thresholds() {
        let strong = coerce_template(&[("experience", "x".repeat(130).as_str())], "");
        assert_eq!(strong.suitability, Suitability::Strong);

        let average = coerce_template(&[("experience", "x".repeat(50).as_str()), ("motivation", "")], "");
        assert_eq!(average.suitability, Suitability::Average);

        let weak = coerce_template(
            &[("experience", "x".repeat(39).as_str()), ("motivation", "y".repeat(39).as_str())],
            "",
        );
        assert_eq!(weak.suitability, Suitability::Weak);
    }

    #[test]
    fn test_suitability_boundaries_are_exclusive() {
        assert_eq!(suitability_from_lengths(&"m".repeat(120), ""), Suitability::Average);
        assert_eq!(suitability_from_lengths(&"m".repeat(121), ""), Suitability::Strong);
        assert_eq!(suitability_from_lengths("", "e".repeat(40).as_str()), Suitability::Weak);
        assert_eq!(suitability_from_lengths("", "e".repeat(41).as_str()), Suitability::Average);
    }

    #[test]
    fn test_suitability_ignores_other_fields() {
        let summary = coerce_template(
            &[("background", "b".repeat(500).as_str()), ("future_goals", "g".repeat(500).as_str())],
            "",
        );
        assert_eq!(summary.suitability, Suitability::Weak);
    }

    #[test]
    fn test_motivation_aliases_feed_heuristic() {
        let summary = coerce_template(&[("why_company", "w".repeat(121).as_str())], "");
        assert_eq!(summary.raw_answers.motivation, "w".repeat(121));
        assert_eq!(summary.suitability, Suitability::Strong);
    }

    #[test]
    fn test_principles_without_evidence() {
        let summary = coerce_template(&[], "- Curiosity\n- Grit\n");
        let pairs: Vec<_> = summary.principles_alignment.iter().collect();
        assert_eq!(pairs, vec![("Curiosity", ""), ("Grit", "")]);
    }

    #[test]
    fn test_principles_only_known_names_kept() {
        let raw = raw_from(
            r#"{"principles_alignment": {"Grit": "Rebuilt a failing project", "Invented": "x"}}"#,
        );
        let summary =
            SchemaCoercer::new().coerce(Some(&raw), &AnswerSet::new(), "- Curiosity\n- Grit");
        let pairs: Vec<_> = summary.principles_alignment.iter().collect();
        assert_eq!(
            pairs,
            vec![("Curiosity", ""), ("Grit", "Rebuilt a failing project")]
        );
    }

    #[test]
    fn test_long_model_note_is_shortened() {
        let long_note = "n".repeat(500);
        let raw = raw_from(&format!(r#"{{"notes": {{"experience": "{}"}}}}"#, long_note));
        let answers: AnswerSet = [("experience", "Short answer")].into_iter().collect();
        let summary = SchemaCoercer::new().coerce(Some(&raw), &answers, "");

        assert_eq!(summary.notes.experience.chars().count(), 221);
        assert!(summary.notes.experience.ends_with('…'));
        assert!(summary.notes.experience.starts_with(&"n".repeat(220)));
        // The raw answer itself is not touched.
        assert_eq!(summary.raw_answers.experience, "Short answer");
    }

    #[test]
    fn test_template_evaluation_literal() {
        let summary = coerce_template(&[("background", "Chemistry")], "");
        assert_eq!(summary.evaluation, TEMPLATE_EVALUATION);
    }

    #[test]
    fn test_model_values_take_precedence() {
        let raw = raw_from(
            r#"```json
            {
              "notes": {"background": "Chemist turned analyst."},
              "evaluation": "Clear motivation and relevant projects.",
              "suitability": "strong",
              "readiness_flag": "needs_prep"
            }
            ```"#,
        );
        let answers = answers(&[("background", "I studied chemistry"), ("readiness", "ready now")]);
        let summary = SchemaCoercer::new().coerce(Some(&raw), &answers, "");

        assert_eq!(summary.notes.background, "Chemist turned analyst.");
        assert_eq!(summary.raw_answers.background, "I studied chemistry");
        assert_eq!(summary.evaluation, "Clear motivation and relevant projects.");
        assert_eq!(summary.suitability, Suitability::Strong);
        assert_eq!(summary.readiness_flag, ReadinessFlag::NeedsPrep);
    }

    #[test]
    fn test_invalid_model_literals_fall_back() {
        let raw = raw_from(r#"{"suitability": "Excellent", "readiness_flag": "tomorrow"}"#);
        let answers = answers(&[("readiness", "from January")]);
        let summary = SchemaCoercer::new().coerce(Some(&raw), &answers, "");
        assert_eq!(summary.suitability, Suitability::Weak);
        assert_eq!(summary.readiness_flag, ReadinessFlag::Date);
    }

    #[test]
    fn test_notes_truncate_long_answers() {
        let long = "word ".repeat(100);
        let summary = coerce_template(&[("experience", long.as_str())], "");
        assert!(summary.notes.experience.ends_with('…'));
        assert_eq!(summary.raw_answers.experience, long);
    }

    #[test]
    fn test_empty_input_is_schema_valid() {
        let summary = coerce_template(&[], "");
        let value = serde_json::to_value(&summary).unwrap();
        assert!(validate_summary_schema(&value).is_ok());
        assert_eq!(summary.readiness_flag, ReadinessFlag::Unknown);
        assert_eq!(summary.suitability, Suitability::Weak);
    }

    proptest! {
        #[test]
        fn prop_coercion_is_total_and_valid(
            background in ".{0,400}",
            motivation in ".{0,400}",
            readiness in ".{0,80}",
            evaluation in proptest::option::of(".{0,60}"),
            suitability in proptest::option::of("[a-z]{0,10}"),
        ) {
            let answers = answers(&[
                ("background", background.as_str()),
                ("motivation", motivation.as_str()),
                ("readiness", readiness.as_str()),
            ]);
            let raw = RawModelOutput {
                evaluation,
                suitability,
                ..Default::default()
            };
            let summary = SchemaCoercer::new().coerce(Some(&raw), &answers, "- Grit\n- Grit\n1. Care");

            prop_assert!(!summary.evaluation.trim().is_empty());
            prop_assert_eq!(summary.principles_alignment.len(), 2);
            for key in AnswerKey::ALL {
                prop_assert!(summary.notes.get(key).chars().count() <= NOTE_MAX_CHARS + 1);
            }
            let value = serde_json::to_value(&summary).unwrap();
            prop_assert!(validate_summary_schema(&value).is_ok());
        }
    }
}
