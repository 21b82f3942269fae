//! # debrief-core
//!
//! Deterministic half of the interview debrief pipeline.
//!
//! This crate turns a candidate's interview answers (and, optionally, whatever
//! a language model said about them) into a structured, schema-valid summary
//! and a reviewer-friendly markdown rendering.
//!
//! ## Key Guarantees
//!
//! 1. **Total**: coercion never fails; every field has a default derived from the answers
//! 2. **No network**: model calls live in `debrief-runtime`
//! 3. **Deterministic rendering**: the same summary always renders to the same text
//!
//! ## Example
//!
//! ```rust,ignore
//! use debrief_core::{summarize_template, AnswerSet};
//!
//! let answers: AnswerSet = [("readiness", "I can start next month")].into_iter().collect();
//! let output = summarize_template(&answers, "- Curiosity\n- Grit");
//!
//! assert_eq!(output.summary.readiness_flag.as_str(), "date");
//! println!("{}", output.markdown);
//! ```

pub mod coerce;
pub mod extract;
pub mod faq;
pub mod interview;
pub mod model_output;
pub mod principles;
pub mod render;
pub mod session;
pub mod summary;
pub mod text;
pub mod types;

// Re-export main types at crate root
pub use coerce::{SchemaCoercer, TEMPLATE_EVALUATION};
pub use extract::{extract_json_object, JsonObject, ResponseExtractor};
pub use faq::{append_faq_section, is_exit_command, render_faq_markdown, FaqExchange};
pub use interview::{
    AnswerOutcome, InterviewSession, Question, Role, SessionMetadata, SessionSnapshot, Turn,
    REQUIRED_QUESTIONS,
};
pub use model_output::RawModelOutput;
pub use principles::parse_principles;
pub use render::render_markdown;
pub use session::{SavedSession, SessionError, SessionRecord, SessionStore};
pub use summary::{
    is_valid_summary, validate_summary_schema, PrinciplesAlignment, SchemaError,
    StructuredSummary,
};
pub use text::{shorten, truncate_chars};
pub use types::{AnswerFields, AnswerKey, AnswerSet, ReadinessFlag, Suitability};

use serde::{Deserialize, Serialize};

/// A finished summary together with its markdown rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryOutput {
    pub markdown: String,
    pub summary: StructuredSummary,
}

impl SummaryOutput {
    /// Render `summary` and pair the two.
    pub fn from_summary(summary: StructuredSummary) -> Self {
        Self {
            markdown: render_markdown(&summary),
            summary,
        }
    }
}

/// Summarize without a model: heuristics and raw answers only.
pub fn summarize_template(answers: &AnswerSet, principles_text: &str) -> SummaryOutput {
    let summary = SchemaCoercer::new().coerce(None, answers, principles_text);
    SummaryOutput::from_summary(summary)
}

/// Summarize from raw model text.
///
/// Text with no recoverable JSON object degrades to the template summary.
pub fn summarize_model_text(
    text: &str,
    answers: &AnswerSet,
    principles_text: &str,
) -> SummaryOutput {
    let raw = ResponseExtractor::new()
        .extract(text)
        .map(|obj| RawModelOutput::from_object(&obj));
    if raw.is_none() {
        tracing::warn!("No JSON object found in model output, using template values");
    }

    let summary = SchemaCoercer::new().coerce(raw.as_ref(), answers, principles_text);
    SummaryOutput::from_summary(summary)
}
