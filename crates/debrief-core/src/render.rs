//! Markdown projection of a structured summary.
//!
//! Rendering is a pure function of the summary: the same record always
//! renders to byte-identical text.

use crate::summary::StructuredSummary;
use crate::types::AnswerKey;

/// Placeholder shown for a principle with no evidence.
pub const NO_EVIDENCE: &str = "—";

/// Render the condensed candidate review.
pub fn render_markdown(summary: &StructuredSummary) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(12 + summary.principles_alignment.len());
    lines.push("### Candidate Review (Condensed)".to_string());

    for key in AnswerKey::ALL {
        let note = summary.notes.get(key);
        if key == AnswerKey::Readiness {
            lines.push(format!(
                "- **{}:** {}  (_flag_: {})",
                key.label(),
                note,
                summary.readiness_flag
            ));
        } else {
            lines.push(format!("- **{}:** {}", key.label(), note));
        }
    }

    lines.push(String::new());
    lines.push(format!("**Evaluation:** {}", summary.evaluation));
    lines.push(format!(
        "**Suitability:** {}",
        summary.suitability.as_str().to_uppercase()
    ));
    lines.push(String::new());
    lines.push(
        "_Full raw answers are stored in the session JSON under `summary.raw_answers`._"
            .to_string(),
    );

    if !summary.principles_alignment.is_empty() {
        lines.push(String::new());
        lines.push("### Principles Alignment".to_string());
        for (name, evidence) in summary.principles_alignment.iter() {
            let evidence = if evidence.is_empty() { NO_EVIDENCE } else { evidence };
            lines.push(format!("- **{}:** {}", name, evidence));
        }
    }

    lines.join("\n")
}
