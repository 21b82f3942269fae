//! Candidate Q&A exchanges and their markdown rendering.

use serde::{Deserialize, Serialize};

/// Replies that end the FAQ loop (compared case-insensitively).
pub const EXIT_WORDS: [&str; 4] = ["no", "done", "nothing", "exit"];

/// One question answered from the program FAQ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqExchange {
    pub question: String,
    pub answer: String,
}

impl FaqExchange {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// True when the candidate is done asking questions.
pub fn is_exit_command(input: &str) -> bool {
    let input = input.trim();
    input.is_empty() || EXIT_WORDS.iter().any(|w| input.eq_ignore_ascii_case(w))
}

/// Render exchanges as a `### Candidate Q&A` section.
///
/// Returns an empty string when there were no exchanges.
pub fn render_faq_markdown(exchanges: &[FaqExchange]) -> String {
    if exchanges.is_empty() {
        return String::new();
    }

    let mut lines = vec!["\n### Candidate Q&A\n".to_string()];
    lines.extend(
        exchanges
            .iter()
            .map(|e| format!("- **Q:** {}\n  **A:** {}", e.question, e.answer)),
    );
    lines.join("\n")
}

/// Append a rendered FAQ section below the summary, separated by a rule.
pub fn append_faq_section(summary_markdown: &str, faq_markdown: &str) -> String {
    if faq_markdown.is_empty() {
        return summary_markdown.to_string();
    }
    format!("{}\n---\n{}", summary_markdown, faq_markdown)
}
