//! Prompts for the summary and FAQ calls.
//!
//! The summary prompt asks for a single JSON object with exactly the six
//! summary keys. Whatever comes back is still run through extraction and
//! coercion, so the prompt is a request, not a guarantee.

use debrief_core::{truncate_chars, AnswerSet};
use serde_json::{Map, Value};

/// System message the OpenAI backend sends ahead of every prompt.
pub const OPENAI_SYSTEM_MESSAGE: &str = "You are a helpful admissions assistant.";

/// Leading instructions of the summary prompt.
pub const SUMMARY_SYSTEM_PROMPT: &str = "You are an admissions assistant for a data/AI bootcamp. \
Return STRICT JSON only. Do not include any prose outside JSON.";

/// Substituted when no principles file content is available.
pub const NO_PRINCIPLES: &str = "(no principles provided)";

/// Substituted when no FAQ content is available.
pub const NO_FAQ_CONTEXT: &str = "(No FAQ context provided.)";

/// Non-empty answers, each capped to `cap` characters.
pub fn cap_answers(answers: &AnswerSet, cap: usize) -> Map<String, Value> {
    answers
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| (k.to_string(), Value::String(truncate_chars(v, cap))))
        .collect()
}

/// Build the full summary prompt.
pub fn build_summary_prompt(answers: &AnswerSet, principles_text: &str, answer_cap: usize) -> String {
    let answers_json = Value::Object(cap_answers(answers, answer_cap)).to_string();
    let principles_text = if principles_text.trim().is_empty() {
        NO_PRINCIPLES
    } else {
        principles_text
    };

    format!(
        r#"{system}

You will evaluate a candidate's interview **only** using the answers below and the provided principles.
Do **not** invent information. If there is **no clear supporting evidence** for a principle in the answers, leave that principle's value as an empty string.

Candidate answers (JSON):
{answers_json}

Evaluation principles (markdown list items):
{principles_text}

Return a single JSON object with EXACT keys:
{{
  "raw_answers": {{
    "background": "",
    "motivation": "",
    "experience": "",
    "future_goals": "",
    "readiness": ""
  }},
  "notes": {{
    "background": "1-2 sentence note based strictly on answers",
    "motivation": "1-2 sentence note",
    "experience": "1-2 sentence note",
    "future_goals": "1-2 sentence note",
    "readiness": "1-2 sentence note"
  }},
  "evaluation": "Overall suitability notes (2-4 sentences, grounded in answers).",
  "suitability": "strong|average|weak",
  "readiness_flag": "ready_now|date|needs_prep|unknown",
  "principles_alignment": {{
    "<principle name exactly as listed>": "short evidence from the interview (1 sentence max) or empty string"
  }}
}}

Rules:
- Use **only** the provided answers for evidence; do not assume background knowledge.
- If a principle is **not** covered by any answer, set its value to "" (empty string).
- Keep notes concise and factual.
- Output **STRICT JSON only** (no markdown fences or extra text).
"#,
        system = SUMMARY_SYSTEM_PROMPT,
        answers_json = answers_json,
        principles_text = principles_text,
    )
}

/// Build a prompt answering `question` from the FAQ text alone.
pub fn build_faq_prompt(faq_text: &str, question: &str) -> String {
    let faq_text = if faq_text.trim().is_empty() {
        NO_FAQ_CONTEXT
    } else {
        faq_text.trim()
    };

    format!(
        "You are an admissions assistant. Answer the user's question using ONLY this program FAQ:\n\n{}\n\nQuestion: {}\n\nAnswer:",
        faq_text, question
    )
}
