//! `debrief summarize`: summarize a stored answer set.

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;

use debrief_core::{AnswerSet, SummaryOutput};
use debrief_runtime::Summarizer;

/// Read answers from a JSON file.
///
/// Accepts a bare answers object, `{"answers": {...}}`, or a saved session
/// record (`{"session": {"answers": {...}}}`).
pub fn load_answers(path: &Path) -> Result<AnswerSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read answers file {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;

    let answers = value
        .pointer("/session/answers")
        .or_else(|| value.get("answers"))
        .unwrap_or(&value);

    serde_json::from_value(answers.clone())
        .with_context(|| format!("{} does not hold an answers object", path.display()))
}

/// Summarize and format for printing.
pub async fn summarize_file(summarizer: &Summarizer, path: &Path, json: bool) -> Result<String> {
    let answers = load_answers(path)?;
    tracing::info!(answers = answers.len(), path = %path.display(), "Summarizing answers");

    let output: SummaryOutput = summarizer.summarize(&answers).await;
    if json {
        serde_json::to_string_pretty(&output).context("Failed to serialize summary")
    } else {
        Ok(output.markdown)
    }
}
