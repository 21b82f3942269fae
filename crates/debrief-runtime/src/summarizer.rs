//! The summarization pipeline.
//!
//! `Summarizer::summarize` is the single recovery boundary: any model
//! failure is logged and replaced by the template summary, so callers
//! always get a schema-valid record and its markdown.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use debrief_core::{
    summarize_model_text, summarize_template, validate_summary_schema, AnswerSet, SummaryOutput,
};

use crate::config::SummaryConfig;
use crate::invoker::ModelInvoker;
use crate::prompts::build_summary_prompt;
use crate::usage::LlmUsage;

/// Read a markdown input such as the principles or FAQ file.
///
/// A missing, unreadable or empty file yields an empty string.
pub fn load_text_file(path: &Path, what: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(text) if text.trim().is_empty() => {
            tracing::warn!(path = %path.display(), "{} file is empty", what);
            String::new()
        }
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "{} file unavailable", what);
            String::new()
        }
    }
}

/// Turns an answer set into a structured summary and markdown.
#[derive(Debug)]
pub struct Summarizer {
    invoker: Option<Arc<ModelInvoker>>,
    principles_text: String,
    use_llm: bool,
    cooldown: Duration,
    answer_cap: usize,
}

impl Summarizer {
    /// Create a summarizer. Without an invoker, every summary is a template.
    pub fn new(
        settings: &SummaryConfig,
        invoker: Option<Arc<ModelInvoker>>,
        principles_text: impl Into<String>,
    ) -> Self {
        Self {
            invoker,
            principles_text: principles_text.into(),
            use_llm: settings.use_llm,
            cooldown: settings.cooldown,
            answer_cap: settings.answer_cap,
        }
    }

    /// A summarizer that never calls a model.
    pub fn template_only(principles_text: impl Into<String>) -> Self {
        let settings = SummaryConfig {
            use_llm: false,
            ..SummaryConfig::default()
        };
        Self::new(&settings, None, principles_text)
    }

    pub fn principles_text(&self) -> &str {
        &self.principles_text
    }

    /// Whether `summarize` will reach the model.
    pub fn uses_model(&self) -> bool {
        self.use_llm && self.invoker.is_some()
    }

    /// Usage of the shared invoker, if any.
    pub fn usage(&self) -> Option<LlmUsage> {
        self.invoker.as_ref().map(|i| i.usage())
    }

    /// Summarize `answers`. Never fails.
    pub async fn summarize(&self, answers: &AnswerSet) -> SummaryOutput {
        let output = match self.invoker.as_deref().filter(|_| self.use_llm) {
            Some(invoker) => self.summarize_with_model(invoker, answers).await,
            None => {
                tracing::info!("Model disabled, building template summary");
                summarize_template(answers, &self.principles_text)
            }
        };

        match serde_json::to_value(&output.summary) {
            Ok(value) => {
                if let Err(violations) = validate_summary_schema(&value) {
                    tracing::error!(violations = ?violations, "Summary failed schema validation");
                }
            }
            Err(e) => tracing::error!(error = %e, "Summary could not be serialized"),
        }

        output
    }

    async fn summarize_with_model(&self, invoker: &ModelInvoker, answers: &AnswerSet) -> SummaryOutput {
        if !self.cooldown.is_zero() {
            tracing::debug!(cooldown = ?self.cooldown, "Cooling down before model call");
            tokio::time::sleep(self.cooldown).await;
        }

        let prompt = build_summary_prompt(answers, &self.principles_text, self.answer_cap);
        match invoker.generate(&prompt).await {
            Ok(text) => summarize_model_text(&text, answers, &self.principles_text),
            Err(e) => {
                tracing::warn!(
                    backend = %invoker.backend().kind(),
                    error = %e,
                    "Model summary failed, falling back to template"
                );
                summarize_template(answers, &self.principles_text)
            }
        }
    }
}
