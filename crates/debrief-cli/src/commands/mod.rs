//! Subcommand implementations and the shared application context.

pub mod faq;
pub mod interview;
pub mod summarize;

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

use debrief_runtime::{load_text_file, DebriefConfig, FaqResponder, ModelInvoker, Summarizer};

/// Configuration plus the model invoker, built once per run.
pub struct AppContext {
    pub config: DebriefConfig,
    pub invoker: Option<Arc<ModelInvoker>>,
}

impl AppContext {
    /// Load configuration and, unless the model is disabled, build the invoker.
    ///
    /// A missing credential or unknown backend is fatal here.
    pub fn load(config_path: Option<&Path>, no_llm: bool) -> Result<Self> {
        let mut config = DebriefConfig::load(config_path).context("Failed to load configuration")?;
        if no_llm {
            config.summary.use_llm = false;
        }
        Self::from_config(config)
    }

    pub fn from_config(config: DebriefConfig) -> Result<Self> {
        let invoker = if config.summary.use_llm {
            let invoker =
                ModelInvoker::from_config(&config).context("Failed to set up the model backend")?;
            Some(Arc::new(invoker))
        } else {
            None
        };
        Ok(Self { config, invoker })
    }

    pub fn summarizer(&self) -> Summarizer {
        let principles = load_text_file(&self.config.paths.principles, "Principles");
        Summarizer::new(&self.config.summary, self.invoker.clone(), principles)
    }

    /// FAQ answering needs a model; `None` when it is disabled.
    pub fn faq_responder(&self) -> Option<FaqResponder> {
        let invoker = self.invoker.clone()?;
        let faq_text = load_text_file(&self.config.paths.faq, "FAQ");
        Some(FaqResponder::new(invoker, faq_text))
    }

    /// Log accumulated model usage, if a model was configured.
    pub fn log_usage(&self) {
        if let Some(invoker) = &self.invoker {
            let usage = invoker.usage();
            tracing::info!(
                calls = usage.llm_calls,
                failed = usage.failed_calls,
                total_tokens = usage.total_tokens,
                cache_hits = usage.cache_hits,
                fallbacks = usage.fallbacks,
                "Model usage"
            );
        }
    }
}
