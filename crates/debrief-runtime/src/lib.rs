//! # debrief-runtime
//!
//! The model-backed half of debrief.
//!
//! `debrief-core` is fully deterministic and never makes network calls. This
//! crate adds the pieces that talk to a language model: providers, the
//! response cache, the invoker with its one-shot fallback, and the
//! summarizer pipeline that degrades to the template summary when the model
//! is unavailable.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use debrief_runtime::{DebriefConfig, ModelInvoker, Summarizer};
//!
//! let config = DebriefConfig::load(None)?;
//! let invoker = Arc::new(ModelInvoker::from_config(&config)?);
//! let summarizer = Summarizer::new(&config.summary, Some(invoker), "- Curiosity\n- Grit");
//!
//! let output = summarizer.summarize(&answers).await;
//! println!("{}", output.markdown);
//! ```

pub mod cache;
pub mod config;
pub mod faq;
pub mod invoker;
pub mod prompts;
pub mod providers;
pub mod summarizer;
pub mod usage;

pub use cache::{cache_key, ResponseCache};
pub use config::{
    BackendKind, CacheConfig, ConfigError, DebriefConfig, LlmConfig, MistralConfig, OpenAiConfig,
    PathsConfig, SummaryConfig,
};
pub use faq::FaqResponder;
pub use invoker::{Backend, GenerationError, ModelInvoker};
pub use providers::{
    ApiCredential, ChatMessage, CompletionConfig, CompletionResponse, CredentialSource,
    LlmProvider, ProviderError, TokenUsage,
};
pub use summarizer::{load_text_file, Summarizer};
pub use usage::{LlmUsage, UsageTracker};
