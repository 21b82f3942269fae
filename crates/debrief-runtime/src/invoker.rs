//! Backend-agnostic text generation with caching and a one-shot fallback.
//!
//! ```text
//! generate(prompt)
//!   -> cache hit?        return cached text
//!   -> primary model     ok: cache + return
//!   -> fallback model    (OpenAI only, at most once) ok: cache + return
//!   -> GenerationError
//! ```
//!
//! There is no retry loop and no backoff. The cache key always uses the
//! primary model, even when the fallback produced the text.

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::cache::{cache_key, ResponseCache};
use crate::config::{BackendKind, ConfigError, DebriefConfig};
use crate::prompts::OPENAI_SYSTEM_MESSAGE;
use crate::providers::{ChatMessage, CompletionConfig, LlmProvider, ProviderError};
use crate::usage::{LlmUsage, UsageTracker};

/// Temperature for OpenAI requests.
pub const OPENAI_TEMPERATURE: f32 = 0.0;

/// Temperature for Mistral requests.
pub const MISTRAL_TEMPERATURE: f32 = 0.2;

/// Completion cap for Mistral requests.
pub const MISTRAL_MAX_TOKENS: u32 = 500;

/// Failure of a generation after the fallback policy ran.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("{backend} model {model} failed: {source}")]
    Provider {
        backend: &'static str,
        model: String,
        #[source]
        source: ProviderError,
    },

    #[error("primary model {primary_model} failed ({primary_error}); fallback {fallback_model} failed: {source}")]
    FallbackFailed {
        primary_model: String,
        primary_error: ProviderError,
        fallback_model: String,
        #[source]
        source: ProviderError,
    },
}

/// The configured backend. Only OpenAI can carry a fallback model.
pub enum Backend {
    OpenAi {
        provider: Arc<dyn LlmProvider>,
        primary_model: String,
        fallback_model: Option<String>,
    },
    Mistral {
        provider: Arc<dyn LlmProvider>,
        model: String,
    },
}

impl Backend {
    pub fn kind(&self) -> BackendKind {
        match self {
            Backend::OpenAi { .. } => BackendKind::OpenAi,
            Backend::Mistral { .. } => BackendKind::Mistral,
        }
    }

    /// Model whose name keys the cache.
    pub fn primary_model(&self) -> &str {
        match self {
            Backend::OpenAi { primary_model, .. } => primary_model,
            Backend::Mistral { model, .. } => model,
        }
    }

    fn provider(&self) -> &dyn LlmProvider {
        match self {
            Backend::OpenAi { provider, .. } | Backend::Mistral { provider, .. } => provider.as_ref(),
        }
    }

    fn messages(&self, prompt: &str) -> Vec<ChatMessage> {
        match self {
            Backend::OpenAi { .. } => vec![
                ChatMessage::system(OPENAI_SYSTEM_MESSAGE),
                ChatMessage::user(prompt),
            ],
            Backend::Mistral { .. } => vec![ChatMessage::user(prompt)],
        }
    }

    fn completion_config(&self, model: &str, timeout: Duration) -> CompletionConfig {
        let config = CompletionConfig::new(model).with_timeout(timeout);
        match self {
            Backend::OpenAi { .. } => config.with_temperature(OPENAI_TEMPERATURE),
            Backend::Mistral { .. } => config
                .with_temperature(MISTRAL_TEMPERATURE)
                .with_max_tokens(MISTRAL_MAX_TOKENS),
        }
    }

    /// Build the configured backend, checking its credential.
    pub fn from_config(config: &DebriefConfig) -> Result<Self, ConfigError> {
        match config.llm.backend_kind()? {
            BackendKind::OpenAi => {
                let openai = &config.llm.openai;
                let credential = openai.api_key.clone().ok_or(ConfigError::MissingCredential {
                    name: "OpenAI API key",
                    env_var: crate::config::OPENAI_API_KEY_ENV,
                })?;
                Ok(Backend::OpenAi {
                    provider: openai_provider(credential, &openai.base_url)?,
                    primary_model: openai.model.clone(),
                    fallback_model: openai
                        .fallback_model
                        .clone()
                        .filter(|m| !m.trim().is_empty()),
                })
            }
            BackendKind::Mistral => {
                let mistral = &config.llm.mistral;
                let credential = mistral.api_key.clone().ok_or(ConfigError::MissingCredential {
                    name: "Mistral API key",
                    env_var: crate::config::MISTRAL_API_KEY_ENV,
                })?;
                Ok(Backend::Mistral {
                    provider: mistral_provider(credential, &mistral.base_url)?,
                    model: mistral.model.clone(),
                })
            }
        }
    }
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::OpenAi {
                provider,
                primary_model,
                fallback_model,
            } => f
                .debug_struct("OpenAi")
                .field("provider", &provider.name())
                .field("primary_model", primary_model)
                .field("fallback_model", fallback_model)
                .finish(),
            Backend::Mistral { provider, model } => f
                .debug_struct("Mistral")
                .field("provider", &provider.name())
                .field("model", model)
                .finish(),
        }
    }
}

#[cfg(feature = "openai")]
fn openai_provider(
    credential: crate::providers::ApiCredential,
    base_url: &str,
) -> Result<Arc<dyn LlmProvider>, ConfigError> {
    let provider = crate::providers::OpenAiProvider::new(credential, base_url).map_err(|e| {
        ConfigError::Client {
            backend: "openai",
            message: e.to_string(),
        }
    })?;
    Ok(Arc::new(provider))
}

#[cfg(not(feature = "openai"))]
fn openai_provider(
    _credential: crate::providers::ApiCredential,
    _base_url: &str,
) -> Result<Arc<dyn LlmProvider>, ConfigError> {
    Err(ConfigError::BackendUnavailable("openai"))
}

#[cfg(feature = "mistral")]
fn mistral_provider(
    credential: crate::providers::ApiCredential,
    base_url: &str,
) -> Result<Arc<dyn LlmProvider>, ConfigError> {
    let provider = crate::providers::MistralProvider::new(credential, base_url).map_err(|e| {
        ConfigError::Client {
            backend: "mistral",
            message: e.to_string(),
        }
    })?;
    Ok(Arc::new(provider))
}

#[cfg(not(feature = "mistral"))]
fn mistral_provider(
    _credential: crate::providers::ApiCredential,
    _base_url: &str,
) -> Result<Arc<dyn LlmProvider>, ConfigError> {
    Err(ConfigError::BackendUnavailable("mistral"))
}

/// Calls the configured backend, consulting the response cache first.
#[derive(Debug)]
pub struct ModelInvoker {
    backend: Backend,
    cache: Option<ResponseCache>,
    timeout: Duration,
    usage: UsageTracker,
}

impl ModelInvoker {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            cache: None,
            timeout: Duration::from_secs(30),
            usage: UsageTracker::new(),
        }
    }

    pub fn with_cache(mut self, cache: ResponseCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build from configuration. Fails on an unknown backend or a missing key.
    pub fn from_config(config: &DebriefConfig) -> Result<Self, ConfigError> {
        let backend = Backend::from_config(config)?;
        tracing::info!(
            backend = %backend.kind(),
            model = backend.primary_model(),
            "Model backend ready"
        );

        let mut invoker = Self::new(backend).with_timeout(config.llm.request_timeout);
        if config.cache.enabled {
            invoker = invoker.with_cache(ResponseCache::new(&config.cache.dir));
        }
        Ok(invoker)
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    pub fn usage(&self) -> LlmUsage {
        self.usage.snapshot()
    }

    /// Generate text for `prompt`.
    pub async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let key = cache_key(self.backend.primary_model(), prompt);

        if let Some(cache) = &self.cache {
            if let Some(text) = cache.get(&key).await {
                tracing::debug!(key = %key, "Response cache hit");
                self.usage.record_cache_hit();
                return Ok(text);
            }
        }

        let text = match &self.backend {
            Backend::OpenAi {
                primary_model,
                fallback_model,
                ..
            } => match self.call(primary_model, prompt).await {
                Ok(text) => text,
                Err(primary_error) => {
                    let Some(fallback_model) = fallback_model else {
                        return Err(GenerationError::Provider {
                            backend: "openai",
                            model: primary_model.clone(),
                            source: primary_error,
                        });
                    };

                    tracing::warn!(
                        model = %primary_model,
                        fallback = %fallback_model,
                        error = %primary_error,
                        "Primary model failed, trying fallback"
                    );
                    self.usage.record_fallback();

                    self.call(fallback_model, prompt).await.map_err(|source| {
                        GenerationError::FallbackFailed {
                            primary_model: primary_model.clone(),
                            primary_error,
                            fallback_model: fallback_model.clone(),
                            source,
                        }
                    })?
                }
            },
            Backend::Mistral { model, .. } => {
                self.call(model, prompt)
                    .await
                    .map_err(|source| GenerationError::Provider {
                        backend: "mistral",
                        model: model.clone(),
                        source,
                    })?
            }
        };

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.put(&key, &text).await {
                tracing::warn!(error = %e, "Failed to write response cache entry");
            }
        }

        Ok(text)
    }

    async fn call(&self, model: &str, prompt: &str) -> Result<String, ProviderError> {
        let provider = self.backend.provider();
        let config = self.backend.completion_config(model, self.timeout);

        match provider.complete(self.backend.messages(prompt), &config).await {
            Ok(response) => {
                tracing::debug!(
                    provider = provider.name(),
                    model = %response.model,
                    prompt_tokens = response.usage.prompt_tokens,
                    completion_tokens = response.usage.completion_tokens,
                    "Completion received"
                );
                self.usage.record_success(&response.usage);
                Ok(response.content)
            }
            Err(e) => {
                self.usage.record_failure();
                Err(e)
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::MockProvider;
    use super::*;
    use crate::providers::{ApiCredential, CredentialSource};

    fn openai(provider: Arc<MockProvider>, fallback: Option<&str>) -> ModelInvoker {
        ModelInvoker::new(Backend::OpenAi {
            provider,
            primary_model: "gpt-4o-mini".to_string(),
            fallback_model: fallback.map(str::to_string),
        })
    }

    fn mistral(provider: Arc<MockProvider>) -> ModelInvoker {
        ModelInvoker::new(Backend::Mistral {
            provider,
            model: "mistral-medium-latest".to_string(),
        })
    }

    #[tokio::test]
    async fn test_openai_primary_success() {
        let provider = Arc::new(MockProvider::new().reply("gpt-4o-mini", "primary text"));
        let invoker = openai(provider.clone(), Some("gpt-4o"));

        assert_eq!(invoker.generate("prompt").await.unwrap(), "primary text");
        assert_eq!(provider.models_called(), vec!["gpt-4o-mini"]);

        let requests = provider.requests.lock();
        let (messages, config) = &requests[0];
        assert_eq!(messages[0], ChatMessage::system(OPENAI_SYSTEM_MESSAGE));
        assert_eq!(messages[1], ChatMessage::user("prompt"));
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.max_tokens, None);
    }

    #[tokio::test]
    async fn test_openai_fallback_used_once() {
        let provider = Arc::new(
            MockProvider::new()
                .fail("gpt-4o-mini", 500)
                .reply("gpt-4o", "fallback text"),
        );
        let invoker = openai(provider.clone(), Some("gpt-4o"));

        assert_eq!(invoker.generate("prompt").await.unwrap(), "fallback text");
        assert_eq!(provider.models_called(), vec!["gpt-4o-mini", "gpt-4o"]);
        assert_eq!(invoker.usage().fallbacks, 1);
        assert_eq!(invoker.usage().failed_calls, 1);
    }

    #[tokio::test]
    async fn test_openai_both_fail() {
        let provider = Arc::new(
            MockProvider::new()
                .fail("gpt-4o-mini", 429)
                .fail("gpt-4o", 503),
        );
        let invoker = openai(provider.clone(), Some("gpt-4o"));

        let err = invoker.generate("prompt").await.unwrap_err();
        match err {
            GenerationError::FallbackFailed {
                primary_error,
                source,
                ..
            } => {
                assert!(matches!(primary_error, ProviderError::RateLimited { .. }));
                assert!(matches!(source, ProviderError::ApiError { status: 503, .. }));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        // Exactly one fallback attempt, no further retries.
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_openai_without_fallback_propagates() {
        let provider = Arc::new(MockProvider::new().fail("gpt-4o-mini", 500));
        let invoker = openai(provider.clone(), None);

        let err = invoker.generate("prompt").await.unwrap_err();
        assert!(matches!(err, GenerationError::Provider { backend: "openai", .. }));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_mistral_has_no_fallback() {
        let provider = Arc::new(MockProvider::new().fail("mistral-medium-latest", 500));
        let invoker = mistral(provider.clone());

        let err = invoker.generate("prompt").await.unwrap_err();
        assert!(matches!(err, GenerationError::Provider { backend: "mistral", .. }));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_mistral_request_shape() {
        let provider = Arc::new(MockProvider::new().reply("mistral-medium-latest", "ok"));
        let invoker = mistral(provider.clone());
        invoker.generate("prompt").await.unwrap();

        let requests = provider.requests.lock();
        let (messages, config) = &requests[0];
        assert_eq!(messages, &vec![ChatMessage::user("prompt")]);
        assert_eq!(config.temperature, MISTRAL_TEMPERATURE);
        assert_eq!(config.max_tokens, Some(MISTRAL_MAX_TOKENS));
    }

    #[tokio::test]
    async fn test_cache_hit_makes_single_call() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(MockProvider::new().reply("mistral-medium-latest", "cached body"));
        let invoker = mistral(provider.clone()).with_cache(ResponseCache::new(dir.path()));

        assert_eq!(invoker.generate("same prompt").await.unwrap(), "cached body");
        assert_eq!(invoker.generate("same prompt").await.unwrap(), "cached body");

        assert_eq!(provider.calls(), 1);
        assert_eq!(invoker.usage().cache_hits, 1);
        let entry = dir
            .path()
            .join(format!("{}.txt", cache_key("mistral-medium-latest", "same prompt")));
        assert_eq!(std::fs::read_to_string(entry).unwrap(), "cached body");
    }

    #[tokio::test]
    async fn test_fallback_text_cached_under_primary_model() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(
            MockProvider::new()
                .fail("gpt-4o-mini", 500)
                .reply("gpt-4o", "from fallback"),
        );
        let invoker =
            openai(provider.clone(), Some("gpt-4o")).with_cache(ResponseCache::new(dir.path()));

        invoker.generate("p").await.unwrap();
        let entry = dir.path().join(format!("{}.txt", cache_key("gpt-4o-mini", "p")));
        assert_eq!(std::fs::read_to_string(entry).unwrap(), "from fallback");
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(MockProvider::new().fail("mistral-medium-latest", 500));
        let invoker = mistral(provider.clone()).with_cache(ResponseCache::new(dir.path()));

        assert!(invoker.generate("p").await.is_err());
        assert!(invoker.generate("p").await.is_err());
        assert_eq!(provider.calls(), 2);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_credential_is_config_error() {
        let config = DebriefConfig::default();
        let err = ModelInvoker::from_config(&config).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingCredential {
                env_var: "MISTRAL_API_KEY",
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_backend_is_config_error() {
        let mut config = DebriefConfig::default();
        config.llm.backend = "gemini".to_string();
        let err = ModelInvoker::from_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownBackend(_)));
    }

    #[cfg(feature = "openai")]
    #[test]
    fn test_openai_from_config() {
        let mut config = DebriefConfig::default();
        config.llm.backend = "openai".to_string();
        config.llm.openai.api_key = Some(ApiCredential::new(
            "sk-test",
            CredentialSource::Programmatic,
            "OpenAI API key",
        ));
        config.llm.openai.fallback_model = Some(String::new());

        let invoker = ModelInvoker::from_config(&config).unwrap();
        match invoker.backend() {
            Backend::OpenAi {
                primary_model,
                fallback_model,
                ..
            } => {
                assert_eq!(primary_model, "gpt-4o-mini");
                assert!(fallback_model.is_none());
            }
            other => panic!("unexpected backend {:?}", other),
        }
    }
}
