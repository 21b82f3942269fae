//! Runtime configuration.
//!
//! Loaded once at startup from an optional YAML file, then overlaid with
//! environment variables:
//!
//! | Variable                | Field                      |
//! |-------------------------|----------------------------|
//! | `LLM_BACKEND`           | `llm.backend`              |
//! | `OPENAI_API_KEY`        | OpenAI credential          |
//! | `OPENAI_MODEL`          | `llm.openai.model`         |
//! | `OPENAI_FALLBACK_MODEL` | `llm.openai.fallback_model` (empty disables) |
//! | `MISTRAL_API_KEY`       | Mistral credential         |
//! | `MISTRAL_MODEL`         | `llm.mistral.model`        |
//! | `MISTRAL_API_URL`       | `llm.mistral.base_url`     |
//!
//! Credentials are never read from the YAML file.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::providers::{ApiCredential, DEFAULT_MISTRAL_BASE_URL, DEFAULT_OPENAI_BASE_URL};

pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const MISTRAL_API_KEY_ENV: &str = "MISTRAL_API_KEY";

/// Errors raised while loading configuration or building the invoker.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unknown LLM backend '{0}': expected 'openai' or 'mistral'")]
    UnknownBackend(String),

    #[error("{name} not set: configure the {env_var} environment variable")]
    MissingCredential {
        name: &'static str,
        env_var: &'static str,
    },

    #[error("Backend '{0}' was not compiled in; enable the '{0}' feature")]
    BackendUnavailable(&'static str),

    #[error("Failed to initialize {backend} client: {message}")]
    Client {
        backend: &'static str,
        message: String,
    },
}

/// The closed set of supported backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    OpenAi,
    Mistral,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::OpenAi => "openai",
            BackendKind::Mistral => "mistral",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(BackendKind::OpenAi),
            "mistral" => Ok(BackendKind::Mistral),
            _ => Err(ConfigError::UnknownBackend(s.to_string())),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DebriefConfig {
    pub llm: LlmConfig,
    pub cache: CacheConfig,
    pub summary: SummaryConfig,
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// `openai` or `mistral`; validated when the invoker is built
    pub backend: String,

    #[serde(
        serialize_with = "serialize_duration",
        deserialize_with = "deserialize_duration"
    )]
    pub request_timeout: Duration,

    pub openai: OpenAiConfig,
    pub mistral: MistralConfig,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Mistral.as_str().to_string(),
            request_timeout: Duration::from_secs(30),
            openai: OpenAiConfig::default(),
            mistral: MistralConfig::default(),
        }
    }
}

impl LlmConfig {
    pub fn backend_kind(&self) -> Result<BackendKind, ConfigError> {
        self.backend.parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub model: String,

    /// Tried once when the primary model fails; `null` disables
    pub fallback_model: Option<String>,

    pub base_url: String,

    #[serde(skip)]
    pub api_key: Option<ApiCredential>,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            fallback_model: Some("gpt-4o".to_string()),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MistralConfig {
    pub model: String,
    pub base_url: String,

    #[serde(skip)]
    pub api_key: Option<ApiCredential>,
}

impl Default for MistralConfig {
    fn default() -> Self {
        Self {
            model: "mistral-medium-latest".to_string(),
            base_url: DEFAULT_MISTRAL_BASE_URL.to_string(),
            api_key: None,
        }
    }
}

/// On-disk response cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub dir: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: PathBuf::from(".llm_cache"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// When false the model is never called
    pub use_llm: bool,

    /// Pause before each model-backed summary
    #[serde(
        serialize_with = "serialize_duration",
        deserialize_with = "deserialize_duration"
    )]
    pub cooldown: Duration,

    /// Per-answer character cap applied to the prompt only
    pub answer_cap: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            use_llm: true,
            cooldown: Duration::from_millis(1500),
            answer_cap: 800,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub principles: PathBuf,
    pub faq: PathBuf,
    pub sessions: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            principles: PathBuf::from("data/principles.md"),
            faq: PathBuf::from("data/faq.md"),
            sessions: PathBuf::from("sessions"),
        }
    }
}

impl DebriefConfig {
    /// Parse YAML without applying environment overrides.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read a YAML file without applying environment overrides.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Load from an optional file, then apply process environment overrides.
    ///
    /// The backend name is validated here so a typo fails at startup.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_yaml_file(p)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.llm.backend_kind()?;

        tracing::debug!(
            backend = %config.llm.backend,
            use_llm = config.summary.use_llm,
            cache = config.cache.enabled,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Overlay values from an environment lookup. Empty values are ignored,
    /// except `OPENAI_FALLBACK_MODEL`, where empty disables the fallback.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(backend) = non_empty("LLM_BACKEND") {
            self.llm.backend = backend.trim().to_lowercase();
        }
        if let Some(model) = non_empty("OPENAI_MODEL") {
            self.llm.openai.model = model;
        }
        if let Some(fallback) = lookup("OPENAI_FALLBACK_MODEL") {
            let fallback = fallback.trim();
            self.llm.openai.fallback_model = (!fallback.is_empty()).then(|| fallback.to_string());
        }
        if let Some(model) = non_empty("MISTRAL_MODEL") {
            self.llm.mistral.model = model;
        }
        if let Some(url) = non_empty("MISTRAL_API_URL") {
            self.llm.mistral.base_url = url;
        }

        if let Some(key) = ApiCredential::from_lookup(&lookup, OPENAI_API_KEY_ENV, "OpenAI API key") {
            self.llm.openai.api_key = Some(key);
        }
        if let Some(key) =
            ApiCredential::from_lookup(&lookup, MISTRAL_API_KEY_ENV, "Mistral API key")
        {
            self.llm.mistral.api_key = Some(key);
        }
    }
}

/// Durations may be a humantime string (`"1s 500ms"`, `"30s"`) or a
/// number of seconds (`1.5`).
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDuration {
    Seconds(f64),
    Text(String),
}

fn deserialize_duration<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    match RawDuration::deserialize(deserializer)? {
        RawDuration::Seconds(secs) => Duration::try_from_secs_f64(secs)
            .map_err(|e| serde::de::Error::custom(format!("invalid duration {}: {}", secs, e))),
        RawDuration::Text(text) => humantime::parse_duration(text.trim())
            .map_err(|e| serde::de::Error::custom(format!("invalid duration '{}': {}", text, e))),
    }
}

fn serialize_duration<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&humantime::format_duration(*duration).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DebriefConfig::default();
        assert!(config.summary.use_llm);
        assert_eq!(config.summary.cooldown, Duration::from_millis(1500));
        assert_eq!(config.summary.answer_cap, 800);
        assert_eq!(config.llm.backend_kind().unwrap(), BackendKind::Mistral);
        assert_eq!(config.llm.openai.model, "gpt-4o-mini");
        assert_eq!(config.llm.openai.fallback_model.as_deref(), Some("gpt-4o"));
        assert_eq!(config.llm.mistral.model, "mistral-medium-latest");
        assert_eq!(config.llm.mistral.base_url, "https://api.mistral.ai");
        assert_eq!(config.llm.request_timeout, Duration::from_secs(30));
        assert_eq!(config.cache.dir, PathBuf::from(".llm_cache"));
        assert_eq!(config.paths.sessions, PathBuf::from("sessions"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
llm:
  backend: openai
  request_timeout: 10s
  openai:
    fallback_model: null
summary:
  cooldown: 1s 500ms
  answer_cap: 400
"#;
        let config = DebriefConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.llm.backend_kind().unwrap(), BackendKind::OpenAi);
        assert_eq!(config.llm.request_timeout, Duration::from_secs(10));
        assert_eq!(config.llm.openai.model, "gpt-4o-mini");
        assert!(config.llm.openai.fallback_model.is_none());
        assert_eq!(config.summary.cooldown, Duration::from_millis(1500));
        assert_eq!(config.summary.answer_cap, 400);
        assert!(config.cache.enabled);
    }

    #[test]
    fn test_example_config_parses() {
        let yaml = include_str!("../../../debrief.example.yaml");
        let config = DebriefConfig::from_yaml(yaml).unwrap();
        let defaults = DebriefConfig::default();
        assert_eq!(config.summary.cooldown, defaults.summary.cooldown);
        assert_eq!(config.llm.request_timeout, defaults.llm.request_timeout);
        assert_eq!(config.llm.openai.fallback_model, defaults.llm.openai.fallback_model);
        assert_eq!(config.paths.principles, defaults.paths.principles);
    }

    #[test]
    fn test_numeric_duration_seconds() {
        let config = DebriefConfig::from_yaml("summary:\n  cooldown: 0.25\n").unwrap();
        assert_eq!(config.summary.cooldown, Duration::from_millis(250));
    }

    #[test]
    fn test_invalid_duration_is_error() {
        let err = DebriefConfig::from_yaml("summary:\n  cooldown: soon\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = DebriefConfig::from_yaml("").unwrap();
        assert_eq!(config.summary.answer_cap, 800);
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let err = "anthropic".parse::<BackendKind>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownBackend(ref b) if b == "anthropic"));
        assert_eq!("  OpenAI ".parse::<BackendKind>().unwrap(), BackendKind::OpenAi);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = DebriefConfig::default();
        config.apply_env_overrides(env(&[
            ("LLM_BACKEND", "OpenAI"),
            ("OPENAI_API_KEY", "sk-abc"),
            ("OPENAI_MODEL", "gpt-4.1-mini"),
            ("MISTRAL_API_URL", "http://localhost:8080"),
            ("MISTRAL_MODEL", ""),
        ]));

        assert_eq!(config.llm.backend, "openai");
        assert_eq!(config.llm.openai.model, "gpt-4.1-mini");
        assert_eq!(config.llm.openai.api_key.as_ref().unwrap().expose(), "sk-abc");
        assert!(config.llm.mistral.api_key.is_none());
        assert_eq!(config.llm.mistral.base_url, "http://localhost:8080");
        assert_eq!(config.llm.mistral.model, "mistral-medium-latest");
    }

    #[test]
    fn test_empty_fallback_env_disables_fallback() {
        let mut config = DebriefConfig::default();
        config.apply_env_overrides(env(&[("OPENAI_FALLBACK_MODEL", "")]));
        assert!(config.llm.openai.fallback_model.is_none());
    }

    #[test]
    fn test_debug_does_not_leak_keys() {
        let mut config = DebriefConfig::default();
        config.apply_env_overrides(env(&[("MISTRAL_API_KEY", "mk-very-secret")]));
        let debug = format!("{:?}", config);
        assert!(!debug.contains("mk-very-secret"));
    }

    #[test]
    fn test_serialized_config_omits_keys() {
        let mut config = DebriefConfig::default();
        config.apply_env_overrides(env(&[("OPENAI_API_KEY", "sk-abc")]));
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(!yaml.contains("sk-abc"));
        assert!(yaml.contains("1s 500ms"));

        let back = DebriefConfig::from_yaml(&yaml).unwrap();
        assert_eq!(back.summary.cooldown, config.summary.cooldown);
    }
}
