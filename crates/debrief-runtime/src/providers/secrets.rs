//! Secure credential handling for LLM providers.
//!
//! Keys are wrapped in [`SecretString`] as soon as they are read and are only
//! exposed at the point where an HTTP header is built.
//!
//! ```ignore
//! let cred = ApiCredential::from_env("MISTRAL_API_KEY", "Mistral API key")
//!     .ok_or(ConfigError::MissingCredential { .. })?;
//!
//! request.bearer_auth(cred.expose());
//! ```

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// Where a credential was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Loaded from an environment variable (or `.env`)
    Environment,
    /// Provided programmatically
    Programmatic,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Environment => write!(f, "environment"),
            CredentialSource::Programmatic => write!(f, "programmatic"),
        }
    }
}

/// A securely-stored API credential.
///
/// Debug and Display show `[REDACTED]`; the value is zeroed on drop.
pub struct ApiCredential {
    value: SecretString,
    source: CredentialSource,
    name: &'static str,
}

impl ApiCredential {
    /// Wrap a raw key.
    pub fn new(value: impl Into<String>, source: CredentialSource, name: &'static str) -> Self {
        Self {
            value: SecretString::from(value.into()),
            source,
            name,
        }
    }

    /// Read a credential from an environment variable.
    ///
    /// Unset and empty variables both yield `None`.
    pub fn from_env(env_var: &str, name: &'static str) -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), env_var, name)
    }

    /// Read a credential through an arbitrary variable lookup.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        env_var: &str,
        name: &'static str,
    ) -> Option<Self> {
        lookup(env_var)
            .filter(|v| !v.trim().is_empty())
            .map(|v| Self::new(v.trim(), CredentialSource::Environment, name))
    }

    /// Expose the credential value for use in an API call.
    ///
    /// Only call this where the header is built. Never store the result.
    pub fn expose(&self) -> &str {
        self.value.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.value.expose_secret().is_empty()
    }

    pub fn source(&self) -> CredentialSource {
        self.source
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Clone for ApiCredential {
    fn clone(&self) -> Self {
        Self::new(self.expose(), self.source, self.name)
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredential")
            .field("value", &"[REDACTED]")
            .field("source", &self.source)
            .field("name", &self.name)
            .finish()
    }
}

impl fmt::Display for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} from {} [REDACTED]", self.name, self.source)
    }
}
