//! Mistral chat-completions provider.
//!
//! Mistral's API is OpenAI-compatible; requests go to
//! `{base_url}/v1/chat/completions` and always carry `stream: false`.

use super::{
    openai_compat::ChatCompletionsClient, secrets::ApiCredential, ChatMessage, CompletionConfig,
    CompletionResponse, LlmProvider, ProviderError,
};
use async_trait::async_trait;

pub struct MistralProvider {
    client: ChatCompletionsClient,
}

impl std::fmt::Debug for MistralProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MistralProvider")
            .field("credential", self.client.credential())
            .field("endpoint", &self.client.endpoint())
            .finish()
    }
}

impl MistralProvider {
    pub fn new(credential: ApiCredential, base_url: &str) -> Result<Self, ProviderError> {
        let endpoint = format!("{}/v1/chat/completions", base_url.trim_end_matches('/'));
        Ok(Self {
            client: ChatCompletionsClient::new(endpoint, credential, true)?,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.client.endpoint()
    }
}

#[async_trait]
impl LlmProvider for MistralProvider {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        self.client.send(&messages, config).await
    }

    fn name(&self) -> &str {
        "mistral"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{CredentialSource, DEFAULT_MISTRAL_BASE_URL};

    #[test]
    fn test_endpoint_includes_version_prefix() {
        let credential =
            ApiCredential::new("mk-test", CredentialSource::Programmatic, "Mistral API key");
        let provider = MistralProvider::new(credential, DEFAULT_MISTRAL_BASE_URL).unwrap();
        assert_eq!(provider.endpoint(), "https://api.mistral.ai/v1/chat/completions");
        assert_eq!(provider.name(), "mistral");
    }
}
