//! OpenAI chat-completions provider.

use super::{
    openai_compat::ChatCompletionsClient, secrets::ApiCredential, ChatMessage, CompletionConfig,
    CompletionResponse, LlmProvider, ProviderError,
};
use async_trait::async_trait;

/// OpenAI provider. Requests go to `{base_url}/chat/completions`.
pub struct OpenAiProvider {
    client: ChatCompletionsClient,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("credential", self.client.credential())
            .field("endpoint", &self.client.endpoint())
            .finish()
    }
}

impl OpenAiProvider {
    pub fn new(credential: ApiCredential, base_url: &str) -> Result<Self, ProviderError> {
        let endpoint = format!("{}/chat/completions", base_url.trim_end_matches('/'));
        Ok(Self {
            client: ChatCompletionsClient::new(endpoint, credential, false)?,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.client.endpoint()
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        self.client.send(&messages, config).await
    }

    fn name(&self) -> &str {
        "openai"
    }
}
