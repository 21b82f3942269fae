//! OpenAI-compatible chat-completions wire protocol.
//!
//! Shared by the OpenAI and Mistral providers; they differ only in endpoint
//! and the request flags they send.

use super::{
    secrets::ApiCredential, ChatMessage, CompletionConfig, CompletionResponse, ProviderError,
    TokenUsage,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Chat-completions request body.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

/// Chat-completions response body.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<ErrorDetail>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// A configured chat-completions endpoint.
pub(crate) struct ChatCompletionsClient {
    http: reqwest::Client,
    endpoint: String,
    credential: ApiCredential,
    send_stream_flag: bool,
}

impl ChatCompletionsClient {
    pub(crate) fn new(
        endpoint: String,
        credential: ApiCredential,
        send_stream_flag: bool,
    ) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ProviderError::HttpError(e.to_string()))?;

        Ok(Self {
            http,
            endpoint,
            credential,
            send_stream_flag,
        })
    }

    pub(crate) fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub(crate) fn credential(&self) -> &ApiCredential {
        &self.credential
    }

    pub(crate) async fn send(
        &self,
        messages: &[ChatMessage],
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        let request = ChatRequest {
            model: &config.model,
            messages,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            stream: self.send_stream_flag.then_some(false),
        };

        // Only expose the credential here, at the point of use
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(self.credential.expose())
            .timeout(config.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(config.timeout)
                } else {
                    ProviderError::HttpError(e.to_string())
                }
            })?;

        let status = response.status();

        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(ProviderError::RateLimited { retry_after });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let body: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(config.timeout)
            } else {
                ProviderError::ParseError(e.to_string())
            }
        })?;

        into_completion(body, &config.model)
    }
}

fn into_completion(body: ChatResponse, requested_model: &str) -> Result<CompletionResponse, ProviderError> {
    let usage = body
        .usage
        .map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
        })
        .unwrap_or_default();

    let choice = body
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::ParseError("response contained no choices".to_string()))?;

    let content = choice
        .message
        .content
        .ok_or_else(|| ProviderError::ParseError("first choice has no message content".to_string()))?;

    Ok(CompletionResponse {
        content,
        usage,
        model: body.model.unwrap_or_else(|| requested_model.to_string()),
        finish_reason: choice.finish_reason,
    })
}

/// Best-effort human-readable message from an error body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            error: Some(detail), ..
        }) => detail.message,
        Ok(ErrorBody {
            message: Some(message),
            ..
        }) => message,
        _ if body.trim().is_empty() => "empty error body".to_string(),
        _ => body.trim().to_string(),
    }
}
