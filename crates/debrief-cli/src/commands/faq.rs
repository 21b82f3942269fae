//! The candidate Q&A loop.

use anyhow::Result;
use std::io::Write;
use tokio::io::AsyncBufRead;

use debrief_core::{is_exit_command, FaqExchange};
use debrief_runtime::FaqResponder;

use crate::console::Console;

pub const FAQ_INTRO: &str = "Ask your questions about the program. Type 'no' or 'done' to exit.";

/// Answer questions until the candidate types an exit word or input ends.
pub async fn faq_loop<R, W>(
    console: &mut Console<R, W>,
    responder: &FaqResponder,
) -> Result<Vec<FaqExchange>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    console.say("\n--- Candidate Q&A ---")?;
    console.say(FAQ_INTRO)?;

    let mut exchanges = Vec::new();
    while let Some(question) = console.ask("You (FAQ): ").await? {
        if is_exit_command(&question) {
            break;
        }

        let exchange = responder.exchange(&question).await;
        console.say(&format!("Agent (FAQ): {}", exchange.answer))?;
        exchanges.push(exchange);
    }

    tracing::debug!(questions = exchanges.len(), "FAQ loop finished");
    Ok(exchanges)
}

/// `debrief faq`
pub async fn run<R, W>(console: &mut Console<R, W>, responder: &FaqResponder) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    faq_loop(console, responder).await?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use debrief_runtime::{
        Backend, ChatMessage, CompletionConfig, CompletionResponse, LlmProvider, ModelInvoker,
        ProviderError, TokenUsage,
    };
    use std::sync::Arc;

    /// Answers every prompt with the same text.
    pub struct EchoProvider(pub &'static str);

    #[async_trait]
    impl LlmProvider for EchoProvider {
        async fn complete(
            &self,
            _messages: Vec<ChatMessage>,
            config: &CompletionConfig,
        ) -> Result<CompletionResponse, ProviderError> {
            Ok(CompletionResponse {
                content: self.0.to_string(),
                usage: TokenUsage::default(),
                model: config.model.clone(),
                finish_reason: None,
            })
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    pub fn echo_invoker(reply: &'static str) -> Arc<ModelInvoker> {
        Arc::new(ModelInvoker::new(Backend::Mistral {
            provider: Arc::new(EchoProvider(reply)),
            model: "mistral-medium-latest".to_string(),
        }))
    }

    #[tokio::test]
    async fn test_loop_stops_on_exit_word() {
        let responder = FaqResponder::new(echo_invoker(" Twelve weeks. "), "FAQ");
        let mut console = Console::new(&b"How long is it?\nDONE\nnever asked\n"[..], Vec::new());

        let exchanges = faq_loop(&mut console, &responder).await.unwrap();

        assert_eq!(exchanges, vec![FaqExchange::new("How long is it?", "Twelve weeks.")]);
        let out = String::from_utf8(console.into_output()).unwrap();
        assert!(out.contains("Agent (FAQ): Twelve weeks."));
    }

    #[tokio::test]
    async fn test_loop_stops_on_blank_line_and_eof() {
        let responder = FaqResponder::new(echo_invoker("x"), "FAQ");

        let mut console = Console::new(&b"\nignored\n"[..], Vec::new());
        assert!(faq_loop(&mut console, &responder).await.unwrap().is_empty());

        let mut console = Console::new(&b""[..], Vec::new());
        assert!(faq_loop(&mut console, &responder).await.unwrap().is_empty());
    }
}
