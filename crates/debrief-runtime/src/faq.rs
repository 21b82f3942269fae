//! Answering candidate questions from the program FAQ.

use std::sync::Arc;

use debrief_core::FaqExchange;

use crate::invoker::ModelInvoker;
use crate::prompts::build_faq_prompt;

/// Answers free-form questions using only the FAQ markdown as context.
#[derive(Debug, Clone)]
pub struct FaqResponder {
    invoker: Arc<ModelInvoker>,
    faq_text: String,
}

impl FaqResponder {
    pub fn new(invoker: Arc<ModelInvoker>, faq_text: impl Into<String>) -> Self {
        Self {
            invoker,
            faq_text: faq_text.into(),
        }
    }

    /// Answer one question. Model failures become an inline error string.
    pub async fn answer(&self, question: &str) -> String {
        let prompt = build_faq_prompt(&self.faq_text, question);
        match self.invoker.generate(&prompt).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "FAQ answer failed");
                format!("[Error getting answer: {}]", e)
            }
        }
    }

    /// Answer `question` and pair it with the reply.
    pub async fn exchange(&self, question: &str) -> FaqExchange {
        let answer = self.answer(question).await;
        FaqExchange::new(question.trim(), answer)
    }
}
