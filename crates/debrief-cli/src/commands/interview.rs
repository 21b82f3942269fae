//! `debrief interview`: ask the script, run the Q&A, summarize, save.

use anyhow::{Context, Result};
use std::io::Write;
use tokio::io::AsyncBufRead;

use debrief_core::{
    append_faq_section, render_faq_markdown, AnswerOutcome, InterviewSession, Role, SavedSession,
    SessionRecord, SessionStore,
};
use debrief_runtime::{FaqResponder, Summarizer};

use super::faq::faq_loop;
use crate::console::Console;

/// Everything an interview run needs besides the terminal.
pub struct InterviewRun<'a> {
    pub summarizer: &'a Summarizer,
    pub responder: Option<&'a FaqResponder>,
    pub store: &'a SessionStore,
}

impl InterviewRun<'_> {
    pub async fn run<R, W>(&self, console: &mut Console<R, W>) -> Result<SavedSession>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        console.say("\n--- Interview ---\n")?;

        let mut session = InterviewSession::new();
        console.say(&format!("Agent: {}", session.start()))?;

        while let Some(question) = session.next_question() {
            console.say(&format!("Agent: {}", question.text))?;
            loop {
                let reply = console.ask("You: ").await?.unwrap_or_default();
                match session.submit_answer(&reply) {
                    Some(AnswerOutcome::Reprompt(text)) => console.say(&format!("Agent: {}", text))?,
                    Some(AnswerOutcome::Accepted { answer, .. }) => {
                        if let Some(ack) = session.acknowledge(&answer) {
                            console.say(&format!("Agent: {}", ack))?;
                        }
                        break;
                    }
                    None => break,
                }
            }
        }

        let exchanges = match self.responder {
            Some(responder) => faq_loop(console, responder).await?,
            None => Vec::new(),
        };
        for exchange in &exchanges {
            session.log_turn(Role::User, exchange.question.clone());
            session.log_turn(Role::Agent, exchange.answer.clone());
        }

        let mut snapshot = session.build_session();
        snapshot.faq = exchanges;

        let output = self.summarizer.summarize(&snapshot.answers).await;
        let faq_markdown = render_faq_markdown(&snapshot.faq);
        let markdown = append_faq_section(&output.markdown, &faq_markdown);

        console.say("\n--- Summary ---")?;
        console.say(&markdown)?;

        let mut record = SessionRecord::new(snapshot, output.summary, markdown);
        record.faq_markdown = (!faq_markdown.is_empty()).then_some(faq_markdown);

        let saved = self.store.save(&record).context("Failed to save the session")?;
        console.say(&format!(
            "\nSaved transcript and session JSON in '{}/'.",
            self.store.dir().display()
        ))?;
        Ok(saved)
    }
}
