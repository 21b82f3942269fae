//! Fixed interview script and per-session state.
//!
//! The state machine is I/O free: the caller prints questions and reads
//! answers, feeding each reply back through [`InterviewSession::submit_answer`].

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::faq::FaqExchange;
use crate::types::AnswerSet;

/// Answers shorter than this (after trimming) are reprompted once.
pub const MIN_ANSWER_CHARS: usize = 5;

/// Answers longer than this earn an acknowledgement.
pub const ACK_THRESHOLD_CHARS: usize = 20;

pub const GREETING: &str = "Hello! I'll ask a few questions to learn about you.";
pub const REPROMPT: &str = "I didn't quite catch that. Could you add a bit more detail?";
pub const ACKNOWLEDGEMENT: &str = "Thanks, that helps.";
pub const NO_RESPONSE: &str = "(no response provided)";

/// One scripted interview question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub key: &'static str,
    pub text: &'static str,
}

/// The interview script, asked in order.
pub static REQUIRED_QUESTIONS: [Question; 5] = [
    Question {
        key: "background",
        text: "Tell us your background and journey. What inspires you to pursue data science or AI?",
    },
    Question {
        key: "why_company",
        text: "What motivates you to learn with us specifically?",
    },
    Question {
        key: "experience",
        text: "What hands-on projects or technical experiences have you completed so far?",
    },
    Question {
        key: "future_goals",
        text: "What are your goals after completing the bootcamp? How do you hope to make an impact?",
    },
    Question {
        key: "readiness",
        text: "Are you ready to start? If not, what support or prep would help you feel fully prepared?",
    },
];

/// Who spoke a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Agent,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Agent => "agent",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single utterance in the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
    pub time: DateTime<Local>,
}

impl Turn {
    /// Transcript form: `[YYYY-mm-dd HH:MM:SS] ROLE: text`.
    pub fn transcript_line(&self) -> String {
        format!(
            "[{}] {}: {}",
            self.time.format("%Y-%m-%d %H:%M:%S"),
            self.role.as_str().to_uppercase(),
            self.text
        )
    }
}

/// Static session metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetadata {
    pub project: String,
    pub version: String,
}

impl Default for SessionMetadata {
    fn default() -> Self {
        Self {
            project: "debrief".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Everything the interview produced, ready to persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub metadata: SessionMetadata,
    pub answers: AnswerSet,
    pub turns: Vec<Turn>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub faq: Vec<FaqExchange>,
}

/// Result of submitting a reply to the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// The answer was stored under the question key.
    Accepted { key: &'static str, answer: String },
    /// The reply was too short; ask again with this text.
    Reprompt(&'static str),
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    question: Question,
    reprompted: bool,
}

/// Interview state: which question is next and what has been said.
#[derive(Debug)]
pub struct InterviewSession {
    questions: &'static [Question],
    index: usize,
    pending: Option<Pending>,
    answers: AnswerSet,
    turns: Vec<Turn>,
    min_answer_chars: usize,
}

impl Default for InterviewSession {
    fn default() -> Self {
        Self::new()
    }
}

impl InterviewSession {
    pub fn new() -> Self {
        Self::with_questions(&REQUIRED_QUESTIONS)
    }

    pub fn with_questions(questions: &'static [Question]) -> Self {
        Self {
            questions,
            index: 0,
            pending: None,
            answers: AnswerSet::new(),
            turns: Vec::new(),
            min_answer_chars: MIN_ANSWER_CHARS,
        }
    }

    /// Greet the candidate. Returns the greeting text.
    pub fn start(&mut self) -> &'static str {
        self.log_turn(Role::Agent, GREETING);
        GREETING
    }

    pub fn has_next(&self) -> bool {
        self.index < self.questions.len()
    }

    /// Advance to the next question, or `None` when the script is done.
    ///
    /// A question still awaiting its answer is abandoned.
    pub fn next_question(&mut self) -> Option<Question> {
        let question = *self.questions.get(self.index)?;
        self.index += 1;
        self.pending = Some(Pending {
            question,
            reprompted: false,
        });
        self.log_turn(Role::Agent, question.text);
        Some(question)
    }

    /// Feed a reply to the current question.
    ///
    /// A too-short first reply yields [`AnswerOutcome::Reprompt`]; the second
    /// reply is accepted whatever it is, with an empty one stored as
    /// [`NO_RESPONSE`]. Submitting with no open question is ignored and
    /// returns `None`.
    pub fn submit_answer(&mut self, reply: &str) -> Option<AnswerOutcome> {
        let reply = reply.trim();
        let mut pending = self.pending?;
        self.log_turn(Role::User, reply);

        if !pending.reprompted && self.too_short(reply) {
            pending.reprompted = true;
            self.pending = Some(pending);
            self.log_turn(Role::Agent, REPROMPT);
            tracing::debug!(key = pending.question.key, "Answer too short, reprompting");
            return Some(AnswerOutcome::Reprompt(REPROMPT));
        }

        let answer = if reply.is_empty() {
            NO_RESPONSE.to_string()
        } else {
            reply.to_string()
        };

        self.pending = None;
        self.answers.insert(pending.question.key, answer.clone());
        Some(AnswerOutcome::Accepted {
            key: pending.question.key,
            answer,
        })
    }

    /// Acknowledgement for a substantive answer, logged as an agent turn.
    pub fn acknowledge(&mut self, answer: &str) -> Option<&'static str> {
        if answer.chars().count() > ACK_THRESHOLD_CHARS {
            self.log_turn(Role::Agent, ACKNOWLEDGEMENT);
            Some(ACKNOWLEDGEMENT)
        } else {
            None
        }
    }

    /// Record an extra turn, such as a FAQ exchange.
    pub fn log_turn(&mut self, role: Role, text: impl Into<String>) {
        self.turns.push(Turn {
            role,
            text: text.into(),
            time: Local::now(),
        });
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn build_session(&self) -> SessionSnapshot {
        SessionSnapshot {
            metadata: SessionMetadata::default(),
            answers: self.answers.clone(),
            turns: self.turns.clone(),
            faq: Vec::new(),
        }
    }

    fn too_short(&self, reply: &str) -> bool {
        reply.chars().count() < self.min_answer_chars
    }
}
