//! Usage accounting for model calls.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::providers::TokenUsage;

/// Accumulated usage for one invoker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmUsage {
    /// Network calls made, including failed ones
    pub llm_calls: u32,

    /// Calls that returned an error
    pub failed_calls: u32,

    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,

    /// Generations answered from the response cache
    pub cache_hits: u32,

    /// Times the secondary model was tried
    pub fallbacks: u32,
}

impl LlmUsage {
    /// Add token usage from a successful response.
    pub fn add(&mut self, usage: &TokenUsage) {
        self.llm_calls += 1;
        self.prompt_tokens += usage.prompt_tokens;
        self.completion_tokens += usage.completion_tokens;
        self.total_tokens += usage.total();
    }
}

/// Thread-safe usage counter shared by the invoker.
#[derive(Debug, Default)]
pub struct UsageTracker {
    usage: RwLock<LlmUsage>,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&self, usage: &TokenUsage) {
        self.usage.write().add(usage);
    }

    pub fn record_failure(&self) {
        let mut usage = self.usage.write();
        usage.llm_calls += 1;
        usage.failed_calls += 1;
    }

    pub fn record_cache_hit(&self) {
        self.usage.write().cache_hits += 1;
    }

    pub fn record_fallback(&self) {
        self.usage.write().fallbacks += 1;
    }

    /// Copy of the current counters.
    pub fn snapshot(&self) -> LlmUsage {
        self.usage.read().clone()
    }
}
