//! Recovery of a JSON object from free-form model output.
//!
//! Models are asked for strict JSON but routinely wrap it in markdown fences,
//! surround it with prose, or return something that is not JSON at all.
//! Strategies run in a fixed order and the first success wins:
//!
//! 1. The first fenced code block (optionally tagged `json`)
//! 2. Brace scanning: for each `{` in order, the widest `{...}` span that decodes
//! 3. The whole trimmed text
//!
//! Failing all three is an expected outcome and yields `None`.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};

lazy_static! {
    static ref FENCED_BLOCK: Regex = Regex::new(r"(?i)```(?:json)?\s*([\s\S]*?)\s*```").unwrap();
}

/// Default bound on `{...}` spans tried during brace scanning.
pub const DEFAULT_MAX_SPAN_CANDIDATES: usize = 4096;

/// A decoded JSON object.
pub type JsonObject = Map<String, Value>;

/// Extracts JSON objects from model responses.
#[derive(Debug, Clone)]
pub struct ResponseExtractor {
    max_span_candidates: usize,
}

impl ResponseExtractor {
    pub fn new() -> Self {
        Self {
            max_span_candidates: DEFAULT_MAX_SPAN_CANDIDATES,
        }
    }

    /// Bound the number of spans tried by the brace scan.
    ///
    /// Once the bound is reached the scan gives up without a result.
    pub fn with_max_span_candidates(mut self, max: usize) -> Self {
        self.max_span_candidates = max;
        self
    }

    /// Recover the first JSON object found in `text`.
    pub fn extract(&self, text: &str) -> Option<JsonObject> {
        if text.trim().is_empty() {
            return None;
        }

        if let Some(obj) = self.from_fenced_block(text) {
            tracing::debug!(strategy = "fenced", "Extracted JSON object");
            return Some(obj);
        }

        if let Some(obj) = self.from_brace_scan(text) {
            tracing::debug!(strategy = "brace_scan", "Extracted JSON object");
            return Some(obj);
        }

        let whole = decode_object(text.trim());
        if whole.is_some() {
            tracing::debug!(strategy = "whole_text", "Extracted JSON object");
        }
        whole
    }

    fn from_fenced_block(&self, text: &str) -> Option<JsonObject> {
        let caps = FENCED_BLOCK.captures(text)?;
        decode_object(caps.get(1)?.as_str().trim())
    }

    fn from_brace_scan(&self, text: &str) -> Option<JsonObject> {
        let opens: Vec<usize> = text.match_indices('{').map(|(i, _)| i).collect();
        let closes: Vec<usize> = text.match_indices('}').map(|(i, _)| i).collect();

        let mut attempts = 0usize;
        for &start in &opens {
            for &end in closes.iter().rev().take_while(|&&end| end > start) {
                attempts += 1;
                if attempts > self.max_span_candidates {
                    tracing::debug!(
                        max = self.max_span_candidates,
                        "Brace scan candidate limit reached"
                    );
                    return None;
                }
                // Braces are ASCII, so both indices sit on char boundaries.
                if let Some(obj) = decode_object(&text[start..=end]) {
                    return Some(obj);
                }
            }
        }
        None
    }
}

impl Default for ResponseExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract with the default candidate bound.
pub fn extract_json_object(text: &str) -> Option<JsonObject> {
    ResponseExtractor::new().extract(text)
}

fn decode_object(candidate: &str) -> Option<JsonObject> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(obj)) => Some(obj),
        _ => None,
    }
}
