//! Evaluation principles parsed from markdown.
//!
//! Only list items declare principles: a bullet (`-` or `*`) or a numbered
//! marker (`1.`) followed by the principle name. Headings, prose and blank
//! lines are ignored.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Optional indentation, a list marker, then the name.
    static ref LIST_ITEM: Regex = Regex::new(r"^\s*(?:[-*]|\d+\.)\s*(.+)").unwrap();
}

/// Parse principle names in source order.
///
/// Duplicates are kept; callers decide how to treat them. Items whose text
/// trims to nothing are skipped.
pub fn parse_principles(markdown: &str) -> Vec<String> {
    markdown
        .lines()
        .filter_map(|line| LIST_ITEM.captures(line))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}
