//! Character-bounded truncation helpers.

/// Maximum length of a per-field note, not counting the ellipsis.
pub const NOTE_MAX_CHARS: usize = 220;

/// Marker appended to truncated text.
pub const ELLIPSIS: char = '…';

/// Trim `text` and cut it to at most `max_chars` characters.
///
/// Truncated text has trailing whitespace removed before the ellipsis is
/// appended. Lengths are counted in chars, not bytes.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let mut out: String = text.chars().take(max_chars).collect();
    let kept = out.trim_end().len();
    out.truncate(kept);
    out.push(ELLIPSIS);
    out
}

/// Shorten an answer into a note.
pub fn shorten(text: &str) -> String {
    truncate_chars(text, NOTE_MAX_CHARS)
}
