//! Review text sanitization
//!
//! Deterministic, pure, and total: script-tag spans go first (including
//! their contents), then remaining angle-bracket tags, then control
//! characters, then the result is trimmed and truncated to 2000 characters.
//! Truncation is character-wise so multi-byte text stays intact. Non-string
//! JSON input maps to the empty string.

/// Maximum review length after sanitization, in characters
pub const MAX_REVIEW_CHARS: usize = 2000;

/// Sanitize a raw review value from a submission body
pub fn sanitize(input: Option<&serde_json::Value>) -> String {
    match input.and_then(serde_json::Value::as_str) {
        Some(text) => sanitize_text(text),
        None => String::new(),
    }
}

/// Sanitize review text
pub fn sanitize_text(input: &str) -> String {
    let without_scripts = strip_script_spans(input);
    let without_tags = strip_tags(&without_scripts);
    let without_controls: String = without_tags
        .chars()
        .filter(|&c| !is_control_char(c))
        .collect();

    without_controls.trim().chars().take(MAX_REVIEW_CHARS).collect()
}

/// Code points below 32 and DEL (127)
fn is_control_char(c: char) -> bool {
    (c as u32) < 32 || c as u32 == 127
}

/// Remove script-tag spans including their contents (case-insensitive).
/// An unclosed opening tag swallows the remainder of the input.
fn strip_script_spans(input: &str) -> String {
    const OPEN: &str = "<script";
    const CLOSE: &str = "</script>";

    let mut out = String::with_capacity(input.len());
    let mut pos = 0;

    while let Some(start) = find_ascii_ci(input, OPEN, pos) {
        out.push_str(&input[pos..start]);
        match find_ascii_ci(input, CLOSE, start) {
            Some(end) => pos = end + CLOSE.len(),
            None => {
                pos = input.len();
                break;
            }
        }
    }

    out.push_str(&input[pos..]);
    out
}

/// Remove complete angle-bracket spans; a dangling `<` with no closing
/// `>` is kept as-is.
fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(open) = rest.find('<') {
        match rest[open..].find('>') {
            Some(close_rel) => {
                out.push_str(&rest[..open]);
                rest = &rest[open + close_rel + 1..];
            }
            None => break,
        }
    }

    out.push_str(rest);
    out
}

/// Case-insensitive substring search for an ASCII needle, starting at a
/// byte offset. Matches are byte positions and always char-boundary safe
/// because the needle is ASCII.
fn find_ascii_ci(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let h = haystack.as_bytes();
    let n = needle.as_bytes();
    if n.is_empty() || h.len() < n.len() || from > h.len() - n.len() {
        return None;
    }

    (from..=h.len() - n.len()).find(|&i| h[i..i + n.len()].eq_ignore_ascii_case(n))
}
