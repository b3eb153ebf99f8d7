//! Log sanitizing for identifiers and fortune text.
//!
//! Identifiers come straight from tag links and fortune files may hold
//! multi-line entries, so both are flattened before they reach a log line.

/// Longest preview written to a log line, in characters.
pub const MAX_PREVIEW: usize = 120;

/// Escape control characters and cap the length so the result fits on one line.
///
/// `\n`, `\r` and `\t` get their usual escapes, a backslash is doubled, other
/// control characters become `\u{..}`. Past [`MAX_PREVIEW`] characters the
/// rest is replaced by `…`.
pub fn escape_log(s: &str) -> String {
    let mut out = String::with_capacity(s.len().min(MAX_PREVIEW) + 4);
    for (count, ch) in s.chars().enumerate() {
        if count == MAX_PREVIEW {
            out.push('…');
            break;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' | '\r' | '\t' => out.extend(ch.escape_default()),
            c if c.is_control() => out.extend(c.escape_unicode()),
            c => out.push(c),
        }
    }
    out
}
