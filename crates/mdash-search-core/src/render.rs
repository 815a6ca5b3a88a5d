//! Excerpts and match highlighting for result lists.
//!
//! Unlike the index builder's hard cut, excerpt truncation here appends
//! `...` so readers can see that text was dropped.

use std::ops::Range;

/// Marker appended (or prepended) where an excerpt cuts text.
pub const ELLIPSIS: &str = "...";

const ANSI_MARK_START: &str = "\x1b[7m";
const ANSI_MARK_END: &str = "\x1b[0m";

/// Truncate to `max_chars` characters, appending `...` if anything was cut.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let Some((cut, _)) = text.char_indices().nth(max_chars) else {
        return text.to_string();
    };
    let mut out = text[..cut].to_string();
    out.push_str(ELLIPSIS);
    out
}

/// Cut a window of at most `max_chars` characters that keeps `span` visible.
///
/// Returns the excerpt and the span rebased onto it. The span is clipped when
/// it is longer than the window. Cut edges are marked with `...`.
pub fn excerpt_around(
    text: &str,
    span: Option<Range<usize>>,
    max_chars: usize,
) -> (String, Option<Range<usize>>) {
    let total = text.chars().count();
    if total <= max_chars {
        return (text.to_string(), span);
    }
    let Some(span) = span.filter(|s| text.get(s.clone()).is_some()) else {
        return (excerpt(text, max_chars), None);
    };

    let span_start = text[..span.start].chars().count();
    let span_len = text[span.clone()].chars().count();
    let lead = max_chars.saturating_sub(span_len) / 2;
    let start = span_start.saturating_sub(lead).min(total - max_chars);
    let end = start + max_chars;

    let start_byte = char_to_byte(text, start);
    let end_byte = char_to_byte(text, end);

    let mut out = String::new();
    if start > 0 {
        out.push_str(ELLIPSIS);
    }
    let shift = out.len();
    out.push_str(&text[start_byte..end_byte]);
    let rebased = (span.start - start_byte + shift)..(span.end.min(end_byte) - start_byte + shift);
    if end < total {
        out.push_str(ELLIPSIS);
    }
    (out, Some(rebased))
}

fn char_to_byte(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(b, _)| b)
        .unwrap_or(text.len())
}

/// Escape text for inclusion in HTML element content or attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// HTML-escape `text` and wrap `span` in `<mark>`.
pub fn highlight_html(text: &str, span: Option<&Range<usize>>) -> String {
    match split_at_span(text, span) {
        Some((before, mid, after)) => format!(
            "{}<mark>{}</mark>{}",
            escape_html(before),
            escape_html(mid),
            escape_html(after)
        ),
        None => escape_html(text),
    }
}

/// Wrap `span` in ANSI reverse video for terminal output.
pub fn highlight_ansi(text: &str, span: Option<&Range<usize>>) -> String {
    match split_at_span(text, span) {
        Some((before, mid, after)) => {
            format!("{before}{ANSI_MARK_START}{mid}{ANSI_MARK_END}{after}")
        }
        None => text.to_string(),
    }
}

fn split_at_span<'a>(
    text: &'a str,
    span: Option<&Range<usize>>,
) -> Option<(&'a str, &'a str, &'a str)> {
    let span = span?;
    let mid = text.get(span.clone())?;
    Some((&text[..span.start], mid, &text[span.end..]))
}
