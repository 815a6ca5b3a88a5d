//! Substring query engine.
//!
//! A query is normalized by trimming and lowercasing. A record matches when
//! its lowercased title or lowercased content contains the normalized query.
//! Matches are returned in index order and capped at [`QueryOptions::limit`];
//! there is no relevance ranking and no pagination.
//!
//! Query text is always matched literally. Characters such as `.`, `*` or `(`
//! carry no special meaning.
//!
//! # Algorithm
//!
//! 1. Normalize the raw input. Blank input is the "no query" state and
//!    yields no hits (callers render nothing, not an empty-state message).
//! 2. Walk records in index order.
//! 3. Lowercase each field with `str::to_lowercase`, remembering which
//!    original char every folded byte came from.
//! 4. Find the first occurrence in each folded field and map it back to a
//!    byte range in the original text.
//! 5. Stop once `limit` hits have been collected.

use std::ops::Range;
use std::sync::Arc;

use crate::models::{Hit, MatchSpans, Record};

/// Default maximum number of hits per query.
pub const DEFAULT_RESULT_LIMIT: usize = 10;

/// Query tuning parameters, decoupled from application config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// Maximum hits to return.
    pub limit: usize,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_RESULT_LIMIT,
        }
    }
}

/// Trim and case-fold raw query text. Returns `None` for blank input.
pub fn normalize_query(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_lowercase())
}

/// Find the first case-insensitive occurrence of `needle_folded` in `haystack`.
///
/// `needle_folded` must already be case-folded (see [`normalize_query`]).
/// The returned range indexes the original `haystack` and lies on char
/// boundaries, even where lowercasing changes a char's byte length.
pub fn find_ignore_case(haystack: &str, needle_folded: &str) -> Option<Range<usize>> {
    if needle_folded.is_empty() || haystack.is_empty() {
        return None;
    }

    let folded = haystack.to_lowercase();
    // For every byte of `folded`: the original char's (start, end).
    // Context-dependent lowercasing (final sigma) only swaps between forms of
    // equal width, so per-char widths line up with `folded`.
    let mut origin: Vec<(usize, usize)> = Vec::with_capacity(folded.len());
    for (start, ch) in haystack.char_indices() {
        let end = start + ch.len_utf8();
        let width: usize = ch.to_lowercase().map(char::len_utf8).sum();
        origin.extend(std::iter::repeat((start, end)).take(width));
    }
    debug_assert_eq!(origin.len(), folded.len());

    let pos = folded.find(needle_folded)?;
    let last = pos + needle_folded.len() - 1;
    Some(origin.get(pos)?.0..origin.get(last)?.1)
}

/// Run a query over records in index order.
pub fn query_records<T>(
    records: &[Arc<Record<T>>],
    raw: &str,
    options: &QueryOptions,
) -> Vec<Hit<T>> {
    let Some(needle) = normalize_query(raw) else {
        return Vec::new();
    };

    let mut hits = Vec::new();
    for record in records {
        if hits.len() >= options.limit {
            break;
        }
        let spans = MatchSpans {
            title: find_ignore_case(&record.title, &needle),
            content: find_ignore_case(&record.content, &needle),
        };
        if spans.is_empty() {
            continue;
        }
        hits.push(Hit {
            record: Arc::clone(record),
            spans,
        });
    }
    hits
}
