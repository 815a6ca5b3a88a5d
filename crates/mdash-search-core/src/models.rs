//! Core data models for the search index.
//!
//! These types represent the records produced by the index builder and the
//! hits returned by the query engine.

use std::ops::Range;
use std::sync::Arc;

use serde::Serialize;

/// One searchable unit: a page section or a sidebar navigation entry.
///
/// Records are immutable once built. `T` is the content source's opaque
/// reference back to the document location; the query engine never looks at it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(bound = "")]
pub struct Record<T> {
    /// Section anchor. Unique within an index.
    pub id: String,
    /// Heading text or link text. May be empty.
    pub title: String,
    /// Body excerpt, bounded by `IndexOptions::max_content_chars`. May be empty.
    pub content: String,
    /// Text of the enclosing sidebar group header, for link records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_label: Option<String>,
    /// Location to scroll to when this record is chosen.
    #[serde(skip)]
    pub target: T,
}

impl<T> Record<T> {
    /// The URL fragment for this record (`#id`).
    pub fn fragment(&self) -> String {
        format!("#{}", self.id)
    }
}

/// Byte ranges of the first query occurrence in each field.
///
/// Offsets index into the original (not lowercased) field text and always
/// fall on char boundaries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchSpans {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Range<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Range<usize>>,
}

impl MatchSpans {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

/// A matched record together with its highlight spans.
#[derive(Debug, Clone, Serialize)]
#[serde(bound = "")]
pub struct Hit<T> {
    pub record: Arc<Record<T>>,
    pub spans: MatchSpans,
}
