//! Index builder and the owned search index store.
//!
//! Records are extracted from a [`ContentSource`] in two passes:
//!
//! 1. **Sections.** For each content container, in document order: the
//!    container's anchor becomes `id` (empty if absent), the first heading
//!    becomes `title`, and the text blocks are joined with single spaces and
//!    hard-cut to `max_content_chars` characters to form `content`. A section
//!    with neither title nor content is skipped.
//! 2. **Sidebar links.** Every link whose `href` starts with `#` and whose
//!    target id is not already indexed becomes a title-only record labelled
//!    with its navigation group.
//!
//! Ids are unique: the first record for an id wins and later ones are dropped.
//!
//! The content cut never appends an ellipsis. Only the excerpt rendering in
//! [`render`](crate::render) marks truncation.
//!
//! # Example
//!
//! ```rust
//! use mdash_search_core::index::{IndexOptions, SearchIndex};
//! use mdash_search_core::source::memory::{InMemorySource, SectionFixture};
//!
//! let source = InMemorySource::new()
//!     .with_section(SectionFixture::new("intro", "Introduction", &["Welcome to mdash"]))
//!     .with_link("#faq", "FAQ", Some("Help"));
//!
//! let mut index = SearchIndex::new(IndexOptions::default());
//! let stats = index.reindex(&source);
//! assert_eq!(stats.records, 2);
//! assert_eq!(index.records()[1].id, "faq");
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::models::{Hit, Record};
use crate::search::{query_records, QueryOptions};
use crate::source::ContentSource;

/// Default cap on indexed body text, in characters.
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 500;

/// Index build parameters, decoupled from application config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexOptions {
    /// Maximum characters kept in a record's `content`.
    pub max_content_chars: usize,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
        }
    }
}

/// Counts from one index build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Records in the finished index.
    pub records: usize,
    /// Records that came from content sections.
    pub sections: usize,
    /// Records that came from sidebar links.
    pub links: usize,
    /// Candidates dropped because their id was already indexed.
    pub duplicates: usize,
}

/// Build the ordered record sequence for a page.
///
/// Pure function of the source's current state: calling it twice over an
/// unchanged source yields equal sequences.
pub fn build_records<S: ContentSource>(
    source: &S,
    options: &IndexOptions,
) -> (Vec<Record<S::Node>>, BuildStats) {
    let mut records = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut stats = BuildStats::default();

    for section in source.sections() {
        let id = source.section_id(&section).unwrap_or_default();
        let title = source
            .heading_text(&section)
            .map(|h| h.trim().to_string())
            .unwrap_or_default();
        let content = truncate_chars(
            &join_blocks(&source.text_blocks(&section)),
            options.max_content_chars,
        );

        if title.trim().is_empty() && content.trim().is_empty() {
            continue;
        }
        if !seen.insert(id.clone()) {
            stats.duplicates += 1;
            continue;
        }

        records.push(Record {
            id,
            title,
            content,
            group_label: None,
            target: section,
        });
        stats.sections += 1;
    }

    for link in source.nav_links() {
        let Some(id) = link.href.strip_prefix('#') else {
            continue;
        };
        let title = link.text.trim();
        if id.is_empty() || title.is_empty() {
            continue;
        }
        if !seen.insert(id.to_string()) {
            stats.duplicates += 1;
            continue;
        }

        let group_label = link
            .group_header
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty());

        records.push(Record {
            id: id.to_string(),
            title: title.to_string(),
            content: String::new(),
            group_label,
            target: link.node,
        });
        stats.links += 1;
    }

    stats.records = records.len();
    (records, stats)
}

/// Join text blocks with single spaces, skipping blank ones.
fn join_blocks(blocks: &[String]) -> String {
    blocks
        .iter()
        .map(|b| b.trim())
        .filter(|b| !b.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Cut `text` to at most `max_chars` characters. No marker is appended.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text.to_string(),
    }
}

/// Owned, rebuildable record store.
///
/// The builder is the only writer (through [`reindex`](SearchIndex::reindex))
/// and the query engine the only reader. Hosts hold one instance per page.
#[derive(Debug, Clone)]
pub struct SearchIndex<T> {
    options: IndexOptions,
    records: Vec<Arc<Record<T>>>,
}

impl<T: Clone> SearchIndex<T> {
    pub fn new(options: IndexOptions) -> Self {
        Self {
            options,
            records: Vec::new(),
        }
    }

    /// Discard the current records and rebuild from the source.
    pub fn reindex<S>(&mut self, source: &S) -> BuildStats
    where
        S: ContentSource<Node = T>,
    {
        let (records, stats) = build_records(source, &self.options);
        self.records = records.into_iter().map(Arc::new).collect();
        stats
    }

    /// Run a query against the current records.
    pub fn query(&self, raw: &str, options: &QueryOptions) -> Vec<Hit<T>> {
        query_records(&self.records, raw, options)
    }

    pub fn records(&self) -> &[Arc<Record<T>>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn options(&self) -> &IndexOptions {
        &self.options
    }

    /// SHA-256 over the ordered record fields (targets excluded).
    ///
    /// Equal fingerprints mean a rebuild produced the same searchable content.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for r in &self.records {
            hasher.update(r.id.as_bytes());
            hasher.update([0x1f]);
            hasher.update(r.title.as_bytes());
            hasher.update([0x1f]);
            hasher.update(r.content.as_bytes());
            hasher.update([0x1f]);
            if let Some(g) = &r.group_label {
                hasher.update(g.as_bytes());
            }
            hasher.update([0x1e]);
        }
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::memory::{InMemorySource, SectionFixture};

    fn build(source: &InMemorySource) -> SearchIndex<crate::source::memory::FixtureNode> {
        let mut index = SearchIndex::new(IndexOptions::default());
        index.reindex(source);
        index
    }

    #[test]
    fn test_section_fields_extracted() {
        let source = InMemorySource::new().with_section(SectionFixture::new(
            "install",
            "  Installation \n",
            &["Run the installer.", "  ", "Then restart."],
        ));
        let index = build(&source);
        assert_eq!(index.len(), 1);
        let r = &index.records()[0];
        assert_eq!(r.id, "install");
        assert_eq!(r.title, "Installation");
        assert_eq!(r.content, "Run the installer. Then restart.");
        assert_eq!(r.group_label, None);
    }

    #[test]
    fn test_empty_section_skipped() {
        let source = InMemorySource::new()
            .with_section(SectionFixture {
                id: Some("blank".to_string()),
                heading: Some("   ".to_string()),
                blocks: vec!["\n".to_string()],
            })
            .with_section(SectionFixture::new("kept", "Kept", &[]));
        let index = build(&source);
        let ids: Vec<&str> = index.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["kept"]);
    }

    #[test]
    fn test_missing_id_and_heading_degrade_to_empty() {
        let source = InMemorySource::new().with_section(SectionFixture {
            id: None,
            heading: None,
            blocks: vec!["Orphan text".to_string()],
        });
        let index = build(&source);
        assert_eq!(index.records()[0].id, "");
        assert_eq!(index.records()[0].title, "");
        assert_eq!(index.records()[0].content, "Orphan text");
    }

    #[test]
    fn test_content_truncated_without_ellipsis() {
        let long = "x".repeat(800);
        let source =
            InMemorySource::new().with_section(SectionFixture::new("big", "Big", &[&long]));
        let index = build(&source);
        assert_eq!(index.records()[0].content.chars().count(), 500);
        assert!(!index.records()[0].content.ends_with("..."));
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("héllo wörld", 4), "héll");
        assert_eq!(truncate_chars("日本語テキスト", 3), "日本語");
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn test_link_record_added_with_group() {
        let source = InMemorySource::new()
            .with_section(SectionFixture::new("intro", "Introduction", &["Welcome"]))
            .with_link("#intro", "Intro link", Some("Start"))
            .with_link("#faq", " FAQ ", Some("  Help  "))
            .with_link("https://example.com", "External", None)
            .with_link("#", "Top", None)
            .with_link("#api", "   ", Some("Reference"))
            .with_link("#api", "API", Some("Reference"));
        let (records, stats) = build_records(&source, &IndexOptions::default());
        // The blank-text link is skipped without claiming its id.
        assert_eq!(stats.duplicates, 1);
        assert_eq!(records.len(), 3);
        let index = build(&source);
        let ids: Vec<&str> = index.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["intro", "faq", "api"]);
        assert_eq!(index.records()[2].title, "API");

        let intro = &index.records()[0];
        assert_eq!(intro.title, "Introduction", "first discovery wins");

        let faq = &index.records()[1];
        assert_eq!(faq.title, "FAQ");
        assert_eq!(faq.content, "");
        assert_eq!(faq.group_label.as_deref(), Some("Help"));
    }

    #[test]
    fn test_blank_group_header_is_none() {
        let source = InMemorySource::new().with_link("#a", "A", Some("  "));
        let index = build(&source);
        assert_eq!(index.records()[0].group_label, None);
    }

    #[test]
    fn test_ids_unique() {
        let source = InMemorySource::new()
            .with_section(SectionFixture::new("dup", "First", &["one"]))
            .with_section(SectionFixture::new("dup", "Second", &["two"]))
            .with_section(SectionFixture::new("other", "Other", &["three"]))
            .with_link("#other", "Other", None)
            .with_link("#new", "New", None)
            .with_link("#new", "New again", None);
        let (records, stats) = build_records(&source, &IndexOptions::default());
        let mut ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["dup", "other", "new"]);
        assert_eq!(records[0].title, "First");
        assert_eq!(stats.duplicates, 3);
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), records.len());
    }

    #[test]
    fn test_reindex_idempotent() {
        let source = InMemorySource::new()
            .with_section(SectionFixture::new("a", "Alpha", &["first"]))
            .with_section(SectionFixture::new("b", "Beta", &["second"]))
            .with_link("#c", "Gamma", Some("Group"));
        let mut index = SearchIndex::new(IndexOptions::default());
        index.reindex(&source);
        let first: Vec<Record<_>> = index.records().iter().map(|r| (**r).clone()).collect();
        let fp1 = index.fingerprint();
        index.reindex(&source);
        let second: Vec<Record<_>> = index.records().iter().map(|r| (**r).clone()).collect();
        assert_eq!(first, second);
        assert_eq!(fp1, index.fingerprint());
    }

    #[test]
    fn test_reindex_picks_up_changes() {
        let mut source =
            InMemorySource::new().with_section(SectionFixture::new("a", "Alpha", &["old"]));
        let mut index = SearchIndex::new(IndexOptions::default());
        index.reindex(&source);
        let before = index.fingerprint();

        if let Some(section) = source.section_mut(0) {
            section.blocks = vec!["new".to_string()];
        }
        index.reindex(&source);
        assert_eq!(index.records()[0].content, "new");
        assert_ne!(before, index.fingerprint());
    }

    #[test]
    fn test_custom_max_content_chars() {
        let source = InMemorySource::new().with_section(SectionFixture::new(
            "a",
            "A",
            &["abcdef", "ghij"],
        ));
        let mut index = SearchIndex::new(IndexOptions {
            max_content_chars: 8,
        });
        index.reindex(&source);
        assert_eq!(index.records()[0].content, "abcdef g");
    }
}
