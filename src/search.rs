//! `mdsearch search`: run one query against a page and print the hits.
//!
//! Also holds the hit formatting shared with the interactive session.

use anyhow::{bail, Result};
use serde::Serialize;
use std::ops::Range;
use std::path::Path;

use mdash_search_core::models::Hit;
use mdash_search_core::panel::{ResultsView, SearchPanel};
use mdash_search_core::render::{excerpt_around, highlight_ansi, highlight_html};
use mdash_search_core::search::QueryOptions;

use crate::config::Config;
use crate::html::ElementRef;
use crate::index_cmd::load_index;
use crate::progress::NoProgress;

/// A hit shaped for JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct HitResponse {
    pub id: String,
    pub fragment: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_span: Option<Range<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_span: Option<Range<usize>>,
    /// Excerpt around the content match, with `...` where text was cut.
    pub excerpt: String,
    /// Title with the match wrapped in `<mark>`, HTML-escaped.
    pub title_html: String,
    /// Excerpt with the match wrapped in `<mark>`, HTML-escaped.
    pub excerpt_html: String,
}

/// JSON response for a query.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub count: usize,
    pub results: Vec<HitResponse>,
}

pub fn hit_response(hit: &Hit<ElementRef>, excerpt_chars: usize) -> HitResponse {
    let record = &hit.record;
    let (excerpt, excerpt_span) =
        excerpt_around(&record.content, hit.spans.content.clone(), excerpt_chars);
    HitResponse {
        id: record.id.clone(),
        fragment: record.fragment(),
        title: record.title.clone(),
        group_label: record.group_label.clone(),
        title_span: hit.spans.title.clone(),
        content_span: hit.spans.content.clone(),
        title_html: highlight_html(&record.title, hit.spans.title.as_ref()),
        excerpt_html: highlight_html(&excerpt, excerpt_span.as_ref()),
        excerpt,
    }
}

/// Text rendering of one hit: a title line and an optional excerpt line.
pub fn format_hit(
    position: usize,
    hit: &Hit<ElementRef>,
    selected: bool,
    excerpt_chars: usize,
    color: bool,
) -> String {
    let record = &hit.record;
    let marker = if selected { ">" } else { " " };
    let title = if record.title.is_empty() {
        record.fragment()
    } else if color {
        highlight_ansi(&record.title, hit.spans.title.as_ref())
    } else {
        record.title.clone()
    };

    let mut out = format!("{} {}. {}  {}", marker, position + 1, title, record.fragment());
    if let Some(group) = &record.group_label {
        out.push_str(&format!("  [{}]", group));
    }
    if !record.content.is_empty() {
        let (excerpt, span) =
            excerpt_around(&record.content, hit.spans.content.clone(), excerpt_chars);
        let excerpt = if color {
            highlight_ansi(&excerpt, span.as_ref())
        } else {
            excerpt
        };
        out.push_str(&format!("\n     {}", excerpt));
    }
    out
}

/// Text rendering of the whole panel. Empty for the hidden (no query) view.
pub fn format_panel(panel: &SearchPanel<ElementRef>, excerpt_chars: usize, color: bool) -> String {
    match panel.view() {
        ResultsView::Hidden => String::new(),
        ResultsView::Empty { .. } => panel.empty_message().unwrap_or_default(),
        ResultsView::Results => {
            let selected = panel.selected_index();
            panel
                .hits()
                .iter()
                .enumerate()
                .map(|(i, hit)| format_hit(i, hit, selected == Some(i), excerpt_chars, color))
                .collect::<Vec<_>>()
                .join("\n")
        }
    }
}

pub fn run_search(
    config: &Config,
    path: &Path,
    query: &str,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    if limit == Some(0) {
        bail!("--limit must be >= 1");
    }
    let indexed = load_index(config, path, &NoProgress)?;
    let options = QueryOptions {
        limit: limit.unwrap_or(config.search.result_limit),
    };
    let hits = indexed.index.query(query, &options);

    if json {
        let results: Vec<HitResponse> = hits
            .iter()
            .map(|h| hit_response(h, config.search.excerpt_chars))
            .collect();
        let response = SearchResponse {
            query: query.trim().to_string(),
            count: results.len(),
            results,
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    let mut panel = SearchPanel::new();
    panel.set_results(query, hits);
    let color = atty::is(atty::Stream::Stdout);
    let text = format_panel(&panel, config.search.excerpt_chars, color);
    if !text.is_empty() {
        println!("{}", text);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::{HtmlPage, MarkupOptions};
    use mdash_search_core::index::{IndexOptions, SearchIndex};

    fn index() -> SearchIndex<ElementRef> {
        let page = HtmlPage::parse(
            r##"<main>
              <section class="doc-section" id="install"><h2>Installation</h2>
                <p>Run the <code>&lt;installer&gt;</code> script.</p></section>
              <section class="doc-section" id="faq-x"><h2>Questions</h2></section>
            </main>
            <nav class="sidebar"><div class="nav-group"><span class="nav-group-title">Help</span>
              <a href="#faq">FAQ</a></div></nav>"##,
            MarkupOptions::default(),
        )
        .unwrap();
        let mut index = SearchIndex::new(IndexOptions::default());
        index.reindex(&page);
        index
    }

    #[test]
    fn hit_response_escapes_and_marks() {
        let index = index();
        let hits = index.query("installer", &QueryOptions::default());
        assert_eq!(hits.len(), 1);
        let resp = hit_response(&hits[0], 160);
        assert_eq!(resp.fragment, "#install");
        assert_eq!(resp.excerpt, "Run the <installer> script.");
        assert_eq!(
            resp.excerpt_html,
            "Run the &lt;<mark>installer</mark>&gt; script."
        );
        assert_eq!(resp.title_html, "Installation");
        assert!(resp.title_span.is_none());
    }

    #[test]
    fn format_hit_plain_includes_group_and_marker() {
        let index = index();
        let hits = index.query("faq", &QueryOptions::default());
        let line = format_hit(0, &hits[0], true, 160, false);
        assert_eq!(line, "> 1. FAQ  #faq  [Help]");
    }

    #[test]
    fn zero_limit_rejected() {
        let err = run_search(
            &Config::default(),
            Path::new("unused.html"),
            "install",
            Some(0),
            false,
        )
        .unwrap_err();
        assert!(err.to_string().contains("--limit must be >= 1"));
    }

    #[test]
    fn format_panel_views() {
        let index = index();
        let mut panel = SearchPanel::new();
        panel.set_results("  ", index.query("  ", &QueryOptions::default()));
        assert_eq!(format_panel(&panel, 160, false), "");

        panel.set_results("zzz", index.query("zzz", &QueryOptions::default()));
        assert_eq!(format_panel(&panel, 160, false), "No results for \"zzz\"");
    }
}
