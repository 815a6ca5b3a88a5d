//! `mdsearch index`: build the record index for a page and print it.

use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use mdash_search_core::index::{BuildStats, SearchIndex};
use mdash_search_core::models::Record;

use crate::config::Config;
use crate::html::{ElementRef, HtmlPage};
use crate::progress::{IndexProgressEvent, IndexProgressReporter};

/// A parsed page with its built index.
pub struct IndexedPage {
    pub page: HtmlPage,
    pub index: SearchIndex<ElementRef>,
    pub stats: BuildStats,
}

/// Read, parse and index a page, reporting progress on the way.
pub fn load_index(
    config: &Config,
    path: &Path,
    reporter: &dyn IndexProgressReporter,
) -> Result<IndexedPage> {
    let label = path.display().to_string();
    reporter.report(IndexProgressEvent::Scanning {
        page: label.clone(),
    });

    let page = HtmlPage::load(path, config.markup_options())?;
    let mut index = SearchIndex::new(config.index_options());
    let stats = index.reindex(&page);

    reporter.report(IndexProgressEvent::Indexed {
        page: label,
        records: stats.records,
        sections: stats.sections,
        links: stats.links,
        duplicates: stats.duplicates,
    });

    Ok(IndexedPage { page, index, stats })
}

#[derive(Debug, Serialize)]
struct IndexListing<'a> {
    page: String,
    count: usize,
    fingerprint: String,
    records: Vec<&'a Record<ElementRef>>,
}

pub fn run_index(
    config: &Config,
    path: &Path,
    json: bool,
    reporter: &dyn IndexProgressReporter,
) -> Result<()> {
    let indexed = load_index(config, path, reporter)?;
    let index = &indexed.index;

    if json {
        let listing = IndexListing {
            page: path.display().to_string(),
            count: index.len(),
            fingerprint: index.fingerprint(),
            records: index.records().iter().map(|r| r.as_ref()).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    for (i, record) in index.records().iter().enumerate() {
        let mut line = format!("{:>3}. {}", i + 1, record.fragment());
        if !record.title.is_empty() {
            line.push_str(&format!("  {}", record.title));
        }
        if let Some(group) = &record.group_label {
            line.push_str(&format!("  [{}]", group));
        }
        println!("{}", line);
        if !record.content.is_empty() {
            println!("     {} chars", record.content.chars().count());
        }
    }
    println!();
    println!("records:     {}", index.len());
    println!("fingerprint: {}", index.fingerprint());
    Ok(())
}
