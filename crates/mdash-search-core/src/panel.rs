//! Search result panel: the presentation adapter's selection state.
//!
//! The panel owns the hits of the latest query and a selected position. It
//! distinguishes three views: nothing to show (no query), an explicit empty
//! state naming the query that matched nothing, and a result list.

use crate::models::Hit;
use crate::search::normalize_query;

/// What the panel should currently display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultsView<'a> {
    /// No active query. Render nothing.
    Hidden,
    /// A query is active but matched nothing.
    Empty { query: &'a str },
    /// At least one hit.
    Results,
}

/// Where the navigation collaborator should go for the chosen result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTarget<T> {
    /// Section id.
    pub id: String,
    /// URL fragment to push to history (`#id`).
    pub fragment: String,
    /// Location to scroll to.
    pub target: T,
}

/// Result list with keyboard selection.
#[derive(Debug, Clone)]
pub struct SearchPanel<T> {
    query: Option<String>,
    hits: Vec<Hit<T>>,
    selected: usize,
}

impl<T> Default for SearchPanel<T> {
    fn default() -> Self {
        Self {
            query: None,
            hits: Vec::new(),
            selected: 0,
        }
    }
}

impl<T: Clone> SearchPanel<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the displayed results. Selection returns to the first hit.
    pub fn set_results(&mut self, raw_query: &str, hits: Vec<Hit<T>>) {
        self.query = normalize_query(raw_query).map(|_| raw_query.trim().to_string());
        self.hits = if self.query.is_some() { hits } else { Vec::new() };
        self.selected = 0;
    }

    pub fn view(&self) -> ResultsView<'_> {
        match &self.query {
            None => ResultsView::Hidden,
            Some(q) if self.hits.is_empty() => ResultsView::Empty { query: q.as_str() },
            Some(_) => ResultsView::Results,
        }
    }

    /// Empty-state message for the current query, if the query matched nothing.
    pub fn empty_message(&self) -> Option<String> {
        match self.view() {
            ResultsView::Empty { query } => Some(format!("No results for \"{}\"", query)),
            _ => None,
        }
    }

    pub fn hits(&self) -> &[Hit<T>] {
        &self.hits
    }

    /// The active query as typed (trimmed), if any.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn selected_index(&self) -> Option<usize> {
        if self.hits.is_empty() {
            None
        } else {
            Some(self.selected)
        }
    }

    pub fn selected(&self) -> Option<&Hit<T>> {
        self.hits.get(self.selected)
    }

    /// Move the selection down, stopping at the last hit.
    pub fn select_next(&mut self) {
        if self.selected + 1 < self.hits.len() {
            self.selected += 1;
        }
    }

    /// Move the selection up, stopping at the first hit.
    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Jump to a position, clamped into range.
    pub fn select(&mut self, index: usize) {
        self.selected = index.min(self.hits.len().saturating_sub(1));
    }

    /// Resolve the selected hit to a navigation target.
    pub fn resolve_selected(&self) -> Option<NavigationTarget<T>> {
        self.selected().map(|hit| NavigationTarget {
            id: hit.record.id.clone(),
            fragment: hit.record.fragment(),
            target: hit.record.target.clone(),
        })
    }

    /// Clear query, results and selection (the search surface closed).
    pub fn close(&mut self) {
        self.query = None;
        self.hits.clear();
        self.selected = 0;
    }
}
