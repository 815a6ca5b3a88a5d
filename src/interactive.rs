//! `mdsearch interactive`: a line-driven search session.
//!
//! Each input line is either a command or the current contents of the search
//! box. Query lines are debounced: lines arriving within the debounce window
//! replace each other and only the last one is evaluated once input pauses.
//!
//! | Line | Effect |
//! |------|--------|
//! | any text | set the query (debounced) |
//! | `:next` / `:prev` | move the selection |
//! | `:open` | resolve the selection to a navigation target |
//! | `:reindex` | re-read the page and rebuild the index |
//! | `:close` | drop the pending query and clear results |
//! | `:quit` | end the session |
//!
//! Selection commands first run any pending query, so they always act on
//! the results for the latest input.

use anyhow::Result;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::Instant;

use mdash_search_core::debounce::Debouncer;
use mdash_search_core::panel::SearchPanel;

use crate::config::Config;
use crate::html::{ElementRef, HtmlPage};
use crate::index_cmd::{load_index, IndexedPage};
use crate::progress::{IndexProgressEvent, IndexProgressReporter};
use crate::search::{format_hit, format_panel};

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Query(String),
    Next,
    Prev,
    Open,
    Reindex,
    Close,
    Quit,
}

impl SessionCommand {
    pub fn parse(line: &str) -> SessionCommand {
        match line.trim() {
            ":next" | ":n" | ":down" => SessionCommand::Next,
            ":prev" | ":p" | ":up" => SessionCommand::Prev,
            ":open" | ":o" | ":enter" => SessionCommand::Open,
            ":reindex" => SessionCommand::Reindex,
            ":close" | ":esc" => SessionCommand::Close,
            ":quit" | ":q" => SessionCommand::Quit,
            _ => SessionCommand::Query(line.to_string()),
        }
    }
}

/// Search session state over one page.
pub struct Session<'a, W: Write> {
    config: &'a Config,
    path: PathBuf,
    indexed: IndexedPage,
    panel: SearchPanel<ElementRef>,
    debouncer: Debouncer<String>,
    reporter: &'a dyn IndexProgressReporter,
    out: W,
}

impl<'a, W: Write> Session<'a, W> {
    pub fn open(
        config: &'a Config,
        path: &Path,
        reporter: &'a dyn IndexProgressReporter,
        out: W,
    ) -> Result<Self> {
        let indexed = load_index(config, path, reporter)?;
        Ok(Self {
            config,
            path: path.to_path_buf(),
            indexed,
            panel: SearchPanel::new(),
            debouncer: Debouncer::new(config.search.debounce_ms),
            reporter,
            out,
        })
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Drive the session from `input` until EOF or `:quit`.
    pub async fn run<R>(&mut self, input: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let start = Instant::now();
        let now_ms = move || start.elapsed().as_millis() as u64;
        let mut lines = input.lines();

        loop {
            let deadline = self
                .debouncer
                .deadline()
                .map(|ms| start + Duration::from_millis(ms));

            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        self.flush_pending()?;
                        break;
                    };
                    if !self.handle(SessionCommand::parse(&line), now_ms())? {
                        break;
                    }
                }
                _ = wait_until(deadline) => {
                    if let Some(query) = self.debouncer.fire_due(now_ms()) {
                        self.run_query(&query)?;
                    }
                }
            }
        }
        self.out.flush()?;
        Ok(())
    }

    /// Apply one command. Returns false when the session should end.
    pub fn handle(&mut self, command: SessionCommand, now_ms: u64) -> Result<bool> {
        match command {
            SessionCommand::Query(text) => self.debouncer.schedule(text, now_ms),
            SessionCommand::Next => {
                self.flush_pending()?;
                self.panel.select_next();
                self.print_selected()?;
            }
            SessionCommand::Prev => {
                self.flush_pending()?;
                self.panel.select_prev();
                self.print_selected()?;
            }
            SessionCommand::Open => {
                self.flush_pending()?;
                match self.panel.resolve_selected() {
                    Some(nav) => writeln!(
                        self.out,
                        "open {} {}",
                        nav.fragment,
                        self.indexed.page.describe(nav.target)
                    )?,
                    None => writeln!(self.out, "nothing selected")?,
                }
            }
            SessionCommand::Reindex => self.reindex()?,
            SessionCommand::Close => {
                self.debouncer.cancel();
                self.panel.close();
                writeln!(self.out, "closed")?;
            }
            SessionCommand::Quit => {
                self.debouncer.cancel();
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn flush_pending(&mut self) -> Result<()> {
        if let Some(query) = self.debouncer.flush() {
            self.run_query(&query)?;
        }
        Ok(())
    }

    fn run_query(&mut self, raw: &str) -> Result<()> {
        let hits = self
            .indexed
            .index
            .query(raw, &self.config.query_options());
        self.panel.set_results(raw, hits);
        let text = format_panel(&self.panel, self.config.search.excerpt_chars, false);
        if !text.is_empty() {
            writeln!(self.out, "{}", text)?;
        }
        Ok(())
    }

    fn print_selected(&mut self) -> Result<()> {
        if let (Some(i), Some(hit)) = (self.panel.selected_index(), self.panel.selected()) {
            let line = format_hit(i, hit, true, self.config.search.excerpt_chars, false);
            let first = line.lines().next().unwrap_or_default().to_string();
            writeln!(self.out, "{}", first)?;
        }
        Ok(())
    }

    fn reindex(&mut self) -> Result<()> {
        let before = self.indexed.index.fingerprint();
        self.indexed.page = HtmlPage::load(&self.path, self.config.markup_options())?;
        self.indexed.stats = self.indexed.index.reindex(&self.indexed.page);
        let changed = self.indexed.index.fingerprint() != before;

        self.reporter.report(IndexProgressEvent::Reindexed {
            records: self.indexed.stats.records,
            changed,
        });
        writeln!(
            self.out,
            "reindexed {} records ({})",
            self.indexed.stats.records,
            if changed { "changed" } else { "unchanged" }
        )?;

        // Results hold records from the previous build.
        if let Some(query) = self.panel.query().map(str::to_string) {
            self.run_query(&query)?;
        }
        Ok(())
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(d) => tokio::time::sleep_until(d).await,
        None => std::future::pending::<()>().await,
    }
}

pub async fn run_interactive(
    config: &Config,
    path: &Path,
    reporter: &dyn IndexProgressReporter,
) -> Result<()> {
    let mut session = Session::open(config, path, reporter, std::io::stdout())?;
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    session.run(stdin).await
}
