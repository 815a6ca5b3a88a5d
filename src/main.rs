//! # mdash search CLI (`mdsearch`)
//!
//! Builds the in-page search index for a documentation page and answers
//! queries against it, the same way the page's search box does.
//!
//! ## Usage
//!
//! ```bash
//! mdsearch --config ./config/mdsearch.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `mdsearch index <page>` | Build the index and list its records |
//! | `mdsearch search <page> "<query>"` | Run one query and print the hits |
//! | `mdsearch nav <page>` | Print the sidebar outline, optionally replaying keys |
//! | `mdsearch interactive <page>` | Read queries and commands from stdin |
//!
//! ## Examples
//!
//! ```bash
//! # List the records of a page as JSON
//! mdsearch index site/index.html --json
//!
//! # Search with a custom result cap
//! mdsearch search site/index.html "config" --limit 5
//!
//! # Expand the second sidebar group and follow its first link
//! mdsearch nav site/index.html --keys "j j l j enter"
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use mdash_search::config;
use mdash_search::index_cmd;
use mdash_search::interactive;
use mdash_search::nav_cmd;
use mdash_search::progress::ProgressMode;
use mdash_search::search;

const DEFAULT_CONFIG_PATH: &str = "./config/mdsearch.toml";

/// mdash search: in-page search and sidebar navigation for documentation pages.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/mdsearch.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "mdsearch",
    about = "In-page search and sidebar navigation for static documentation pages",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/mdsearch.toml`. When the default file does not
    /// exist, built-in defaults are used.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Build the search index for a page and list its records.
    ///
    /// Prints one line per record followed by the record count and a
    /// fingerprint of the index contents.
    Index {
        /// HTML page to index.
        page: PathBuf,

        /// Print the records as JSON.
        #[arg(long)]
        json: bool,

        /// Progress output on stderr: `off`, `human` or `json`.
        /// Defaults to `human` when stderr is a terminal.
        #[arg(long, value_parser = ProgressMode::parse)]
        progress: Option<ProgressMode>,
    },

    /// Run a single query against a page.
    ///
    /// Prints nothing for a blank query and a "No results" line when
    /// nothing matches.
    Search {
        /// HTML page to search.
        page: PathBuf,

        /// The search query string.
        query: String,

        /// Maximum number of results to return.
        #[arg(long)]
        limit: Option<usize>,

        /// Print the results as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the sidebar outline of a page.
    ///
    /// With `--keys`, replays a key sequence (`up down left right home end
    /// enter` or `j k h l g G`) and prints the resulting outline and the
    /// link followed, if any.
    Nav {
        /// HTML page to read.
        page: PathBuf,

        /// Whitespace-separated keys to replay.
        #[arg(long)]
        keys: Option<String>,
    },

    /// Start an interactive search session on stdin.
    ///
    /// Each line is a query (debounced) or a command: `:next`, `:prev`,
    /// `:open`, `:reindex`, `:close`, `:quit`.
    Interactive {
        /// HTML page to search.
        page: PathBuf,

        /// Progress output on stderr: `off`, `human` or `json`.
        #[arg(long, value_parser = ProgressMode::parse)]
        progress: Option<ProgressMode>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let is_default_path = cli.config.as_os_str() == DEFAULT_CONFIG_PATH;
    let cfg = config::load_config_or_default(&cli.config, is_default_path)?;

    match cli.command {
        Commands::Index {
            page,
            json,
            progress,
        } => {
            let mode = progress.unwrap_or_else(ProgressMode::default_for_tty);
            index_cmd::run_index(&cfg, &page, json, mode.reporter().as_ref())?;
        }
        Commands::Search {
            page,
            query,
            limit,
            json,
        } => {
            search::run_search(&cfg, &page, &query, limit, json)?;
        }
        Commands::Nav { page, keys } => {
            nav_cmd::run_nav(&cfg, &page, keys.as_deref())?;
        }
        Commands::Interactive { page, progress } => {
            let mode = progress.unwrap_or_else(ProgressMode::default_for_tty);
            interactive::run_interactive(&cfg, &page, mode.reporter().as_ref()).await?;
        }
    }

    Ok(())
}
