//! # mdash search
//!
//! In-page search and keyboard navigation for static documentation pages.
//!
//! A page is parsed once, its sections and sidebar links are flattened into
//! searchable records, and queries are answered with a case-insensitive
//! substring match over record titles and content. The same page also drives
//! a collapsible sidebar outline with keyboard navigation.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌──────────────┐   ┌─────────────┐
//! │  HTML page │──▶│ Index builder│──▶│ Query engine│
//! │ (quick-xml)│   │   (records)  │   │ (substring) │
//! └─────┬──────┘   └──────────────┘   └──────┬──────┘
//!       │                                    ▼
//!       │          ┌──────────────┐   ┌─────────────┐
//!       └─────────▶│ Sidebar nav  │   │ Search panel│
//!                  └──────────────┘   └─────────────┘
//! ```
//!
//! The page-independent parts (records, query engine, panel state, debounce,
//! sidebar state) live in `mdash-search-core`. This crate adds the HTML
//! content source, configuration, progress reporting and the `mdsearch` CLI.
//!
//! ## Quick Start
//!
//! ```bash
//! mdsearch index site/index.html
//! mdsearch search site/index.html "install"
//! mdsearch nav site/index.html --keys "j j enter"
//! mdsearch interactive site/index.html
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`html`] | HTML page parsing and the page content source |
//! | [`index_cmd`] | Index building and listing |
//! | [`search`] | One-shot search and hit formatting |
//! | [`nav_cmd`] | Sidebar outline and key replay |
//! | [`interactive`] | Debounced line-driven search session |
//! | [`progress`] | Index progress reporting on stderr |

pub mod config;
pub mod html;
pub mod index_cmd;
pub mod interactive;
pub mod nav_cmd;
pub mod progress;
pub mod search;
