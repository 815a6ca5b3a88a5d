//! # mdash search core
//!
//! Shared, WASM-safe logic for the mdash documentation-site widgets: the
//! searchable record model, the content-source capability trait, the index
//! builder and query engine, result selection, keystroke debouncing, and
//! sidebar keyboard navigation.
//!
//! This crate contains no tokio, filesystem I/O, or other native-only
//! dependencies. Time is supplied by the caller as millisecond timestamps so
//! the same code runs under a browser event loop or a native runtime.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`models`] | Records, match spans, and hits |
//! | [`source`] | [`ContentSource`](source::ContentSource) trait and in-memory fixture source |
//! | [`index`] | Index builder and the owned [`SearchIndex`](index::SearchIndex) store |
//! | [`search`] | Substring query engine |
//! | [`render`] | Excerpts and match highlighting |
//! | [`panel`] | Result list selection and resolution |
//! | [`debounce`] | Cancellable delayed task for keystroke coalescing |
//! | [`nav`] | Sidebar keyboard navigation and scroll-spy |

pub mod debounce;
pub mod index;
pub mod models;
pub mod nav;
pub mod panel;
pub mod render;
pub mod search;
pub mod source;
