//! Content source abstraction.
//!
//! The [`ContentSource`] trait is the capability interface the index builder
//! reads a page through: enumerate the content sections, read each section's
//! anchor, heading and text blocks, and list the sidebar links. Hosts provide
//! an implementation over their document tree (a parsed HTML page, a browser
//! DOM); tests use [`memory::InMemorySource`].

pub mod memory;

/// A sidebar link as seen by the index builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLinkInfo<N> {
    /// Raw `href` attribute. Only values starting with `#` are indexed.
    pub href: String,
    /// Visible link text.
    pub text: String,
    /// Text of the nearest enclosing navigation group header, if any.
    pub group_header: Option<String>,
    /// Location of the link's target.
    pub node: N,
}

/// Read-only view of a page's searchable structure.
///
/// All methods are expected to be cheap and side-effect free; the index
/// builder calls them once per build. Sections are returned in document
/// order, and that order becomes index order.
///
/// # Example
///
/// ```rust
/// use mdash_search_core::source::ContentSource;
/// use mdash_search_core::source::memory::{InMemorySource, SectionFixture};
///
/// let source = InMemorySource::new()
///     .with_section(SectionFixture::new("intro", "Introduction", &["Welcome"]));
/// let sections = source.sections();
/// assert_eq!(source.section_id(&sections[0]).as_deref(), Some("intro"));
/// ```
pub trait ContentSource {
    /// Opaque handle to a location in the document. Stored on each record
    /// as its navigation target.
    type Node: Clone;

    /// All content containers, in document order.
    fn sections(&self) -> Vec<Self::Node>;

    /// The container's anchor id, if it has one.
    fn section_id(&self, section: &Self::Node) -> Option<String>;

    /// Text of the first heading inside the container.
    fn heading_text(&self, section: &Self::Node) -> Option<String>;

    /// Text of each qualifying text-bearing element inside the container
    /// (paragraphs, list items, table cells, callouts), in document order.
    fn text_blocks(&self, section: &Self::Node) -> Vec<String>;

    /// All sidebar links, in document order.
    fn nav_links(&self) -> Vec<NavLinkInfo<Self::Node>>;
}
