//! HTML page reader implementing [`ContentSource`].
//!
//! Parses the XHTML-style output of a static-site generator into a small
//! element tree and answers the index builder's questions about it: which
//! elements are content sections, what their anchors, headings and text
//! blocks are, and which links the sidebar holds.
//!
//! Parsing is lenient where generated HTML commonly deviates from XML: void
//! elements (`<br>`, `<img>`, ...) need no closing tag, unclosed elements are
//! closed by their parent's end tag, valueless attributes are accepted, stray
//! end tags are ignored, and `<script>`/`<style>` bodies are skipped.
//! Common named HTML entities are decoded; unknown ones are kept verbatim.

use std::path::Path;

use anyhow::{bail, Context, Result};
use quick_xml::escape::unescape_with;
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::Reader;

use mdash_search_core::source::{ContentSource, NavLinkInfo};

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose bodies are not page text.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Elements that count as text blocks inside a section.
const TEXT_BLOCK_ELEMENTS: &[&str] = &["p", "li", "td", "th"];

const HEADING_ELEMENTS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Class names that identify the page structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupOptions {
    pub section_class: String,
    pub callout_class: String,
    pub sidebar_class: String,
    pub group_class: String,
    pub group_title_class: String,
}

impl Default for MarkupOptions {
    fn default() -> Self {
        Self {
            section_class: "doc-section".to_string(),
            callout_class: "callout".to_string(),
            sidebar_class: "sidebar".to_string(),
            group_class: "nav-group".to_string(),
            group_title_class: "nav-group-title".to_string(),
        }
    }
}

/// Opaque handle to an element of an [`HtmlPage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementRef(usize);

#[derive(Debug)]
enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug)]
struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<usize>,
    parent: Option<usize>,
}

impl Element {
    fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|c| c.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }
}

/// A parsed page.
#[derive(Debug)]
pub struct HtmlPage {
    nodes: Vec<Node>,
    markup: MarkupOptions,
}

const ROOT: usize = 0;

impl HtmlPage {
    /// Read and parse a page from disk.
    pub fn load(path: &Path, markup: MarkupOptions) -> Result<Self> {
        let html = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read page: {}", path.display()))?;
        Self::parse(&html, markup)
            .with_context(|| format!("Failed to parse page: {}", path.display()))
    }

    /// Parse page markup.
    pub fn parse(html: &str, markup: MarkupOptions) -> Result<Self> {
        let html = strip_raw_text(html);
        let mut page = Self {
            nodes: vec![Node::Element(Element {
                name: "#root".to_string(),
                attrs: Vec::new(),
                children: Vec::new(),
                parent: None,
            })],
            markup,
        };

        let mut reader = Reader::from_str(&html);
        {
            let config = reader.config_mut();
            config.check_end_names = false;
            config.allow_unmatched_ends = true;
        }

        let mut stack: Vec<usize> = vec![ROOT];
        loop {
            let event = match reader.read_event() {
                Ok(ev) => ev,
                Err(e) => bail!(
                    "malformed markup at byte {}: {}",
                    reader.buffer_position(),
                    e
                ),
            };
            match event {
                Event::Start(e) => {
                    let parent = current(&stack);
                    let id = page.push_element(&e, parent);
                    if !is_void(&page.element(id).name) {
                        stack.push(id);
                    }
                }
                Event::Empty(e) => {
                    let parent = current(&stack);
                    page.push_element(&e, parent);
                }
                Event::End(e) => {
                    let name =
                        String::from_utf8_lossy(e.local_name().as_ref()).to_ascii_lowercase();
                    // Close the nearest open element with this name, and
                    // everything left open inside it.
                    if let Some(pos) = stack
                        .iter()
                        .rposition(|&id| id != ROOT && page.element(id).name == name)
                    {
                        stack.truncate(pos);
                    }
                }
                Event::Text(t) => {
                    let text = decode_text(&t);
                    if !text.is_empty() {
                        let parent = current(&stack);
                        page.push_node(Node::Text(text), parent);
                    }
                }
                Event::CData(c) => {
                    let text = String::from_utf8_lossy(&c).to_string();
                    let parent = current(&stack);
                    page.push_node(Node::Text(text), parent);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(page)
    }

    fn push_node(&mut self, node: Node, parent: usize) -> usize {
        let id = self.nodes.len();
        self.nodes.push(node);
        if let Node::Element(p) = &mut self.nodes[parent] {
            p.children.push(id);
        }
        id
    }

    fn push_element(&mut self, start: &BytesStart<'_>, parent: usize) -> usize {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).to_ascii_lowercase();
        let attrs = start
            .html_attributes()
            .filter_map(|a| a.ok())
            .map(|a| {
                let key = String::from_utf8_lossy(a.key.local_name().as_ref()).to_ascii_lowercase();
                let value = a
                    .unescape_value()
                    .map(|v| v.into_owned())
                    .unwrap_or_else(|_| String::from_utf8_lossy(&a.value).into_owned());
                (key, value)
            })
            .collect();
        self.push_node(
            Node::Element(Element {
                name,
                attrs,
                children: Vec::new(),
                parent: Some(parent),
            }),
            parent,
        )
    }

    fn element(&self, id: usize) -> &Element {
        match &self.nodes[id] {
            Node::Element(e) => e,
            Node::Text(_) => unreachable!("element ids always point at elements"),
        }
    }

    fn as_element(&self, id: usize) -> Option<&Element> {
        match self.nodes.get(id)? {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }

    /// Element descendants of `id` in document order (excluding `id`).
    fn descendants(&self, id: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack: Vec<usize> = self
            .as_element(id)
            .map(|e| e.children.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(next) = stack.pop() {
            if let Some(el) = self.as_element(next) {
                out.push(next);
                stack.extend(el.children.iter().rev().copied());
            }
        }
        out
    }

    /// Concatenated text of `id` and its descendants, whitespace collapsed.
    fn text_content(&self, id: usize) -> String {
        let mut raw = String::new();
        self.collect_text(id, &mut raw);
        collapse_whitespace(&raw)
    }

    fn collect_text(&self, id: usize, out: &mut String) {
        match &self.nodes[id] {
            Node::Text(t) => out.push_str(t),
            Node::Element(e) => {
                if e.name == "br" {
                    out.push(' ');
                }
                for &child in &e.children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    fn is_text_block(&self, el: &Element) -> bool {
        TEXT_BLOCK_ELEMENTS.contains(&el.name.as_str()) || el.has_class(&self.markup.callout_class)
    }

    fn first_element_with_id(&self, id: &str) -> Option<usize> {
        self.descendants(ROOT)
            .into_iter()
            .find(|&n| self.element(n).attr("id") == Some(id))
    }

    fn sidebar_root(&self) -> Option<usize> {
        let all = self.descendants(ROOT);
        all.iter()
            .copied()
            .find(|&n| self.element(n).has_class(&self.markup.sidebar_class))
            .or_else(|| all.iter().copied().find(|&n| self.element(n).name == "nav"))
    }

    fn group_header(&self, link: usize, sidebar: usize) -> Option<String> {
        let mut cursor = self.element(link).parent;
        while let Some(id) = cursor {
            if id == sidebar || id == ROOT {
                return None;
            }
            let el = self.element(id);
            if el.has_class(&self.markup.group_class) {
                let descendants = self.descendants(id);
                let header = descendants
                    .iter()
                    .copied()
                    .find(|&n| self.element(n).has_class(&self.markup.group_title_class))
                    .or_else(|| {
                        descendants
                            .iter()
                            .copied()
                            .find(|&n| HEADING_ELEMENTS.contains(&self.element(n).name.as_str()))
                    })?;
                return Some(self.text_content(header));
            }
            cursor = el.parent;
        }
        None
    }

    /// Short description of an element for display, e.g. `<section#install>`.
    pub fn describe(&self, element: ElementRef) -> String {
        match self.as_element(element.0) {
            Some(el) => match el.attr("id") {
                Some(id) if !id.is_empty() => format!("<{}#{}>", el.name, id),
                _ => format!("<{}>", el.name),
            },
            None => "<?>".to_string(),
        }
    }

    /// Anchor id of an element, if it has one.
    pub fn anchor(&self, element: ElementRef) -> Option<&str> {
        self.as_element(element.0)?.attr("id")
    }
}

impl ContentSource for HtmlPage {
    type Node = ElementRef;

    fn sections(&self) -> Vec<ElementRef> {
        self.descendants(ROOT)
            .into_iter()
            .filter(|&n| self.element(n).has_class(&self.markup.section_class))
            .map(ElementRef)
            .collect()
    }

    fn section_id(&self, section: &ElementRef) -> Option<String> {
        self.anchor(*section)
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
    }

    fn heading_text(&self, section: &ElementRef) -> Option<String> {
        self.descendants(section.0)
            .into_iter()
            .find(|&n| HEADING_ELEMENTS.contains(&self.element(n).name.as_str()))
            .map(|n| self.text_content(n))
    }

    fn text_blocks(&self, section: &ElementRef) -> Vec<String> {
        // Outermost qualifying elements only, so nested blocks
        // (a <p> inside an <li>) are not counted twice.
        let mut blocks = Vec::new();
        let mut stack: Vec<usize> = self
            .as_element(section.0)
            .map(|e| e.children.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(next) = stack.pop() {
            let Some(el) = self.as_element(next) else {
                continue;
            };
            if self.is_text_block(el) {
                blocks.push(self.text_content(next));
            } else {
                stack.extend(el.children.iter().rev().copied());
            }
        }
        blocks
    }

    fn nav_links(&self) -> Vec<NavLinkInfo<ElementRef>> {
        let Some(sidebar) = self.sidebar_root() else {
            return Vec::new();
        };
        self.descendants(sidebar)
            .into_iter()
            .filter_map(|n| {
                let el = self.element(n);
                if el.name != "a" {
                    return None;
                }
                let href = el.attr("href")?.trim().to_string();
                let node = href
                    .strip_prefix('#')
                    .filter(|id| !id.is_empty())
                    .and_then(|id| self.first_element_with_id(id))
                    .unwrap_or(n);
                Some(NavLinkInfo {
                    text: self.text_content(n),
                    group_header: self.group_header(n, sidebar),
                    href,
                    node: ElementRef(node),
                })
            })
            .collect()
    }
}

fn current(stack: &[usize]) -> usize {
    stack.last().copied().unwrap_or(ROOT)
}

fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Remove `<script>` and `<style>` bodies, which are not markup.
fn strip_raw_text(html: &str) -> String {
    let lower = html.to_ascii_lowercase();
    let mut out = String::with_capacity(html.len());
    let mut pos = 0;
    while pos < html.len() {
        let next = RAW_TEXT_ELEMENTS
            .iter()
            .filter_map(|tag| lower[pos..].find(&format!("<{}", tag)).map(|i| (pos + i, *tag)))
            .min_by_key(|(i, _)| *i);
        let Some((start, tag)) = next else {
            break;
        };
        out.push_str(&html[pos..start]);
        let close = format!("</{}", tag);
        pos = match lower[start..].find(&close) {
            Some(i) => {
                let close_start = start + i;
                lower[close_start..]
                    .find('>')
                    .map(|j| close_start + j + 1)
                    .unwrap_or(html.len())
            }
            None => html.len(),
        };
    }
    if pos < html.len() {
        out.push_str(&html[pos..]);
    }
    out
}

fn decode_text(t: &BytesText<'_>) -> String {
    match t.unescape_with(html_entity) {
        Ok(s) => s.into_owned(),
        Err(_) => decode_entities_lenient(&String::from_utf8_lossy(t)),
    }
}

/// Resolve each `&...;` reference on its own. References that don't resolve
/// and bare `&` are kept as written.
fn decode_entities_lenient(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let semi = rest[1..]
            .find(|c: char| c == ';' || c == '&' || c.is_whitespace())
            .map(|i| i + 1)
            .filter(|&i| rest[i..].starts_with(';'));
        match semi {
            Some(semi) => {
                let reference = &rest[..=semi];
                match unescape_with(reference, html_entity) {
                    Ok(s) => out.push_str(&s),
                    Err(_) => out.push_str(reference),
                }
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Named HTML entities beyond the five XML ones.
fn html_entity(name: &str) -> Option<&'static str> {
    Some(match name {
        "nbsp" => "\u{a0}",
        "mdash" => "\u{2014}",
        "ndash" => "\u{2013}",
        "hellip" => "\u{2026}",
        "copy" => "\u{a9}",
        "reg" => "\u{ae}",
        "trade" => "\u{2122}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "ldquo" => "\u{201c}",
        "rdquo" => "\u{201d}",
        "laquo" => "\u{ab}",
        "raquo" => "\u{bb}",
        "middot" => "\u{b7}",
        "bull" => "\u{2022}",
        "times" => "\u{d7}",
        "larr" => "\u{2190}",
        "rarr" => "\u{2192}",
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        _ => return None,
    })
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> HtmlPage {
        HtmlPage::parse(html, MarkupOptions::default()).unwrap()
    }

    #[test]
    fn collapse_whitespace_trims_and_joins() {
        assert_eq!(collapse_whitespace("  a \n\t b  "), "a b");
        assert_eq!(collapse_whitespace("\u{a0}x"), "x");
    }

    #[test]
    fn strip_raw_text_removes_script_and_style() {
        let html = "<p>a</p><script>if (a < b) {}</script><STYLE>p{}</STYLE><p>b</p>";
        assert_eq!(strip_raw_text(html), "<p>a</p><p>b</p>");
    }

    #[test]
    fn strip_raw_text_unclosed_script_drops_rest() {
        assert_eq!(strip_raw_text("<p>a</p><script>x < y"), "<p>a</p>");
    }

    #[test]
    fn void_elements_do_not_swallow_siblings() {
        let page = parse(
            r#"<div class="doc-section" id="s"><h2>Title</h2><p>one<br>two</p><img src="x.png"><p>three</p></div>"#,
        );
        let sections = page.sections();
        assert_eq!(sections.len(), 1);
        assert_eq!(page.text_blocks(&sections[0]), vec!["one two", "three"]);
    }

    #[test]
    fn entities_are_decoded() {
        let page = parse(
            r#"<div class="doc-section" id="e"><h2>A&nbsp;&mdash;&nbsp;B &amp; C</h2><p>x &unknown; y</p></div>"#,
        );
        let s = &page.sections()[0];
        // NBSP counts as whitespace and is collapsed.
        assert_eq!(page.heading_text(s).as_deref(), Some("A \u{2014} B & C"));
        assert!(page.text_blocks(s)[0].contains("&unknown;"));
    }

    #[test]
    fn unknown_entity_keeps_known_ones_decoded() {
        let page = parse(
            r#"<div class="doc-section" id="e"><h2>T</h2><p>a &amp; b &foo; c &#169; d & e&lt;</p></div>"#,
        );
        let s = &page.sections()[0];
        assert_eq!(page.text_blocks(s), vec!["a & b &foo; c \u{a9} d & e<"]);
    }

    #[test]
    fn lenient_decoding_edges() {
        assert_eq!(decode_entities_lenient("&"), "&");
        assert_eq!(decode_entities_lenient("x &; y"), "x &; y");
        assert_eq!(decode_entities_lenient("&amp&lt;"), "&amp<");
        assert_eq!(decode_entities_lenient("&#x41;&bogus;"), "A&bogus;");
    }

    #[test]
    fn unclosed_list_items_close_with_parent() {
        let page = parse(
            r#"<div class="doc-section" id="l"><ul><li>first<li>second</ul><p>after</p></div>"#,
        );
        let s = &page.sections()[0];
        assert_eq!(page.text_blocks(s), vec!["first second", "after"]);
    }

    #[test]
    fn describe_and_anchor() {
        let page = parse(r#"<section class="doc-section" id="install"><h2>I</h2></section>"#);
        let s = page.sections()[0];
        assert_eq!(page.describe(s), "<section#install>");
        assert_eq!(page.anchor(s), Some("install"));
    }
}
