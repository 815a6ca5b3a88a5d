//! In-memory [`ContentSource`] for tests and embedding hosts that already
//! hold the page structure as plain data.

use super::{ContentSource, NavLinkInfo};

/// One synthetic content container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionFixture {
    pub id: Option<String>,
    pub heading: Option<String>,
    pub blocks: Vec<String>,
}

impl SectionFixture {
    pub fn new(id: &str, heading: &str, blocks: &[&str]) -> Self {
        Self {
            id: Some(id.to_string()),
            heading: Some(heading.to_string()),
            blocks: blocks.iter().map(|b| b.to_string()).collect(),
        }
    }
}

/// One synthetic sidebar link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkFixture {
    pub href: String,
    pub text: String,
    pub group_header: Option<String>,
}

/// Location handle for [`InMemorySource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureNode {
    Section(usize),
    Link(usize),
}

/// In-memory page structure. Built with the `with_*` builder methods.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    sections: Vec<SectionFixture>,
    links: Vec<LinkFixture>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_section(mut self, section: SectionFixture) -> Self {
        self.sections.push(section);
        self
    }

    pub fn with_link(mut self, href: &str, text: &str, group_header: Option<&str>) -> Self {
        self.links.push(LinkFixture {
            href: href.to_string(),
            text: text.to_string(),
            group_header: group_header.map(str::to_string),
        });
        self
    }

    /// Mutable access to a section, for tests that change the page between builds.
    pub fn section_mut(&mut self, index: usize) -> Option<&mut SectionFixture> {
        self.sections.get_mut(index)
    }
}

impl ContentSource for InMemorySource {
    type Node = FixtureNode;

    fn sections(&self) -> Vec<FixtureNode> {
        (0..self.sections.len()).map(FixtureNode::Section).collect()
    }

    fn section_id(&self, section: &FixtureNode) -> Option<String> {
        match section {
            FixtureNode::Section(i) => self.sections.get(*i).and_then(|s| s.id.clone()),
            FixtureNode::Link(_) => None,
        }
    }

    fn heading_text(&self, section: &FixtureNode) -> Option<String> {
        match section {
            FixtureNode::Section(i) => self.sections.get(*i).and_then(|s| s.heading.clone()),
            FixtureNode::Link(_) => None,
        }
    }

    fn text_blocks(&self, section: &FixtureNode) -> Vec<String> {
        match section {
            FixtureNode::Section(i) => self
                .sections
                .get(*i)
                .map(|s| s.blocks.clone())
                .unwrap_or_default(),
            FixtureNode::Link(_) => Vec::new(),
        }
    }

    fn nav_links(&self) -> Vec<NavLinkInfo<FixtureNode>> {
        self.links
            .iter()
            .enumerate()
            .map(|(i, l)| NavLinkInfo {
                href: l.href.clone(),
                text: l.text.clone(),
                group_header: l.group_header.clone(),
                node: FixtureNode::Link(i),
            })
            .collect()
    }
}
