//! Sidebar keyboard navigation and scroll-spy.
//!
//! The sidebar is a list of groups, each with an optional header and a run of
//! links. Links outside any group form a headerless group that cannot be
//! collapsed. The cursor moves over *visible* entries only: group headers,
//! plus the links of expanded groups.
//!
//! | Key | Effect |
//! |-----|--------|
//! | `Down` / `j` | next visible entry |
//! | `Up` / `k` | previous visible entry |
//! | `Home` / `g` | first entry |
//! | `End` / `G` | last entry |
//! | `Left` / `h` | collapse the current group, cursor to its header |
//! | `Right` / `l` | expand the group under the cursor |
//! | `Enter` | toggle a header, or follow a link |

use crate::source::NavLinkInfo;

/// One sidebar link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub label: String,
    pub href: String,
}

/// A run of links under an optional header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavGroup {
    pub title: Option<String>,
    pub expanded: bool,
    pub items: Vec<NavItem>,
}

/// Keyboard input understood by the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Enter,
}

impl NavKey {
    /// Parse a key name: arrow names, `home`, `end`, `enter`, or vim keys.
    ///
    /// Vim keys are case-sensitive (`g` is home, `G` is end).
    pub fn parse(name: &str) -> Option<NavKey> {
        match name {
            "j" => return Some(NavKey::Down),
            "k" => return Some(NavKey::Up),
            "h" => return Some(NavKey::Left),
            "l" => return Some(NavKey::Right),
            "g" => return Some(NavKey::Home),
            "G" => return Some(NavKey::End),
            _ => {}
        }
        match name.to_ascii_lowercase().as_str() {
            "up" | "arrowup" => Some(NavKey::Up),
            "down" | "arrowdown" => Some(NavKey::Down),
            "left" | "arrowleft" => Some(NavKey::Left),
            "right" | "arrowright" => Some(NavKey::Right),
            "home" => Some(NavKey::Home),
            "end" => Some(NavKey::End),
            "enter" | "return" => Some(NavKey::Enter),
            _ => None,
        }
    }
}

/// Outcome of a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavAction {
    /// Nothing changed (already at an edge, or the key does not apply).
    None,
    /// The cursor moved.
    Moved,
    /// A group was expanded or collapsed.
    Toggled { group: usize, expanded: bool },
    /// A link was activated; the host should navigate to `href`.
    Navigate { href: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    Header(usize),
    Link(usize, usize),
}

/// One rendered sidebar line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineLine {
    /// 0 for headers and ungrouped links, 1 for links inside a titled group.
    pub depth: usize,
    pub label: String,
    pub href: Option<String>,
    /// `Some(expanded)` for group headers.
    pub expanded: Option<bool>,
    pub selected: bool,
}

/// Sidebar state: groups plus a cursor over visible entries.
#[derive(Debug, Clone)]
pub struct SidebarNav {
    groups: Vec<NavGroup>,
    cursor: Option<Entry>,
}

impl SidebarNav {
    pub fn new(groups: Vec<NavGroup>) -> Self {
        let mut nav = Self {
            groups,
            cursor: None,
        };
        nav.cursor = nav.visible().first().copied();
        nav
    }

    /// Group consecutive links that share a header. All groups start expanded.
    pub fn from_links<N>(links: &[NavLinkInfo<N>]) -> Self {
        let mut groups: Vec<NavGroup> = Vec::new();
        for link in links {
            let title = link
                .group_header
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string);
            let item = NavItem {
                label: link.text.trim().to_string(),
                href: link.href.clone(),
            };
            match groups.last_mut() {
                Some(last) if last.title == title => last.items.push(item),
                _ => groups.push(NavGroup {
                    title,
                    expanded: true,
                    items: vec![item],
                }),
            }
        }
        Self::new(groups)
    }

    pub fn groups(&self) -> &[NavGroup] {
        &self.groups
    }

    fn visible(&self) -> Vec<Entry> {
        let mut out = Vec::new();
        for (gi, group) in self.groups.iter().enumerate() {
            let has_header = group.title.is_some();
            if has_header {
                out.push(Entry::Header(gi));
            }
            if group.expanded || !has_header {
                out.extend((0..group.items.len()).map(|li| Entry::Link(gi, li)));
            }
        }
        out
    }

    fn cursor_pos(&self, visible: &[Entry]) -> Option<usize> {
        self.cursor.and_then(|c| visible.iter().position(|e| *e == c))
    }

    fn move_to(&mut self, visible: &[Entry], pos: usize) -> NavAction {
        let target = visible.get(pos).copied();
        if target.is_none() || target == self.cursor {
            return NavAction::None;
        }
        self.cursor = target;
        NavAction::Moved
    }

    fn set_expanded(&mut self, group: usize, expanded: bool) -> NavAction {
        match self.groups.get_mut(group) {
            Some(g) if g.title.is_some() && g.expanded != expanded => {
                g.expanded = expanded;
                NavAction::Toggled { group, expanded }
            }
            _ => NavAction::None,
        }
    }

    pub fn handle_key(&mut self, key: NavKey) -> NavAction {
        let visible = self.visible();
        if visible.is_empty() {
            return NavAction::None;
        }
        let pos = self.cursor_pos(&visible).unwrap_or(0);

        match key {
            NavKey::Down => self.move_to(&visible, (pos + 1).min(visible.len() - 1)),
            NavKey::Up => self.move_to(&visible, pos.saturating_sub(1)),
            NavKey::Home => self.move_to(&visible, 0),
            NavKey::End => self.move_to(&visible, visible.len() - 1),
            NavKey::Left => match visible[pos] {
                Entry::Header(g) => self.set_expanded(g, false),
                Entry::Link(g, _) => {
                    let action = self.set_expanded(g, false);
                    if action != NavAction::None {
                        self.cursor = Some(Entry::Header(g));
                    }
                    action
                }
            },
            NavKey::Right => match visible[pos] {
                Entry::Header(g) => self.set_expanded(g, true),
                Entry::Link(..) => NavAction::None,
            },
            NavKey::Enter => match visible[pos] {
                Entry::Header(g) => {
                    let expanded = self.groups[g].expanded;
                    self.set_expanded(g, !expanded)
                }
                Entry::Link(g, l) => NavAction::Navigate {
                    href: self.groups[g].items[l].href.clone(),
                },
            },
        }
    }

    /// The link under the cursor, if the cursor is on a link.
    pub fn current_link(&self) -> Option<&NavItem> {
        match self.cursor? {
            Entry::Link(g, l) => self.groups.get(g)?.items.get(l),
            Entry::Header(_) => None,
        }
    }

    /// Move the cursor to the link for section `id`, expanding its group.
    ///
    /// Used to follow scroll-spy. Returns false if no link points at `id`.
    pub fn reveal(&mut self, id: &str) -> bool {
        let href = format!("#{}", id);
        for (gi, group) in self.groups.iter_mut().enumerate() {
            if let Some(li) = group.items.iter().position(|i| i.href == href) {
                group.expanded = true;
                self.cursor = Some(Entry::Link(gi, li));
                return true;
            }
        }
        false
    }

    /// Render the visible entries, marking the cursor.
    pub fn outline(&self) -> Vec<OutlineLine> {
        self.visible()
            .into_iter()
            .map(|entry| {
                let selected = Some(entry) == self.cursor;
                match entry {
                    Entry::Header(g) => OutlineLine {
                        depth: 0,
                        label: self.groups[g].title.clone().unwrap_or_default(),
                        href: None,
                        expanded: Some(self.groups[g].expanded),
                        selected,
                    },
                    Entry::Link(g, l) => OutlineLine {
                        depth: usize::from(self.groups[g].title.is_some()),
                        label: self.groups[g].items[l].label.clone(),
                        href: Some(self.groups[g].items[l].href.clone()),
                        expanded: None,
                        selected,
                    },
                }
            })
            .collect()
    }
}

/// Picks the section currently in view from section positions.
#[derive(Debug, Clone, Default)]
pub struct ScrollSpy {
    sections: Vec<(String, f64)>,
}

impl ScrollSpy {
    /// `sections` are `(id, top)` pairs in document order.
    pub fn new(sections: Vec<(String, f64)>) -> Self {
        Self { sections }
    }

    /// Id of the last section whose top is at or above `scroll_top + offset`.
    ///
    /// Above the first section, the first section is active.
    pub fn active(&self, scroll_top: f64, offset: f64) -> Option<&str> {
        let line = scroll_top + offset;
        let first = self.sections.first()?;
        let current = self
            .sections
            .iter()
            .take_while(|(_, top)| *top <= line)
            .last()
            .unwrap_or(first);
        Some(current.0.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(href: &str, text: &str, group: Option<&str>) -> NavLinkInfo<()> {
        NavLinkInfo {
            href: href.to_string(),
            text: text.to_string(),
            group_header: group.map(str::to_string),
            node: (),
        }
    }

    fn sidebar() -> SidebarNav {
        SidebarNav::from_links(&[
            link("#home", "Home", None),
            link("#intro", "Introduction", Some("Getting started")),
            link("#install", "Installation", Some("Getting started")),
            link("#config", "Configuration", Some("Guides")),
            link("#deploy", "Deploying", Some("Guides")),
        ])
    }

    fn selected_label(nav: &SidebarNav) -> String {
        nav.outline()
            .into_iter()
            .find(|l| l.selected)
            .map(|l| l.label)
            .unwrap_or_default()
    }

    #[test]
    fn groups_consecutive_links_by_header() {
        let nav = sidebar();
        let titles: Vec<Option<&str>> =
            nav.groups().iter().map(|g| g.title.as_deref()).collect();
        assert_eq!(titles, vec![None, Some("Getting started"), Some("Guides")]);
        assert_eq!(nav.groups()[1].items.len(), 2);
    }

    #[test]
    fn parse_keys() {
        assert_eq!(NavKey::parse("j"), Some(NavKey::Down));
        assert_eq!(NavKey::parse("ArrowUp"), Some(NavKey::Up));
        assert_eq!(NavKey::parse("g"), Some(NavKey::Home));
        assert_eq!(NavKey::parse("G"), Some(NavKey::End));
        assert_eq!(NavKey::parse("ENTER"), Some(NavKey::Enter));
        assert_eq!(NavKey::parse("x"), None);
    }

    #[test]
    fn cursor_moves_and_clamps() {
        let mut nav = sidebar();
        assert_eq!(selected_label(&nav), "Home");
        assert_eq!(nav.handle_key(NavKey::Up), NavAction::None);

        assert_eq!(nav.handle_key(NavKey::Down), NavAction::Moved);
        assert_eq!(selected_label(&nav), "Getting started");

        nav.handle_key(NavKey::End);
        assert_eq!(selected_label(&nav), "Deploying");
        assert_eq!(nav.handle_key(NavKey::Down), NavAction::None);

        nav.handle_key(NavKey::Home);
        assert_eq!(selected_label(&nav), "Home");
    }

    #[test]
    fn collapse_from_link_moves_to_header_and_hides_links() {
        let mut nav = sidebar();
        nav.handle_key(NavKey::Down);
        nav.handle_key(NavKey::Down);
        assert_eq!(nav.current_link().unwrap().href, "#intro");

        assert_eq!(
            nav.handle_key(NavKey::Left),
            NavAction::Toggled {
                group: 1,
                expanded: false
            }
        );
        assert_eq!(selected_label(&nav), "Getting started");

        nav.handle_key(NavKey::Down);
        assert_eq!(selected_label(&nav), "Guides");

        let labels: Vec<String> = nav.outline().into_iter().map(|l| l.label).collect();
        assert!(!labels.contains(&"Introduction".to_string()));
    }

    #[test]
    fn enter_toggles_header_and_follows_link() {
        let mut nav = sidebar();
        nav.handle_key(NavKey::Down);
        assert_eq!(
            nav.handle_key(NavKey::Enter),
            NavAction::Toggled {
                group: 1,
                expanded: false
            }
        );
        assert_eq!(
            nav.handle_key(NavKey::Right),
            NavAction::Toggled {
                group: 1,
                expanded: true
            }
        );
        nav.handle_key(NavKey::Down);
        nav.handle_key(NavKey::Down);
        assert_eq!(
            nav.handle_key(NavKey::Enter),
            NavAction::Navigate {
                href: "#install".to_string()
            }
        );
    }

    #[test]
    fn ungrouped_links_cannot_collapse() {
        let mut nav = sidebar();
        assert_eq!(nav.handle_key(NavKey::Left), NavAction::None);
        assert_eq!(selected_label(&nav), "Home");
    }

    #[test]
    fn reveal_expands_group_and_selects_link() {
        let mut nav = sidebar();
        nav.handle_key(NavKey::End);
        nav.handle_key(NavKey::Left);
        assert!(!nav.groups()[2].expanded);

        assert!(nav.reveal("config"));
        assert!(nav.groups()[2].expanded);
        assert_eq!(nav.current_link().unwrap().label, "Configuration");
        assert!(!nav.reveal("missing"));
    }

    #[test]
    fn empty_sidebar_ignores_keys() {
        let mut nav = SidebarNav::new(Vec::new());
        assert_eq!(nav.handle_key(NavKey::Down), NavAction::None);
        assert!(nav.outline().is_empty());
        assert!(nav.current_link().is_none());
    }

    #[test]
    fn outline_depths() {
        let nav = sidebar();
        let depths: Vec<usize> = nav.outline().iter().map(|l| l.depth).collect();
        assert_eq!(depths, vec![0, 0, 1, 1, 0, 1, 1]);
    }

    #[test]
    fn scroll_spy_picks_last_passed_section() {
        let spy = ScrollSpy::new(vec![
            ("intro".to_string(), 0.0),
            ("install".to_string(), 400.0),
            ("config".to_string(), 900.0),
        ]);
        assert_eq!(spy.active(0.0, 0.0), Some("intro"));
        assert_eq!(spy.active(350.0, 60.0), Some("install"));
        assert_eq!(spy.active(399.0, 0.0), Some("intro"));
        assert_eq!(spy.active(5_000.0, 0.0), Some("config"));
    }

    #[test]
    fn scroll_spy_above_first_and_empty() {
        let spy = ScrollSpy::new(vec![("a".to_string(), 200.0)]);
        assert_eq!(spy.active(0.0, 0.0), Some("a"));
        assert_eq!(ScrollSpy::default().active(0.0, 0.0), None);
    }
}
