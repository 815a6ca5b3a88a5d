//! `mdsearch nav`: print the sidebar outline and replay navigation keys.

use anyhow::{bail, Result};
use std::path::Path;

use mdash_search_core::nav::{NavAction, NavKey, SidebarNav};
use mdash_search_core::source::ContentSource;

use crate::config::Config;
use crate::html::HtmlPage;

/// Build the sidebar state for a page.
pub fn sidebar_for(page: &HtmlPage) -> SidebarNav {
    SidebarNav::from_links(&page.nav_links())
}

/// Parse a whitespace-separated key sequence such as `"j j l enter"`.
pub fn parse_keys(keys: &str) -> Result<Vec<NavKey>> {
    keys.split_whitespace()
        .map(|k| match NavKey::parse(k) {
            Some(key) => Ok(key),
            None => bail!(
                "Unknown key: '{}'. Use up/down/left/right/home/end/enter or j/k/h/l/g/G.",
                k
            ),
        })
        .collect()
}

/// Render the visible outline, one entry per line, cursor marked with `>`.
pub fn format_outline(nav: &SidebarNav) -> String {
    nav.outline()
        .into_iter()
        .map(|line| {
            let marker = if line.selected { ">" } else { " " };
            let indent = "  ".repeat(line.depth);
            match (line.expanded, line.href) {
                (Some(expanded), _) => {
                    let sign = if expanded { "-" } else { "+" };
                    format!("{} {}{} {}", marker, indent, sign, line.label)
                }
                (None, Some(href)) => format!("{} {}{}  {}", marker, indent, line.label, href),
                (None, None) => format!("{} {}{}", marker, indent, line.label),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replay keys and return the last navigation target, if any key followed a link.
pub fn replay(nav: &mut SidebarNav, keys: &[NavKey]) -> Option<String> {
    let mut target = None;
    for key in keys {
        if let NavAction::Navigate { href } = nav.handle_key(*key) {
            target = Some(href);
        }
    }
    target
}

pub fn run_nav(config: &Config, path: &Path, keys: Option<&str>) -> Result<()> {
    let page = HtmlPage::load(path, config.markup_options())?;
    let mut nav = sidebar_for(&page);
    let keys = parse_keys(keys.unwrap_or(""))?;

    let target = replay(&mut nav, &keys);
    let outline = format_outline(&nav);
    if outline.is_empty() {
        println!("No sidebar links.");
        return Ok(());
    }
    println!("{}", outline);
    if let Some(href) = target {
        println!();
        println!("navigate {}", href);
    }
    Ok(())
}
