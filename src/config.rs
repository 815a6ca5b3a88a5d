use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use mdash_search_core::index::IndexOptions;
use mdash_search_core::search::QueryOptions;

use crate::html::MarkupOptions;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub markup: MarkupConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IndexConfig {
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            max_content_chars: default_max_content_chars(),
        }
    }
}

fn default_max_content_chars() -> usize {
    500
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_excerpt_chars")]
    pub excerpt_chars: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            result_limit: default_result_limit(),
            debounce_ms: default_debounce_ms(),
            excerpt_chars: default_excerpt_chars(),
        }
    }
}

fn default_result_limit() -> usize {
    10
}
fn default_debounce_ms() -> u64 {
    150
}
fn default_excerpt_chars() -> usize {
    160
}

#[derive(Debug, Deserialize, Clone)]
pub struct MarkupConfig {
    #[serde(default = "default_section_class")]
    pub section_class: String,
    #[serde(default = "default_callout_class")]
    pub callout_class: String,
    #[serde(default = "default_sidebar_class")]
    pub sidebar_class: String,
    #[serde(default = "default_group_class")]
    pub group_class: String,
    #[serde(default = "default_group_title_class")]
    pub group_title_class: String,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            section_class: default_section_class(),
            callout_class: default_callout_class(),
            sidebar_class: default_sidebar_class(),
            group_class: default_group_class(),
            group_title_class: default_group_title_class(),
        }
    }
}

fn default_section_class() -> String {
    "doc-section".to_string()
}
fn default_callout_class() -> String {
    "callout".to_string()
}
fn default_sidebar_class() -> String {
    "sidebar".to_string()
}
fn default_group_class() -> String {
    "nav-group".to_string()
}
fn default_group_title_class() -> String {
    "nav-group-title".to_string()
}

impl Config {
    pub fn index_options(&self) -> IndexOptions {
        IndexOptions {
            max_content_chars: self.index.max_content_chars,
        }
    }

    pub fn query_options(&self) -> QueryOptions {
        QueryOptions {
            limit: self.search.result_limit,
        }
    }

    pub fn markup_options(&self) -> MarkupOptions {
        MarkupOptions {
            section_class: self.markup.section_class.clone(),
            callout_class: self.markup.callout_class.clone(),
            sidebar_class: self.markup.sidebar_class.clone(),
            group_class: self.markup.group_class.clone(),
            group_title_class: self.markup.group_title_class.clone(),
        }
    }
}

/// Load the config file, or built-in defaults when `path` is the default
/// location and nothing is there.
pub fn load_config_or_default(path: &Path, is_default_path: bool) -> Result<Config> {
    if is_default_path && !path.exists() {
        return Ok(Config::default());
    }
    load_config(path)
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.index.max_content_chars == 0 {
        anyhow::bail!("index.max_content_chars must be > 0");
    }

    if config.search.result_limit < 1 {
        anyhow::bail!("search.result_limit must be >= 1");
    }

    if config.search.excerpt_chars == 0 {
        anyhow::bail!("search.excerpt_chars must be > 0");
    }

    for (key, value) in [
        ("markup.section_class", &config.markup.section_class),
        ("markup.callout_class", &config.markup.callout_class),
        ("markup.sidebar_class", &config.markup.sidebar_class),
        ("markup.group_class", &config.markup.group_class),
        ("markup.group_title_class", &config.markup.group_title_class),
    ] {
        if value.trim().is_empty() || value.contains(char::is_whitespace) {
            anyhow::bail!("{} must be a single non-empty class name", key);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(body.as_bytes()).unwrap();
        f
    }

    #[test]
    fn empty_file_uses_defaults() {
        let f = write_config("");
        let cfg = load_config(f.path()).unwrap();
        assert_eq!(cfg.index.max_content_chars, 500);
        assert_eq!(cfg.search.result_limit, 10);
        assert_eq!(cfg.search.debounce_ms, 150);
        assert_eq!(cfg.markup.section_class, "doc-section");
    }

    #[test]
    fn overrides_are_read() {
        let f = write_config(
            "[index]\nmax_content_chars = 200\n\n[search]\nresult_limit = 5\n\n[markup]\nsection_class = \"section\"\n",
        );
        let cfg = load_config(f.path()).unwrap();
        assert_eq!(cfg.index_options().max_content_chars, 200);
        assert_eq!(cfg.query_options().limit, 5);
        assert_eq!(cfg.markup_options().section_class, "section");
        assert_eq!(cfg.markup_options().callout_class, "callout");
    }

    #[test]
    fn zero_limit_rejected() {
        let f = write_config("[search]\nresult_limit = 0\n");
        let err = load_config(f.path()).unwrap_err();
        assert!(err.to_string().contains("result_limit"));
    }

    #[test]
    fn zero_content_chars_rejected() {
        let f = write_config("[index]\nmax_content_chars = 0\n");
        assert!(load_config(f.path()).is_err());
    }

    #[test]
    fn class_with_spaces_rejected() {
        let f = write_config("[markup]\nsidebar_class = \"side bar\"\n");
        assert!(load_config(f.path()).is_err());
    }

    #[test]
    fn missing_default_path_falls_back() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(load_config_or_default(&path, true).is_ok());
        assert!(load_config_or_default(&path, false).is_err());
    }
}
