//! Index progress reporting.
//!
//! Reports what the indexer is doing (which page it is scanning, how many
//! records it produced, whether a re-index changed anything). Progress is
//! emitted on **stderr** so stdout remains parseable for scripts.

use std::io::Write;

/// A single progress event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IndexProgressEvent {
    /// A page is being read and parsed.
    Scanning { page: String },
    /// A page was indexed.
    Indexed {
        page: String,
        records: usize,
        sections: usize,
        links: usize,
        duplicates: usize,
    },
    /// The index was rebuilt on request.
    Reindexed { records: usize, changed: bool },
}

/// Reports index progress. Implementations write to stderr (human or JSON).
pub trait IndexProgressReporter: Send + Sync {
    /// Emit a progress event.
    fn report(&self, event: IndexProgressEvent);
}

/// Human-friendly progress on stderr: "index docs.html  42 records (30 sections, 12 links)".
pub struct StderrProgress;

impl IndexProgressReporter for StderrProgress {
    fn report(&self, event: IndexProgressEvent) {
        let _ = std::io::stderr()
            .lock()
            .write_all(human_line(&event).as_bytes());
    }
}

fn human_line(event: &IndexProgressEvent) -> String {
    match event {
        IndexProgressEvent::Scanning { page } => format!("index {}  scanning...\n", page),
        IndexProgressEvent::Indexed {
            page,
            records,
            sections,
            links,
            duplicates,
        } => {
            let mut line = format!(
                "index {}  {} records ({} sections, {} links)",
                page,
                format_number(*records as u64),
                format_number(*sections as u64),
                format_number(*links as u64)
            );
            if *duplicates > 0 {
                line.push_str(&format!(", {} duplicate ids skipped", duplicates));
            }
            line.push('\n');
            line
        }
        IndexProgressEvent::Reindexed { records, changed } => format!(
            "reindex  {} records  {}\n",
            format_number(*records as u64),
            if *changed { "changed" } else { "unchanged" }
        ),
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl IndexProgressReporter for JsonProgress {
    fn report(&self, event: IndexProgressEvent) {
        if let Ok(line) = serde_json::to_string(&json_event(&event)) {
            let _ = writeln!(std::io::stderr().lock(), "{}", line);
        }
    }
}

fn json_event(event: &IndexProgressEvent) -> serde_json::Value {
    match event {
        IndexProgressEvent::Scanning { page } => serde_json::json!({
            "event": "progress",
            "page": page,
            "phase": "scanning"
        }),
        IndexProgressEvent::Indexed {
            page,
            records,
            sections,
            links,
            duplicates,
        } => serde_json::json!({
            "event": "progress",
            "page": page,
            "phase": "indexed",
            "records": records,
            "sections": sections,
            "links": links,
            "duplicates": duplicates
        }),
        IndexProgressEvent::Reindexed { records, changed } => serde_json::json!({
            "event": "progress",
            "phase": "reindexed",
            "records": records,
            "changed": changed
        }),
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl IndexProgressReporter for NoProgress {
    fn report(&self, _event: IndexProgressEvent) {}
}

fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + (s.len() - 1) / 3);
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Default: human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    /// Parse `off`, `human` or `json`.
    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "off" => Ok(ProgressMode::Off),
            "human" => Ok(ProgressMode::Human),
            "json" => Ok(ProgressMode::Json),
            other => Err(format!(
                "unknown progress mode '{}': use off, human, or json",
                other
            )),
        }
    }

    /// Build a reporter for this mode.
    pub fn reporter(&self) -> Box<dyn IndexProgressReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_number_comma() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1_234_567), "1,234,567");
    }

    #[test]
    fn human_line_mentions_duplicates_only_when_present() {
        let line = human_line(&IndexProgressEvent::Indexed {
            page: "docs.html".to_string(),
            records: 1200,
            sections: 1000,
            links: 200,
            duplicates: 0,
        });
        assert_eq!(
            line,
            "index docs.html  1,200 records (1,000 sections, 200 links)\n"
        );

        let line = human_line(&IndexProgressEvent::Indexed {
            page: "docs.html".to_string(),
            records: 3,
            sections: 2,
            links: 1,
            duplicates: 4,
        });
        assert!(line.contains("4 duplicate ids skipped"));
    }

    #[test]
    fn json_event_shape() {
        let v = json_event(&IndexProgressEvent::Reindexed {
            records: 7,
            changed: false,
        });
        assert_eq!(v["phase"], "reindexed");
        assert_eq!(v["records"], 7);
        assert_eq!(v["changed"], false);
    }

    #[test]
    fn parse_modes() {
        assert_eq!(ProgressMode::parse("json"), Ok(ProgressMode::Json));
        assert!(ProgressMode::parse("loud").is_err());
    }
}
