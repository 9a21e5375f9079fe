use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::ManifestEntry;

static LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("link pattern is a valid regex")
});

/// Parsed manifest together with the raw text it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub raw: String,
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn from_text(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let entries = parse(&raw);
        Self { raw, entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `"Build with Claude"` -> `"build-with-claude"`
pub fn section_slug(heading: &str) -> String {
    heading.trim().to_lowercase().replace(' ', "-")
}

pub fn parse(text: &str) -> Vec<ManifestEntry> {
    let mut entries = Vec::new();
    let mut section = String::new();

    for line in text.lines() {
        let line = line.trim();
        if let Some(heading) = line.strip_prefix("##") {
            section = section_slug(heading);
        } else if line.starts_with("- [") && line.contains("](http") {
            if let Some(caps) = LINK.captures(line) {
                entries.push(ManifestEntry::new(&caps[1], &caps[2], section.as_str()));
            }
        }
    }

    debug!(count = entries.len(), "parsed manifest");
    entries
}
