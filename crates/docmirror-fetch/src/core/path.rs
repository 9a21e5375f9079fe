use std::path::{Path, PathBuf};

use docmirror_manifest::ManifestEntry;
use url::Url;

/// Maps manifest `(url, section)` pairs onto paths under the output root.
///
/// Mapping is pure and total: the same input always yields the same path and a URL
/// that fails to parse degrades to the section's index file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMapper {
    root: PathBuf,
    default_section: String,
    locale_prefixes: Vec<String>,
    extension: String,
}

impl PathMapper {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            default_section: "docs".to_string(),
            locale_prefixes: vec!["en".to_string()],
            extension: ".md".to_string(),
        }
    }

    /// Section whose entries are placed directly under the root.
    pub fn default_section(mut self, section: impl Into<String>) -> Self {
        self.default_section = section.into();
        self
    }

    /// Leading path segments to strip, at most one per URL.
    pub fn locale_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.locale_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn map_entry(&self, entry: &ManifestEntry) -> PathBuf {
        self.map(&entry.url, &entry.section)
    }

    pub fn map(&self, url: &str, section: &str) -> PathBuf {
        let mut segments = url_segments(url);

        if let Some(first) = segments.first()
            && self.locale_prefixes.iter().any(|p| p == first)
        {
            segments.remove(0);
        }

        let mut path = self.root.clone();
        if !section.is_empty() && section != self.default_section {
            path.push(sanitize_component(section));
        }

        match segments.split_last() {
            Some((file, dirs)) => {
                for dir in dirs {
                    path.push(dir);
                }
                if file.ends_with(&self.extension) {
                    path.push(file);
                } else {
                    path.push(format!("{}{}", file, self.extension));
                }
            }
            None => path.push(format!("index{}", self.extension)),
        }

        path
    }
}

fn url_segments(url: &str) -> Vec<String> {
    let Ok(parsed) = Url::parse(url) else {
        return Vec::new();
    };
    let Some(segments) = parsed.path_segments() else {
        return Vec::new();
    };

    segments
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .map(|s| s.replace('\\', "_"))
        .collect()
}

fn sanitize_component(section: &str) -> String {
    let cleaned = section.replace(['/', '\\'], "-");
    match cleaned.as_str() {
        "." | ".." => cleaned.replace('.', "_"),
        _ => cleaned,
    }
}
