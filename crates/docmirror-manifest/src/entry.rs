/// One document listed in the manifest.
///
/// `url` is the natural key. Entries sharing a URL are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ManifestEntry {
    pub title: String,
    pub url: String,
    /// Slug of the enclosing `##` heading, empty before the first heading.
    pub section: String,
}

impl ManifestEntry {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        section: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            section: section.into(),
        }
    }
}
