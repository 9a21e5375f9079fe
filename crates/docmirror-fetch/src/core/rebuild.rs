use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::core::is_fresh;

/// Decides whether an existing output tree is stale enough to back up and rebuild.
///
/// Evaluate [`RebuildPolicy::should_rebuild`] before the manifest is fetched again:
/// refreshing the sentinel first would make every tree look current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebuildPolicy {
    output_root: PathBuf,
    sentinel: PathBuf,
    window: Duration,
}

impl RebuildPolicy {
    pub fn new(output_root: impl Into<PathBuf>, sentinel: impl Into<PathBuf>, window: Duration) -> Self {
        Self {
            output_root: output_root.into(),
            sentinel: sentinel.into(),
            window,
        }
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn sentinel(&self) -> &Path {
        &self.sentinel
    }

    /// The tree exists and the sentinel is not fresh within the window.
    pub fn should_rebuild(&self, now: SystemTime) -> bool {
        self.output_root.exists() && !is_fresh(&self.sentinel, now, self.window)
    }
}
