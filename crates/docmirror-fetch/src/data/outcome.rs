use std::fmt;
use std::path::PathBuf;

use crate::Error;

/// How a batch treats files that are already on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchMode {
    /// Fetch everything, ignoring the cache. Used when rebuilding from scratch.
    Full,
    /// Respect the cache for files that exist; always fetch missing ones.
    Incremental,
}

impl fmt::Display for BatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchMode::Full => write!(f, "full"),
            BatchMode::Incremental => write!(f, "incremental"),
        }
    }
}

/// Result of fetching one manifest entry.
#[derive(Debug)]
pub enum FetchOutcome {
    Fetched,
    Cached,
    Failed(Error),
}

impl FetchOutcome {
    pub fn is_fetched(&self) -> bool {
        matches!(self, Self::Fetched)
    }

    pub fn is_cached(&self) -> bool {
        matches!(self, Self::Cached)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedFetch {
    pub url: String,
    pub destination: PathBuf,
    pub reason: String,
}

/// Aggregate counts for a batch run.
///
/// `fetched + cached + failed` always equals the number of entries submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub fetched: usize,
    pub cached: usize,
    pub failed: usize,
    pub failures: Vec<FailedFetch>,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.fetched + self.cached + self.failed
    }

    pub fn record(&mut self, url: &str, destination: PathBuf, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Fetched => self.fetched += 1,
            FetchOutcome::Cached => self.cached += 1,
            FetchOutcome::Failed(err) => self.record_failure(url, destination, err.to_string()),
        }
    }

    pub fn record_failure(&mut self, url: &str, destination: PathBuf, reason: String) {
        self.failed += 1;
        self.failures.push(FailedFetch {
            url: url.to_string(),
            destination,
            reason,
        });
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} downloaded, {} cached, {} failures",
            self.fetched, self.cached, self.failed
        )
    }
}
