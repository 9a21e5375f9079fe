//! Error types for docmirror-fetch.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Connection failure, timeout or non-success status. Retried.
    #[error("network error: {0}")]
    Network(String),

    /// Directory creation or file write failure. Not retried.
    #[error(transparent)]
    Filesystem(#[from] docmirror_fs::Error),

    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("background task failed: {0}")]
    Task(String),

    #[error("rate limit must admit at least one request per window")]
    InvalidRate,

    /// The batch was cancelled or hit its deadline before every entry finished.
    #[error("batch cancelled with {completed} entries completed and {outstanding} outstanding")]
    Cancelled { completed: usize, outstanding: usize },
}

impl Error {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
