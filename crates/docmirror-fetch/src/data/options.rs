use std::time::Duration;

/// Configuration for a single fetch.
///
/// # Examples
///
/// ```
/// use docmirror_fetch::FetchOptions;
/// use std::time::Duration;
///
/// let options = FetchOptions::default()
///     .max_retries(5)
///     .retry_backoff(Duration::from_millis(200))
///     .cache_window(Duration::from_secs(1800));
/// assert_eq!(options.max_retries, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    /// Maximum number of retries after the initial attempt.
    ///
    /// - Retries are triggered for network errors and non-success statuses
    /// - Filesystem errors are never retried
    /// - Total attempts = 1 (initial) + max_retries
    ///
    /// Default: 3
    pub max_retries: u32,

    /// Base delay for exponential backoff between retries.
    ///
    /// The delay after failed attempt N (0-indexed) is `retry_backoff * 2^N`.
    ///
    /// Default: 1s
    pub retry_backoff: Duration,

    /// Upper bound on a single backoff sleep. `None` leaves the growth uncapped.
    ///
    /// Default: None
    pub max_backoff: Option<Duration>,

    /// Content extension appended to request URLs and file names that lack it.
    ///
    /// Default: ".md"
    pub extension: String,

    /// Files modified less than this long ago are served from disk when a fetch is
    /// not forced.
    ///
    /// Default: 1 hour
    pub cache_window: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_backoff: Duration::from_secs(1),
            max_backoff: None,
            extension: ".md".to_string(),
            cache_window: Duration::from_secs(3600),
        }
    }
}

impl FetchOptions {
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn retry_backoff(mut self, base: Duration) -> Self {
        self.retry_backoff = base;
        self
    }

    pub fn max_backoff(mut self, cap: Option<Duration>) -> Self {
        self.max_backoff = cap;
        self
    }

    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn cache_window(mut self, window: Duration) -> Self {
        self.cache_window = window;
        self
    }
}

/// Configuration for a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOptions {
    /// Ceiling on simultaneously running fetch tasks.
    ///
    /// `None` spawns every entry at once and lets the rate limiter pace them.
    pub max_concurrent: Option<usize>,

    /// Whole-batch deadline. Outstanding tasks are aborted when it elapses.
    pub deadline: Option<Duration>,
}

impl BatchOptions {
    pub fn max_concurrent(mut self, limit: Option<usize>) -> Self {
        self.max_concurrent = limit;
        self
    }

    pub fn deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }
}
