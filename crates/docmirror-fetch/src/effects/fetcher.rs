use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use bytes::Bytes;
use tracing::{debug, error, info, warn};

use crate::core::{backoff_delay, is_fresh};
use crate::data::{FetchOptions, FetchOutcome};
use crate::effects::http::HttpClient;
use crate::error::{Error, Result};
use crate::rate::RateLimiter;

/// Fetches single documents, retrying transient failures with exponential backoff.
///
/// Each attempt takes a permit from the shared [`RateLimiter`]; cached hits take none.
pub struct Fetcher<C: HttpClient> {
    client: C,
    limiter: Arc<RateLimiter>,
    options: FetchOptions,
}

impl<C: HttpClient> Fetcher<C> {
    pub fn new(client: C, limiter: Arc<RateLimiter>) -> Self {
        Self {
            client,
            limiter,
            options: FetchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// The URL actually requested: `url` with the content extension appended if absent.
    pub fn download_url<'a>(&self, url: &'a str) -> Cow<'a, str> {
        if url.ends_with(&self.options.extension) {
            Cow::Borrowed(url)
        } else {
            Cow::Owned(format!("{}{}", url, self.options.extension))
        }
    }

    /// Fetch `url` into `destination`.
    ///
    /// Unless `force` is set, a destination modified within the cache window is left
    /// alone and reported as [`FetchOutcome::Cached`] without touching the network.
    pub async fn fetch(&self, url: &str, destination: &Path, force: bool) -> FetchOutcome {
        if !force && is_fresh(destination, SystemTime::now(), self.options.cache_window) {
            debug!("Skipping recent file: {}", destination.display());
            return FetchOutcome::Cached;
        }

        let download_url = self.download_url(url);
        let max_retries = self.options.max_retries;
        let mut attempt = 0;

        loop {
            self.limiter.acquire().await;

            let err = match self.attempt(&download_url, destination).await {
                Ok(()) => {
                    info!("Downloaded {} -> {}", download_url, destination.display());
                    return FetchOutcome::Fetched;
                }
                Err(err) => err,
            };

            if !err.is_retryable() {
                error!(
                    "Failed to write {} for {}: {}",
                    destination.display(),
                    download_url,
                    err
                );
                return FetchOutcome::Failed(err);
            }

            if attempt >= max_retries {
                error!(
                    "Failed to download {} after {} attempts: {}",
                    download_url,
                    attempt + 1,
                    err
                );
                return FetchOutcome::Failed(err);
            }

            let wait = backoff_delay(
                attempt,
                self.options.retry_backoff,
                self.options.max_backoff,
            );
            warn!(
                "Download failed (attempt {}/{}): {}: {}",
                attempt + 1,
                max_retries + 1,
                download_url,
                err
            );
            info!("Retrying in {:?}...", wait);
            tokio::time::sleep(wait).await;
            attempt += 1;
        }
    }

    /// One GET followed by a store of the complete body.
    async fn attempt(&self, download_url: &str, destination: &Path) -> Result<()> {
        let body = self
            .client
            .get(download_url)
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        self.store(destination, body).await
    }

    /// Create missing ancestors and atomically replace `destination` with `body`.
    async fn store(&self, destination: &Path, body: Bytes) -> Result<()> {
        let destination: PathBuf = destination.to_path_buf();

        if std::str::from_utf8(&body).is_err() {
            debug!(
                "Response for {} is not UTF-8, writing raw bytes",
                destination.display()
            );
        }

        tokio::task::spawn_blocking(move || -> Result<()> {
            if let Some(parent) = destination.parent()
                && !parent.as_os_str().is_empty()
            {
                docmirror_fs::ensure_dir(parent)?;
            }
            docmirror_fs::atomic_write(&destination, &body)?;
            Ok(())
        })
        .await
        .map_err(|e| Error::Task(e.to_string()))?
    }
}
