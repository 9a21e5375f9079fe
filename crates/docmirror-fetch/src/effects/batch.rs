//! Batch fetching.
//!
//! One task per manifest entry, all awaited together. Throughput is governed by the
//! shared rate limiter; an optional semaphore caps how many tasks run at once.

use std::collections::HashMap;
use std::future::pending;
use std::path::PathBuf;
use std::sync::Arc;

use docmirror_manifest::ManifestEntry;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::core::PathMapper;
use crate::data::{BatchMode, BatchOptions, BatchSummary};
use crate::effects::{Fetcher, HttpClient};
use crate::error::{Error, Result};

/// A planned fetch for one manifest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJob {
    pub url: String,
    pub destination: PathBuf,
    /// Bypass the freshness cache.
    pub force: bool,
}

pub struct BatchFetcher<C: HttpClient> {
    fetcher: Arc<Fetcher<C>>,
    mapper: PathMapper,
    options: BatchOptions,
}

impl<C: HttpClient + 'static> BatchFetcher<C> {
    pub fn new(fetcher: Fetcher<C>, mapper: PathMapper) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            mapper,
            options: BatchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: BatchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn mapper(&self) -> &PathMapper {
        &self.mapper
    }

    /// Map every entry to a destination and decide whether it must bypass the cache.
    ///
    /// Full mode forces everything. Incremental mode respects the cache for files that
    /// already exist and forces the rest. Entries mapping to the same path are logged;
    /// the last writer wins.
    pub fn plan(&self, entries: &[ManifestEntry], mode: BatchMode) -> Vec<BatchJob> {
        let mut seen: HashMap<PathBuf, &str> = HashMap::with_capacity(entries.len());

        entries
            .iter()
            .map(|entry| {
                let destination = self.mapper.map_entry(entry);

                if let Some(previous) = seen.insert(destination.clone(), &entry.url) {
                    warn!(
                        "Path collision: {} and {} both map to {}",
                        previous,
                        entry.url,
                        destination.display()
                    );
                }

                let force = match mode {
                    BatchMode::Full => true,
                    BatchMode::Incremental => {
                        let exists = destination.exists();
                        if !exists {
                            info!("Missing file will be downloaded: {}", destination.display());
                        }
                        !exists
                    }
                };

                BatchJob {
                    url: entry.url.clone(),
                    destination,
                    force,
                }
            })
            .collect()
    }

    /// Fetch every entry and aggregate the outcomes.
    ///
    /// Fails only with [`Error::Cancelled`] when the configured deadline elapses.
    pub async fn run(&self, entries: &[ManifestEntry], mode: BatchMode) -> Result<BatchSummary> {
        self.run_until_cancelled(entries, mode, &CancellationToken::new())
            .await
    }

    /// Like [`BatchFetcher::run`], aborting every outstanding task once `cancel` fires.
    pub async fn run_until_cancelled(
        &self,
        entries: &[ManifestEntry],
        mode: BatchMode,
        cancel: &CancellationToken,
    ) -> Result<BatchSummary> {
        let jobs = self.plan(entries, mode);
        info!(
            "Processing {} files ({} mode, {} req/s)...",
            jobs.len(),
            mode,
            self.fetcher.limiter().permits()
        );
        self.execute(jobs, cancel).await
    }

    async fn execute(&self, jobs: Vec<BatchJob>, cancel: &CancellationToken) -> Result<BatchSummary> {
        let semaphore = self
            .options
            .max_concurrent
            .map(|limit| Arc::new(Semaphore::new(limit.max(1))));

        let total = jobs.len();
        let mut tasks = JoinSet::new();
        let mut in_flight = HashMap::with_capacity(total);

        for job in jobs {
            let fetcher = Arc::clone(&self.fetcher);
            let semaphore = semaphore.clone();
            let BatchJob {
                url,
                destination,
                force,
            } = job.clone();

            let handle = tasks.spawn(async move {
                let _permit = match semaphore {
                    Some(s) => s.acquire_owned().await.ok(),
                    None => None,
                };
                fetcher.fetch(&url, &destination, force).await
            });
            in_flight.insert(handle.id(), job);
        }

        let deadline = async {
            match self.options.deadline {
                Some(limit) => tokio::time::sleep(limit).await,
                None => pending::<()>().await,
            }
        };
        tokio::pin!(deadline);

        let mut summary = BatchSummary::default();

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    warn!("Batch cancelled");
                    return Err(Self::abort(tasks, &summary, total).await);
                }
                _ = &mut deadline => {
                    warn!("Batch deadline elapsed");
                    return Err(Self::abort(tasks, &summary, total).await);
                }
                joined = tasks.join_next_with_id() => match joined {
                    None => break,
                    Some(Ok((id, outcome))) => {
                        if let Some(job) = in_flight.remove(&id) {
                            summary.record(&job.url, job.destination, outcome);
                        }
                    }
                    Some(Err(err)) => {
                        if let Some(job) = in_flight.remove(&err.id()) {
                            warn!("Fetch task for {} died: {}", job.url, err);
                            summary.record_failure(&job.url, job.destination, err.to_string());
                        }
                    }
                },
            }
        }

        debug_assert_eq!(summary.total(), total);
        Ok(summary)
    }

    async fn abort(mut tasks: JoinSet<crate::FetchOutcome>, summary: &BatchSummary, total: usize) -> Error {
        tasks.shutdown().await;
        let completed = summary.total();
        Error::Cancelled {
            completed,
            outstanding: total - completed,
        }
    }
}
