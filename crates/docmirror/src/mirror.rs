use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use docmirror_archive::{BackupOptions, create_backup};
use docmirror_fetch::{BatchFetcher, BatchMode, BatchSummary, Fetcher, HttpClient, RateLimiter};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::manifest::fetch_manifest;

/// The two build workflows over one configuration and HTTP client.
pub struct Mirror<C> {
    config: Config,
    client: C,
}

impl<C: HttpClient + Clone + 'static> Mirror<C> {
    pub fn new(config: Config, client: C) -> Self {
        Self { config, client }
    }

    /// Initial build.
    ///
    /// A stale existing tree is archived and removed first; then every manifest entry
    /// is downloaded regardless of the cache.
    pub async fn init(&self, cancel: &CancellationToken) -> Result<BatchSummary> {
        info!("Starting initial build...");
        let root = self.config.output_dir.clone();

        // Must run before the manifest fetch touches the sentinel.
        let rebuild = self.config.rebuild_policy().should_rebuild(SystemTime::now());

        let manifest = fetch_manifest(
            &self.client,
            &self.config.manifest_url,
            &self.config.sentinel,
        )
        .await?;

        if rebuild {
            info!("Files need updating - performing full rebuild with backup");
            self.backup_and_wipe(root.clone()).await?;
        }

        docmirror_fs::ensure_dir(&root)?;

        let summary = self
            .batch()?
            .run_until_cancelled(&manifest.entries, BatchMode::Full, cancel)
            .await?;
        report("Initial build complete", &summary);
        Ok(summary)
    }

    /// Refresh an existing tree: stale files are re-downloaded, missing ones fetched.
    pub async fn update(&self, cancel: &CancellationToken) -> Result<BatchSummary> {
        info!("Starting update build...");
        let root = &self.config.output_dir;

        if !root.is_dir() {
            return Err(AppError::Precondition(format!(
                "No existing {} directory found. Run with --init first.",
                root.display()
            )));
        }

        let manifest = fetch_manifest(
            &self.client,
            &self.config.manifest_url,
            &self.config.sentinel,
        )
        .await?;

        let summary = self
            .batch()?
            .run_until_cancelled(&manifest.entries, BatchMode::Incremental, cancel)
            .await?;
        report("Update complete", &summary);
        Ok(summary)
    }

    fn batch(&self) -> Result<BatchFetcher<C>> {
        let limiter = Arc::new(RateLimiter::per_second(self.config.requests_per_second)?);
        let fetcher =
            Fetcher::new(self.client.clone(), limiter).with_options(self.config.fetch_options());
        Ok(BatchFetcher::new(fetcher, self.config.path_mapper())
            .with_options(self.config.batch_options()))
    }

    async fn backup_and_wipe(&self, root: PathBuf) -> Result<()> {
        let backup = self
            .config
            .backup
            .then(|| BackupOptions::new(&self.config.backup_dir));

        tokio::task::spawn_blocking(move || -> Result<()> {
            match backup {
                Some(options) => {
                    create_backup(&root, &options)?;
                }
                None => info!("Backups disabled, skipping archive of {}", root.display()),
            }
            if docmirror_fs::remove_tree(&root)? {
                info!("Removed existing {}", root.display());
            }
            Ok(())
        })
        .await?
    }
}

fn report(phase: &str, summary: &BatchSummary) {
    info!("{}: {}", phase, summary);
    for failure in &summary.failures {
        warn!(
            "Failed: {} -> {}: {}",
            failure.url,
            failure.destination.display(),
            failure.reason
        );
    }
}
