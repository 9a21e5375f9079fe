//! End-to-end batch runs against an in-memory HTTP client.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use bytes::Bytes;
use docmirror_fetch::{
    BatchFetcher, BatchMode, BatchOptions, Error, FetchOptions, Fetcher, HttpClient, PathMapper,
    RateLimiter,
};
use docmirror_manifest::ManifestEntry;
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
struct MockError(String);

impl std::fmt::Display for MockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for MockError {}

/// Serves fixed bodies by URL; anything unknown is a 404.
#[derive(Default)]
struct MockServer {
    pages: HashMap<String, &'static str>,
    latency: Option<Duration>,
    panic_on: Option<String>,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl MockServer {
    fn with_pages(pages: &[(&str, &'static str)]) -> Self {
        Self {
            pages: pages.iter().map(|(u, b)| (u.to_string(), *b)).collect(),
            ..Self::default()
        }
    }

    fn latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

/// Shared handle so tests can inspect the server after the batch consumed the client.
struct MockClient(Arc<MockServer>);

impl HttpClient for MockClient {
    type Error = MockError;

    async fn get(&self, url: &str) -> Result<Bytes, Self::Error> {
        let server = &self.0;
        server.calls.lock().unwrap().push(url.to_string());
        if server.panic_on.as_deref() == Some(url) {
            panic!("mock server crashed on {url}");
        }

        let now = server.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        server.peak.fetch_max(now, Ordering::SeqCst);
        if let Some(latency) = server.latency {
            tokio::time::sleep(latency).await;
        }
        server.in_flight.fetch_sub(1, Ordering::SeqCst);

        match server.pages.get(url) {
            Some(body) => Ok(Bytes::from_static(body.as_bytes())),
            None => Err(MockError(format!("404 Not Found: {url}"))),
        }
    }
}

fn entries() -> Vec<ManifestEntry> {
    vec![
        ManifestEntry::new("Setup", "https://docs.example.com/en/guides/setup", "docs"),
        ManifestEntry::new("Install", "https://docs.example.com/en/guides/install", "docs"),
        ManifestEntry::new("Messages", "https://docs.example.com/en/api/messages", "api-reference"),
    ]
}

fn server() -> MockServer {
    MockServer::with_pages(&[
        ("https://docs.example.com/en/guides/setup.md", "# Setup\n"),
        ("https://docs.example.com/en/guides/install.md", "# Install\n"),
        ("https://docs.example.com/en/api/messages.md", "# Messages\n"),
    ])
}

fn batch(root: &Path, server: Arc<MockServer>) -> BatchFetcher<MockClient> {
    paced_batch(root, server, 100, Duration::from_millis(10))
}

fn paced_batch(
    root: &Path,
    server: Arc<MockServer>,
    requests_per_second: u32,
    backoff: Duration,
) -> BatchFetcher<MockClient> {
    let limiter = Arc::new(RateLimiter::per_second(requests_per_second).unwrap());
    let fetcher = Fetcher::new(MockClient(server), limiter).with_options(
        FetchOptions::default()
            .max_retries(1)
            .retry_backoff(backoff),
    );
    BatchFetcher::new(fetcher, PathMapper::new(root))
}

fn age(path: &Path, by: Duration) {
    let file = std::fs::File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::now() - by).unwrap();
}

#[tokio::test(start_paused = true)]
async fn full_run_downloads_every_entry() {
    let dir = tempfile::tempdir().unwrap();
    let server = Arc::new(server());

    let summary = batch(dir.path(), server.clone())
        .run(&entries(), BatchMode::Full)
        .await
        .unwrap();

    assert_eq!(summary.fetched, 3);
    assert_eq!(summary.total(), 3);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("guides").join("setup.md")).unwrap(),
        "# Setup\n"
    );
    assert_eq!(
        std::fs::read_to_string(dir.path().join("api-reference").join("api").join("messages.md"))
            .unwrap(),
        "# Messages\n"
    );
    assert_eq!(server.calls().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn full_run_ignores_fresh_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("guides")).unwrap();
    std::fs::write(dir.path().join("guides").join("setup.md"), "stale").unwrap();
    let server = Arc::new(server());

    let summary = batch(dir.path(), server.clone())
        .run(&entries(), BatchMode::Full)
        .await
        .unwrap();

    assert_eq!(summary.fetched, 3);
    assert_eq!(summary.cached, 0);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("guides").join("setup.md")).unwrap(),
        "# Setup\n"
    );
}

#[tokio::test(start_paused = true)]
async fn incremental_run_serves_recent_files_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let setup = dir.path().join("guides").join("setup.md");
    std::fs::create_dir_all(setup.parent().unwrap()).unwrap();
    std::fs::write(&setup, "local copy").unwrap();
    age(&setup, Duration::from_secs(30 * 60));
    let server = Arc::new(server());

    let summary = batch(dir.path(), server.clone())
        .run(&entries(), BatchMode::Incremental)
        .await
        .unwrap();

    assert_eq!(summary.cached, 1);
    assert_eq!(summary.fetched, 2);
    assert_eq!(std::fs::read_to_string(&setup).unwrap(), "local copy");
    assert!(
        !server
            .calls()
            .iter()
            .any(|u| u.ends_with("/guides/setup.md"))
    );
}

#[tokio::test(start_paused = true)]
async fn incremental_run_refreshes_expired_files() {
    let dir = tempfile::tempdir().unwrap();
    let setup = dir.path().join("guides").join("setup.md");
    std::fs::create_dir_all(setup.parent().unwrap()).unwrap();
    std::fs::write(&setup, "old").unwrap();
    age(&setup, Duration::from_secs(2 * 3600));
    let server = Arc::new(server());

    let summary = batch(dir.path(), server.clone())
        .run(&entries(), BatchMode::Incremental)
        .await
        .unwrap();

    assert_eq!(summary.fetched, 3);
    assert_eq!(std::fs::read_to_string(&setup).unwrap(), "# Setup\n");
}

#[tokio::test(start_paused = true)]
async fn failures_do_not_abort_siblings() {
    let dir = tempfile::tempdir().unwrap();
    let server = Arc::new(MockServer::with_pages(&[(
        "https://docs.example.com/en/guides/setup.md",
        "# Setup\n",
    )]));

    let summary = batch(dir.path(), server.clone())
        .run(&entries(), BatchMode::Full)
        .await
        .unwrap();

    assert_eq!(summary.fetched, 1);
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.total(), 3);
    assert_eq!(summary.failures.len(), 2);
    assert!(summary.failures.iter().all(|f| f.reason.contains("404")));
    assert!(!dir.path().join("guides").join("install.md").exists());
    // Initial attempt plus one retry for each failure.
    assert_eq!(server.calls().len(), 1 + 2 * 2);
    assert_eq!(summary.to_string(), "1 downloaded, 0 cached, 2 failures");
}

#[tokio::test(start_paused = true)]
async fn panicking_task_counts_as_failure() {
    let dir = tempfile::tempdir().unwrap();
    let mut server = server();
    server.panic_on = Some("https://docs.example.com/en/guides/install.md".to_string());
    let server = Arc::new(server);

    let summary = batch(dir.path(), server)
        .run(&entries(), BatchMode::Full)
        .await
        .unwrap();

    assert_eq!(summary.fetched, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(
        summary.failures[0].url,
        "https://docs.example.com/en/guides/install"
    );
}

#[tokio::test(start_paused = true)]
async fn concurrency_ceiling_is_respected() {
    let dir = tempfile::tempdir().unwrap();
    let server = Arc::new(server().latency(Duration::from_millis(200)));

    let summary = batch(dir.path(), server.clone())
        .with_options(BatchOptions::default().max_concurrent(Some(1)))
        .run(&entries(), BatchMode::Full)
        .await
        .unwrap();

    assert_eq!(summary.fetched, 3);
    assert_eq!(server.peak.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn unbounded_fan_out_overlaps_requests() {
    let dir = tempfile::tempdir().unwrap();
    let server = Arc::new(server().latency(Duration::from_millis(200)));

    let summary = batch(dir.path(), server.clone())
        .run(&entries(), BatchMode::Full)
        .await
        .unwrap();

    assert_eq!(summary.fetched, 3);
    assert_eq!(server.peak.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn cancelled_batch_reports_outstanding_work() {
    let dir = tempfile::tempdir().unwrap();
    let server = Arc::new(server().latency(Duration::from_secs(60)));
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        trigger.cancel();
    });

    let err = batch(dir.path(), server)
        .run_until_cancelled(&entries(), BatchMode::Full, &cancel)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Cancelled {
            completed: 0,
            outstanding: 3
        }
    ));
    assert!(!dir.path().join("guides").exists());
}

#[tokio::test(start_paused = true)]
async fn deadline_aborts_slow_batch() {
    let dir = tempfile::tempdir().unwrap();
    let server = Arc::new(server().latency(Duration::from_secs(60)));

    let err = batch(dir.path(), server)
        .with_options(BatchOptions::default().deadline(Some(Duration::from_secs(5))))
        .run(&entries(), BatchMode::Full)
        .await
        .unwrap_err();

    match err {
        Error::Cancelled {
            completed,
            outstanding,
        } => {
            assert_eq!(completed, 0);
            assert_eq!(outstanding, 3);
        }
        other => panic!("expected cancellation, got {other}"),
    }
}

#[tokio::test(start_paused = true)]
async fn shared_limiter_paces_retries_across_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    let server = Arc::new(MockServer::default());

    let start = tokio::time::Instant::now();
    let summary = paced_batch(dir.path(), server.clone(), 2, Duration::ZERO)
        .run(&entries(), BatchMode::Full)
        .await
        .unwrap();

    assert_eq!(summary.failed, 3);
    assert_eq!(summary.to_string(), "0 downloaded, 0 cached, 3 failures");
    // 3 entries x (1 attempt + 1 retry), every attempt behind a permit
    assert_eq!(server.calls().len(), 6);
    // 6 permits at 2 per second need at least 2 seconds
    assert!(start.elapsed() >= Duration::from_secs(2));
}
