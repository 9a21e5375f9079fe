use std::path::Path;
use std::time::{Duration, SystemTime};

use tracing::debug;

/// Whether `path` was modified less than `window` before `now`.
///
/// Missing files are never fresh. A metadata error is treated like a missing file so
/// the caller fetches again instead of trusting an unreadable cache.
pub fn is_fresh(path: &Path, now: SystemTime, window: Duration) -> bool {
    match docmirror_fs::file_age(path, now) {
        Ok(Some(age)) => age < window,
        Ok(None) => false,
        Err(err) => {
            debug!(path = %path.display(), %err, "treating unreadable file as stale");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    const HOUR: Duration = Duration::from_secs(3600);

    fn touch(path: &Path, mtime: SystemTime) {
        let file = File::create(path).unwrap();
        file.set_modified(mtime).unwrap();
    }

    #[test]
    fn missing_file_is_stale() {
        let dir = tempdir().unwrap();
        assert!(!is_fresh(&dir.path().join("absent.md"), SystemTime::now(), HOUR));
    }

    #[test]
    fn recent_file_is_fresh() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("page.md");
        let now = SystemTime::now();
        touch(&path, now - Duration::from_secs(30 * 60));

        assert!(is_fresh(&path, now, HOUR));
    }

    #[test]
    fn window_boundary_is_exclusive() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("page.md");
        let mtime = SystemTime::now() - Duration::from_secs(10 * 3600);
        touch(&path, mtime);

        assert!(is_fresh(&path, mtime + HOUR - Duration::from_secs(1), HOUR));
        assert!(!is_fresh(&path, mtime + HOUR, HOUR));
    }

    #[test]
    fn freshness_is_monotonic_in_time() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("page.md");
        let mtime = SystemTime::now() - Duration::from_secs(48 * 3600);
        touch(&path, mtime);

        let probes: Vec<SystemTime> = (0..10)
            .map(|i| mtime + Duration::from_secs(i * 900))
            .collect();
        let fresh: Vec<bool> = probes.iter().map(|t| is_fresh(&path, *t, HOUR)).collect();

        // once stale, stays stale
        if let Some(first_stale) = fresh.iter().position(|f| !f) {
            assert!(fresh[first_stale..].iter().all(|f| !f));
        }
        assert!(fresh[0]);
        assert!(!fresh[9]);
    }

    #[test]
    fn zero_window_is_never_fresh() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("page.md");
        std::fs::write(&path, "x").unwrap();
        assert!(!is_fresh(&path, SystemTime::now(), Duration::ZERO));
    }
}
