use crate::{Error, Result};
use std::path::Path;
use std::time::{Duration, SystemTime};

/// Modification time of `path`, or `None` when nothing exists there.
pub fn modified(path: impl AsRef<Path>) -> Result<Option<SystemTime>> {
    let path = path.as_ref();
    let metadata = match std::fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(Error::Metadata {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    metadata.modified().map(Some).map_err(|e| Error::Metadata {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Age of `path` relative to `now`. A modification time later than `now` counts as zero.
pub fn file_age(path: impl AsRef<Path>, now: SystemTime) -> Result<Option<Duration>> {
    Ok(modified(path)?.map(|mtime| now.duration_since(mtime).unwrap_or(Duration::ZERO)))
}
