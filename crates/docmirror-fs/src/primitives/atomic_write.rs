use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// What [`write_if_changed`] did to the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteStatus {
    Created,
    Updated,
    Unchanged,
}

fn staging_path(path: &Path, parent: &Path) -> PathBuf {
    let file_name = path.file_name().unwrap_or_default().to_string_lossy();
    parent.join(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4()))
}

/// Write `content` to `path` through a sibling temp file and a rename.
///
/// The parent directory must already exist. On failure the temp file is removed and
/// `path` keeps whatever it held before.
pub fn atomic_write(path: impl AsRef<Path>, content: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let tmp_path = staging_path(path, parent);

    fs::write(&tmp_path, content).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        Error::Write {
            path: tmp_path.clone(),
            source: e,
        }
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        Error::Write {
            path: path.to_path_buf(),
            source: e,
        }
    })?;

    Ok(())
}

/// Replace `path` with `content` only when the bytes differ, leaving the mtime of an
/// unchanged file alone.
pub fn write_if_changed(path: impl AsRef<Path>, content: &[u8]) -> Result<WriteStatus> {
    let path = path.as_ref();
    let status = match fs::read(path) {
        Ok(existing) if existing == content => return Ok(WriteStatus::Unchanged),
        Ok(_) => WriteStatus::Updated,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => WriteStatus::Created,
        Err(e) => {
            return Err(Error::Read {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    atomic_write(path, content)?;
    Ok(status)
}
