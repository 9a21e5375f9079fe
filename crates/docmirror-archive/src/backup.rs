use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::info;

use crate::{Error, Result, TarCompress};

#[derive(Clone, Debug)]
pub struct BackupOptions {
    /// Directory the archive is written into.
    pub dest_dir: PathBuf,
    pub compress: TarCompress,
}

impl Default for BackupOptions {
    fn default() -> Self {
        Self {
            dest_dir: PathBuf::from("."),
            compress: TarCompress::default(),
        }
    }
}

impl BackupOptions {
    pub fn new(dest_dir: impl Into<PathBuf>) -> Self {
        Self {
            dest_dir: dest_dir.into(),
            ..Self::default()
        }
    }

    pub fn compress(mut self, compress: TarCompress) -> Self {
        self.compress = compress;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackupReport {
    pub path: PathBuf,
    pub bytes: u64,
}

/// `<root>_backup_<YYYYmmdd_HHMMSS>.<ext>`
pub fn backup_name(root_name: &str, timestamp: DateTime<Local>, compress: TarCompress) -> String {
    format!(
        "{}_backup_{}.{}",
        root_name,
        timestamp.format("%Y%m%d_%H%M%S"),
        compress.extension()
    )
}

/// Archive `source` under its own directory name, stamped with the current local time.
///
/// Returns `Ok(None)` when `source` does not exist.
pub fn create_backup(source: &Path, options: &BackupOptions) -> Result<Option<BackupReport>> {
    create_backup_at(source, options, Local::now())
}

pub fn create_backup_at(
    source: &Path,
    options: &BackupOptions,
    timestamp: DateTime<Local>,
) -> Result<Option<BackupReport>> {
    if !source.exists() {
        return Ok(None);
    }
    if !source.is_dir() {
        return Err(Error::SourceNotDirectory(source.to_path_buf()));
    }

    let root_name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "tree".to_string());

    docmirror_fs::ensure_dir(&options.dest_dir)?;
    let path = options
        .dest_dir
        .join(backup_name(&root_name, timestamp, options.compress));

    info!("Creating backup: {}", path.display());

    if let Err(e) = write_archive(source, &root_name, &path, options.compress) {
        let _ = std::fs::remove_file(&path);
        return Err(e);
    }

    let bytes = std::fs::metadata(&path)
        .map(|m| m.len())
        .map_err(|e| Error::ArchiveFailed {
            path: path.clone(),
            source: e,
        })?;

    info!("Backup created: {} ({} bytes)", path.display(), bytes);
    Ok(Some(BackupReport { path, bytes }))
}

fn write_archive(source: &Path, root_name: &str, path: &Path, compress: TarCompress) -> Result<()> {
    let archive_err = |e: std::io::Error| Error::ArchiveFailed {
        path: path.to_path_buf(),
        source: e,
    };

    let file = File::create(path).map_err(archive_err)?;
    let encoder = compress.encoder(BufWriter::new(file))?;

    let mut builder = tar::Builder::new(encoder);
    builder.follow_symlinks(false);
    builder.append_dir_all(root_name, source).map_err(archive_err)?;

    let encoder = builder.into_inner().map_err(archive_err)?;
    let writer = encoder.finish().map_err(archive_err)?;
    writer
        .into_inner()
        .map_err(|e| archive_err(e.into_error()))?
        .sync_all()
        .map_err(archive_err)
}
