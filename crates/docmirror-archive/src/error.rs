use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("backup source is not a directory: '{0}'")]
    SourceNotDirectory(PathBuf),

    #[error("compression codec {0:?} is not enabled in this build")]
    UnsupportedCompression(crate::TarCompress),

    #[error("failed to write archive '{path}': {source}")]
    ArchiveFailed { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Fs(#[from] docmirror_fs::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
