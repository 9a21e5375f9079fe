use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Could not fetch manifest from {url}: {reason}")]
    ManifestUnavailable { url: String, reason: String },

    #[error("{0}")]
    Precondition(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Backup failed: {0}")]
    Backup(#[from] docmirror_archive::Error),

    #[error(transparent)]
    Batch(#[from] docmirror_fetch::Error),

    #[error(transparent)]
    Fs(#[from] docmirror_fs::Error),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for AppError {
    fn from(error: figment::Error) -> Self {
        AppError::Config(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
