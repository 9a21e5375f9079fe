//! Backup archives for the mirrored tree.
//!
//! - `format.rs` - Compression codecs and archive naming
//! - `backup.rs` - Tree archival

pub use backup::{BackupOptions, BackupReport, backup_name, create_backup, create_backup_at};
pub use error::{Error, Result};
pub use format::{Encoder, TarCompress};

mod backup;
mod error;
mod format;
