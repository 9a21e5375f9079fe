//! Filesystem primitives for the mirrored document tree.
//!
//! Every write lands through a temp file in the destination directory followed by a
//! rename, so a reader never observes a half-written document.

mod error;
pub mod primitives;

pub use error::{Error, Result};
pub use primitives::{
    WriteStatus, atomic_write, ensure_dir, file_age, modified, remove_tree, write_if_changed,
};
