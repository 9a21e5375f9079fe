pub mod atomic_write;
pub mod metadata;
pub mod tree;

pub use atomic_write::{WriteStatus, atomic_write, write_if_changed};
pub use metadata::{file_age, modified};
pub use tree::{ensure_dir, remove_tree};
