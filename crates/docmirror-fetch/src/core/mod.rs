//! Pure decisions for the fetch engine.
//!
//! Nothing here performs network I/O. Freshness reads file metadata but never
//! writes.

mod freshness;
mod path;
mod rebuild;
mod retry;

pub use freshness::is_fresh;
pub use path::PathMapper;
pub use rebuild::RebuildPolicy;
pub use retry::backoff_delay;
