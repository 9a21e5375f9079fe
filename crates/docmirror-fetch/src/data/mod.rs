//! Immutable data types for fetching.
//!
//! Options are built once per run and shared by every fetch task; outcomes are
//! produced once per manifest entry and folded into a [`BatchSummary`].

pub mod options;
pub mod outcome;

pub use options::{BatchOptions, FetchOptions};
pub use outcome::{BatchMode, BatchSummary, FailedFetch, FetchOutcome};
