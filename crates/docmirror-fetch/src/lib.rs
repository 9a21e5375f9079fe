//! The concurrent fetch engine behind docmirror.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Options, outcomes and batch summaries
//! - [`core`] - Pure decisions: path mapping, freshness, rebuild policy, backoff
//! - [`effects`] - Network and filesystem I/O behind the [`HttpClient`] trait
//!
//! The [`RateLimiter`] is the only state shared between concurrent fetches. It is
//! passed in explicitly, never held globally.

pub mod core;
pub mod data;
pub mod effects;
mod error;
pub mod rate;

pub use core::{PathMapper, RebuildPolicy, backoff_delay, is_fresh};
pub use data::{BatchMode, BatchOptions, BatchSummary, FailedFetch, FetchOptions, FetchOutcome};
pub use effects::{BatchFetcher, BatchJob, Fetcher, HttpClient};
pub use error::{Error, Result};
pub use rate::RateLimiter;

#[cfg(feature = "reqwest")]
pub use effects::ReqwestClient;
