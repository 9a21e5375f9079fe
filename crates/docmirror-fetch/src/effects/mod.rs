//! I/O for fetching: the HTTP seam, single-document fetches and batch runs.

mod batch;
mod fetcher;
mod http;

pub use batch::{BatchFetcher, BatchJob};
pub use fetcher::Fetcher;
pub use http::HttpClient;

#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
