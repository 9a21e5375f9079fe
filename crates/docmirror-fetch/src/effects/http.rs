use std::future::Future;

use bytes::Bytes;

/// Asynchronous HTTP client abstraction.
///
/// Only whole-body GETs are needed: a document is written to disk after its body
/// has been received in full, never while streaming.
///
/// # Implementations
///
/// - [`ReqwestClient`]: Production implementation using `reqwest`
/// - Scripted clients in tests
pub trait HttpClient: Send + Sync {
    /// Error type for HTTP operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// GET `url` and return the full response body.
    ///
    /// # Errors
    ///
    /// Connection failures, timeouts and non-success statuses must all surface as
    /// errors; the fetcher treats every one of them as retryable.
    fn get(&self, url: &str) -> impl Future<Output = Result<Bytes, Self::Error>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use std::time::Duration;

    use super::*;

    /// Production HTTP client implementation using reqwest.
    #[derive(Debug, Clone)]
    pub struct ReqwestClient {
        client: reqwest::Client,
    }

    impl ReqwestClient {
        pub fn new(user_agent: &str, timeout: Duration) -> crate::Result<Self> {
            let client = reqwest::Client::builder()
                .user_agent(user_agent)
                .timeout(timeout)
                .build()
                .map_err(|e| crate::Error::Client(e.to_string()))?;
            Ok(Self { client })
        }
    }

    impl HttpClient for ReqwestClient {
        type Error = reqwest::Error;

        async fn get(&self, url: &str) -> Result<Bytes, Self::Error> {
            self.client
                .get(url)
                .send()
                .await?
                .error_for_status()?
                .bytes()
                .await
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestClient;
