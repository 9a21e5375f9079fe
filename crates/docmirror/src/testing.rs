use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use docmirror_fetch::HttpClient;

#[derive(Debug)]
pub struct NotFound(pub String);

impl std::fmt::Display for NotFound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "404 Not Found: {}", self.0)
    }
}

impl std::error::Error for NotFound {}

/// In-memory site. Clones share the page table and request log.
#[derive(Clone, Default)]
pub struct MockClient {
    pages: Arc<Mutex<HashMap<String, String>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, url: &str, body: &str) -> Self {
        self.pages
            .lock()
            .unwrap()
            .insert(url.to_string(), body.to_string());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpClient for MockClient {
    type Error = NotFound;

    async fn get(&self, url: &str) -> Result<Bytes, Self::Error> {
        self.requests.lock().unwrap().push(url.to_string());
        let body = self.pages.lock().unwrap().get(url).cloned();
        body.map(Bytes::from).ok_or_else(|| NotFound(url.to_string()))
    }
}
