// Scripted fetcher for strategy and resolution-loop tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::Fetcher;
use crate::error_handling::FetchError;

/// Serves canned responses keyed by exact URL and records every request.
#[derive(Default)]
pub(crate) struct FakeFetcher {
    locations: HashMap<String, String>,
    pages: HashMap<String, String>,
    json: HashMap<String, serde_json::Value>,
    requests: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl FakeFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_location(mut self, url: &str, location: &str) -> Self {
        self.locations.insert(url.to_string(), location.to_string());
        self
    }

    pub(crate) fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    /// Registers a JSON body for `url` with its query string already applied.
    pub(crate) fn with_json(mut self, url: &str, body: serde_json::Value) -> Self {
        self.json.insert(url.to_string(), body);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, entry: String) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(entry);
    }

    fn not_found(url: &str) -> FetchError {
        FetchError::Status {
            status: 404,
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch_location(&self, url: &str) -> Result<String, FetchError> {
        self.record(format!("HEAD {url}"));
        self.locations
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::MissingLocation(url.to_string()))
    }

    async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        self.record(format!("GET {url}"));
        self.pages.get(url).cloned().ok_or_else(|| Self::not_found(url))
    }

    async fn fetch_json(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<serde_json::Value, FetchError> {
        let full = url::Url::parse_with_params(url, query)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| url.to_string());
        self.record(format!("GET {full}"));
        self.json.get(&full).cloned().ok_or_else(|| Self::not_found(&full))
    }
}
