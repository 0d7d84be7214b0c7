//! Network fetch primitives used by resolution strategies.
//!
//! Strategies never talk to reqwest directly; they go through the `Fetcher`
//! trait so the resolution loop can be driven by a scripted fetcher in tests.
//!
//! HTML is returned as text rather than a parsed `scraper::Html`: parsed
//! documents are not `Send` and must not live across an await point.

mod http;
mod redirects;
mod request;

#[cfg(test)]
pub(crate) mod fake;

use async_trait::async_trait;

use crate::error_handling::FetchError;

pub use http::HttpFetcher;

/// Read-only network access needed by the strategy library.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Issues a HEAD request without following redirects and returns the
    /// `Location` header, resolved against `url` when relative.
    async fn fetch_location(&self, url: &str) -> Result<String, FetchError>;

    /// GETs `url` and returns the body as text.
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError>;

    /// GETs `url` with `query` appended and parses the body as JSON.
    async fn fetch_json(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<serde_json::Value, FetchError>;
}
