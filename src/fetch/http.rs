//! reqwest-backed implementation of the fetch primitives.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use reqwest::Url;

use super::redirects::resolve_location;
use super::request::RequestHeaders;
use super::Fetcher;
use crate::config::{Config, MAX_RESPONSE_BODY_SIZE};
use crate::error_handling::{FetchError, InitializationError};
use crate::initialization::init_redirect_client;

/// Fetcher backed by a shared `reqwest::Client`.
///
/// The client must have automatic redirects disabled, otherwise HEAD requests
/// never surface a `Location` header.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Arc<reqwest::Client>,
}

impl HttpFetcher {
    pub fn new(client: Arc<reqwest::Client>) -> Self {
        Self { client }
    }

    /// Builds a fetcher with a redirect-less client configured from `config`.
    pub fn from_config(config: &Config) -> Result<Self, InitializationError> {
        Ok(Self::new(init_redirect_client(config)?))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_location(&self, url: &str) -> Result<String, FetchError> {
        let response = RequestHeaders::apply_to_request_builder(self.client.head(url))
            .send()
            .await?
            .error_for_status()?;

        debug!("HEAD {url} -> {}", response.status());
        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|loc| loc.to_str().ok())
            .ok_or_else(|| FetchError::MissingLocation(url.to_string()))?;

        resolve_location(url, location).ok_or_else(|| FetchError::MissingLocation(url.to_string()))
    }

    async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        let response = RequestHeaders::apply_to_request_builder(self.client.get(url))
            .send()
            .await?
            .error_for_status()?;

        debug!("GET {url} -> {}", response.status());
        read_body(response).await
    }

    async fn fetch_json(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<serde_json::Value, FetchError> {
        let url = Url::parse_with_params(url, query)
            .map_err(|e| FetchError::Request(format!("invalid URL {url}: {e}")))?;
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?
            .error_for_status()?;

        debug!("GET {url} -> {}", response.status());
        let body = read_body(response).await?;
        serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

/// Reads a response body as text, enforcing `MAX_RESPONSE_BODY_SIZE`.
async fn read_body(response: reqwest::Response) -> Result<String, FetchError> {
    if let Some(length) = response.content_length() {
        let size = usize::try_from(length).unwrap_or(usize::MAX);
        if size > MAX_RESPONSE_BODY_SIZE {
            return Err(FetchError::BodyTooLarge {
                size,
                limit: MAX_RESPONSE_BODY_SIZE,
            });
        }
    }

    let bytes = response.bytes().await?;
    if bytes.len() > MAX_RESPONSE_BODY_SIZE {
        return Err(FetchError::BodyTooLarge {
            size: bytes.len(),
            limit: MAX_RESPONSE_BODY_SIZE,
        });
    }
    // Landing pages are frequently served with a wrong charset; decoding
    // lossily keeps the markup usable.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
