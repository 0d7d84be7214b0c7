//! HTTP client initialization.
//!
//! This module builds the HTTP client shared by every resolution step.

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use reqwest::ClientBuilder;

/// Initializes the shared HTTP client for redirect resolution.
///
/// Creates a `reqwest::Client` with:
/// - Automatic redirects disabled, so HEAD requests expose the raw `Location`
///   header and each hop goes back through the registry
/// - Per-request timeout and User-Agent from `config`
/// - Rustls TLS backend (no native TLS)
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_redirect_client(config: &Config) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let client = ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(Arc::new(client))
}
