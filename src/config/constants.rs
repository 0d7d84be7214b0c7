//! Configuration constants.
//!
//! This module defines the defaults used throughout the resolver: network
//! timeouts, size limits and the termination bounds of the resolution loop.

use std::time::Duration;

/// Default per-request HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Deadline for a single strategy invocation.
///
/// A strategy may issue more than one request (the age-check interstitial
/// falls back to fetching the page), so this sits above the HTTP timeout.
pub const STRATEGY_TIMEOUT: Duration = Duration::from_secs(15);

/// Maximum number of strategy invocations within one resolution.
///
/// Single-step fixed points and revisited URLs already stop the loop; this
/// bounds chains that keep producing new URLs on registered hosts.
pub const MAX_RESOLUTION_HOPS: usize = 20;

/// Maximum number of inputs resolved at the same time by the batch runner.
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Default User-Agent string for HTTP requests.
///
/// Several shortlink services serve an empty page or a bot wall to clients
/// that do not look like a browser.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

// Response and body size limits
/// Maximum response body size in bytes (2MB)
/// Landing pages larger than this are treated as a fetch failure.
pub const MAX_RESPONSE_BODY_SIZE: usize = 2 * 1024 * 1024;

