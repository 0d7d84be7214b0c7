//! Redirect `Location` handling.

use reqwest::Url;

/// Resolves a `Location` header value against the URL that produced it.
///
/// Absolute locations are returned verbatim; relative ones are joined onto
/// `current`. Returns `None` when neither interpretation yields a URL.
pub(crate) fn resolve_location(current: &str, location: &str) -> Option<String> {
    let location = location.trim();
    if location.is_empty() {
        return None;
    }
    if Url::parse(location).is_ok() {
        return Some(location.to_string());
    }
    Url::parse(current)
        .and_then(|base| base.join(location))
        .map(|url| url.to_string())
        .ok()
}
