//! Query-string strategies: extract a target from a parameter, or strip
//! tracking parameters.

use std::collections::BTreeSet;

use async_trait::async_trait;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use url::form_urlencoded;

use super::{next_hop, Strategy};
use crate::error_handling::StrategyError;
use crate::fetch::Fetcher;
use crate::state::UrlState;

/// URL-safe alphabet; redirectors are inconsistent about padding.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Moves to the URL carried in the last value of query parameter `key`.
#[derive(Debug, Clone)]
pub struct QueryParam {
    key: String,
}

impl QueryParam {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

#[async_trait]
impl Strategy for QueryParam {
    fn name(&self) -> &'static str {
        "query-extract"
    }

    async fn apply(
        &self,
        state: &UrlState,
        _fetcher: &dyn Fetcher,
    ) -> Result<UrlState, StrategyError> {
        let value = state
            .last_query_value(&self.key)
            .ok_or_else(|| StrategyError::MissingQueryParam(self.key.clone()))?;
        next_hop(&value)
    }
}

/// Like [`QueryParam`], but the value is URL-safe base64 of the target.
#[derive(Debug, Clone)]
pub struct Base64QueryParam {
    key: String,
}

impl Base64QueryParam {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

#[async_trait]
impl Strategy for Base64QueryParam {
    fn name(&self) -> &'static str {
        "base64-decode-extract"
    }

    async fn apply(
        &self,
        state: &UrlState,
        _fetcher: &dyn Fetcher,
    ) -> Result<UrlState, StrategyError> {
        let value = state
            .last_query_value(&self.key)
            .ok_or_else(|| StrategyError::MissingQueryParam(self.key.clone()))?;
        let decode_error = |reason: String| StrategyError::Decode {
            key: self.key.clone(),
            reason,
        };
        let bytes = URL_SAFE_LENIENT
            .decode(value.trim())
            .map_err(|e| decode_error(e.to_string()))?;
        let url = String::from_utf8(bytes).map_err(|e| decode_error(e.to_string()))?;
        next_hop(&url)
    }
}

/// Rebuilds the query keeping only `allowed_keys`; an empty set drops it all.
///
/// Kept parameters are grouped by key in order of first appearance, and blank
/// values are dropped, so applying the strategy twice gives the same URL as
/// applying it once. The fragment is preserved.
#[derive(Debug, Clone, Default)]
pub struct StripQuery {
    allowed_keys: BTreeSet<String>,
}

impl StripQuery {
    /// Strips every query parameter.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn keeping<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub(crate) fn strip(&self, state: &UrlState) -> UrlState {
        let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
        for (key, value) in state.parsed().query_pairs() {
            if value.is_empty() || !self.allowed_keys.contains(key.as_ref()) {
                continue;
            }
            match grouped.iter_mut().find(|(k, _)| k.as_str() == key.as_ref()) {
                Some((_, values)) => values.push(value.into_owned()),
                None => grouped.push((key.into_owned(), vec![value.into_owned()])),
            }
        }

        let mut parsed = state.parsed().clone();
        if grouped.is_empty() {
            parsed.set_query(None);
        } else {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(
                    grouped.iter().flat_map(|(k, values)| {
                        values.iter().map(move |v| (k.as_str(), v.as_str()))
                    }),
                )
                .finish();
            parsed.set_query(Some(&query));
        }
        UrlState::from_parsed(parsed)
    }
}

#[async_trait]
impl Strategy for StripQuery {
    fn name(&self) -> &'static str {
        "query-allowlist-strip"
    }

    async fn apply(
        &self,
        state: &UrlState,
        _fetcher: &dyn Fetcher,
    ) -> Result<UrlState, StrategyError> {
        Ok(self.strip(state))
    }
}
