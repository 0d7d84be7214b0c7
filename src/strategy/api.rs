//! Short-link lookups through a first-party JSON API.

use async_trait::async_trait;
use serde_json::Value;

use super::{next_hop, Strategy};
use crate::error_handling::StrategyError;
use crate::fetch::Fetcher;
use crate::state::UrlState;

/// Resolves `/<prefix>/<hash>` through `GET <origin><endpoint>?<param>=<hash>`
/// and follows the string field `field` of the JSON answer.
#[derive(Debug, Clone)]
pub struct PathLookup {
    prefix: &'static str,
    endpoint: &'static str,
    param: &'static str,
    field: &'static str,
}

impl PathLookup {
    pub fn new(
        prefix: &'static str,
        endpoint: &'static str,
        param: &'static str,
        field: &'static str,
    ) -> Self {
        Self {
            prefix,
            endpoint,
            param,
            field,
        }
    }

    /// `/short/<hash>` answered by `/api/proxy?id=<hash>` with a `url` field.
    pub fn short_link() -> Self {
        Self::new("short", "/api/proxy", "id", "url")
    }

    fn api_url(&self, state: &UrlState) -> String {
        let mut api = state.parsed().clone();
        api.set_path(self.endpoint);
        api.set_query(None);
        api.set_fragment(None);
        api.to_string()
    }
}

#[async_trait]
impl Strategy for PathLookup {
    fn name(&self) -> &'static str {
        "path-routed-lookup"
    }

    async fn apply(
        &self,
        state: &UrlState,
        fetcher: &dyn Fetcher,
    ) -> Result<UrlState, StrategyError> {
        let hash = match state.path_segments().as_slice() {
            [prefix, hash, ..] if *prefix == self.prefix => hash.to_string(),
            _ => {
                return Err(StrategyError::UnexpectedPath(
                    state.parsed().path().to_string(),
                ))
            }
        };

        let data = fetcher
            .fetch_json(&self.api_url(state), &[(self.param, &hash)])
            .await?;
        let url = data
            .get(self.field)
            .and_then(Value::as_str)
            .ok_or(StrategyError::MissingField(self.field))?;
        next_hop(url)
    }
}
