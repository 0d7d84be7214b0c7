//! Redirect-follow strategy for shortlink services.

use async_trait::async_trait;

use super::{next_hop, Strategy};
use crate::error_handling::StrategyError;
use crate::fetch::Fetcher;
use crate::state::UrlState;

/// Issues a HEAD request and moves to the `Location` it answers with.
#[derive(Debug, Clone, Copy, Default)]
pub struct FollowRedirect;

#[async_trait]
impl Strategy for FollowRedirect {
    fn name(&self) -> &'static str {
        "redirect-follow"
    }

    async fn apply(
        &self,
        state: &UrlState,
        fetcher: &dyn Fetcher,
    ) -> Result<UrlState, StrategyError> {
        let location = fetcher.fetch_location(state.as_str()).await?;
        next_hop(&location)
    }
}
