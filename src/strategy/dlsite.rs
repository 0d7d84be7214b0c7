//! Affiliate-link strategies for the doujin storefront and its share hosts.

use async_trait::async_trait;

use super::{Conditional, MetaRefresh, ReplaceHost, Strategy, StripQuery};
use crate::error_handling::StrategyError;
use crate::fetch::Fetcher;
use crate::state::UrlState;

const CANONICAL_HOST: &str = "www.dlsite.com";

/// The URL carried in the path segment right after the first `url` segment,
/// e.g. `/maniax/dlaf/=/link/url/https%3A%2F%2F.../`.
fn embedded_target(state: &UrlState) -> Option<UrlState> {
    let segments = state.path_segments();
    let index = segments.iter().position(|s| *s == "url")?;
    let raw = segments.get(index + 1)?;
    let decoded = urlencoding::decode(raw).ok()?;
    UrlState::parse(&decoded).ok()
}

/// Whether the path embeds a decodable absolute URL after a `url` segment.
pub fn has_embedded_url(state: &UrlState) -> bool {
    embedded_target(state).is_some()
}

pub fn has_dlaf_segment(state: &UrlState) -> bool {
    state.path_segments().contains(&"dlaf")
}

/// Moves to the URL embedded in the path.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedPathUrl;

#[async_trait]
impl Strategy for EmbeddedPathUrl {
    fn name(&self) -> &'static str {
        "embedded-path-url"
    }

    async fn apply(
        &self,
        state: &UrlState,
        _fetcher: &dyn Fetcher,
    ) -> Result<UrlState, StrategyError> {
        embedded_target(state)
            .ok_or_else(|| StrategyError::UnexpectedPath(state.parsed().path().to_string()))
    }
}

/// Share host: embedded URL if present, otherwise the same path on the
/// canonical storefront host.
pub fn dlsharing() -> Conditional {
    Conditional::new("share-link", ReplaceHost::new(CANONICAL_HOST))
        .case(has_embedded_url, EmbeddedPathUrl)
}

/// Canonical storefront: embedded URL, then affiliate pages that redirect
/// through a meta refresh, otherwise the page itself without its query.
pub fn dlsite() -> Conditional {
    Conditional::new("affiliate-page", StripQuery::all())
        .case(has_embedded_url, EmbeddedPathUrl)
        .case(has_dlaf_segment, MetaRefresh)
}
