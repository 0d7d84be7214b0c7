//! Resolution strategies.
//!
//! A strategy turns the current `UrlState` into the next candidate, or fails
//! with a `StrategyError` when its host-specific assumptions do not hold. The
//! registry maps each known hostname to exactly one strategy; the resolution
//! loop treats any failure as "stop here".
//!
//! Primitives:
//! - [`FollowRedirect`]: HEAD request, `Location` header
//! - [`QueryParam`] / [`Base64QueryParam`]: target carried in a query parameter
//! - [`ReplaceHost`]: mirror host to canonical host
//! - [`MetaRefresh`] / [`ScriptUrl`]: target embedded in the landing page
//! - [`StripQuery`]: drop tracking parameters
//! - [`PathLookup`]: short-link hash resolved through a first-party JSON API
//!
//! Composites ([`Conditional`]) try path-shape cases in declaration order and
//! fall back to a default strategy.

mod api;
mod composite;
mod dlsite;
mod dmm;
mod host;
mod html;
mod query;
mod redirect;

use std::fmt;

use async_trait::async_trait;

use crate::error_handling::StrategyError;
use crate::fetch::Fetcher;
use crate::state::UrlState;

pub use api::PathLookup;
pub use composite::{Conditional, Predicate};
pub use dlsite::{dlsharing, dlsite, has_dlaf_segment, has_embedded_url, EmbeddedPathUrl};
pub use dmm::{dmm_page, is_age_check, AgeCheck, DmmLogin};
pub use host::ReplaceHost;
pub use html::{MetaRefresh, ScriptUrl};
pub use query::{Base64QueryParam, QueryParam, StripQuery};
pub use redirect::FollowRedirect;

/// One step of URL resolution for a particular kind of host.
#[async_trait]
pub trait Strategy: Send + Sync + fmt::Debug {
    /// Short label used in logs and stop reasons.
    fn name(&self) -> &'static str;

    /// Produces the next URL state from `state`.
    async fn apply(
        &self,
        state: &UrlState,
        fetcher: &dyn Fetcher,
    ) -> Result<UrlState, StrategyError>;
}

/// Parses an extracted value as the next hop.
///
/// Anything that is not an absolute URL is a failure: the loop then keeps the
/// last good URL instead of returning a fragment of a query string.
pub(crate) fn next_hop(raw: &str) -> Result<UrlState, StrategyError> {
    UrlState::parse(raw).map_err(|_| StrategyError::InvalidTarget(raw.to_string()))
}
