//! Storefront strategies: age-check interstitials, login redirects and
//! product-page cleanup.

use std::sync::LazyLock;

use async_trait::async_trait;
use scraper::{Html, Selector};
use url::{form_urlencoded, Url};

use super::{next_hop, Conditional, Strategy, StripQuery};
use crate::error_handling::StrategyError;
use crate::fetch::Fetcher;
use crate::state::UrlState;

const AGE_CHECK_URL: &str = "https://www.dmm.co.jp/age_check/=/";
const LOGIN_PREFIX: [&str; 4] = ["service", "login", "password", "="];

static AGE_CHECK_ANCHOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div.turtle-component > a")
        .expect("Failed to parse age check anchor selector - this is a bug")
});

/// `/age_check/=/...` or `/en/age_check/=/...`
pub fn is_age_check(state: &UrlState) -> bool {
    state.path_starts_with(&["age_check", "="]) || state.path_starts_with(&["en", "age_check", "="])
}

/// Gets past the age-check interstitial.
///
/// `rurl` is either the target itself or an opaque token, in which case the
/// interstitial page links to the target.
#[derive(Debug, Clone, Copy, Default)]
pub struct AgeCheck;

#[async_trait]
impl Strategy for AgeCheck {
    fn name(&self) -> &'static str {
        "age-check"
    }

    async fn apply(
        &self,
        state: &UrlState,
        fetcher: &dyn Fetcher,
    ) -> Result<UrlState, StrategyError> {
        let rurl = state
            .last_query_value("rurl")
            .ok_or_else(|| StrategyError::MissingQueryParam("rurl".to_string()))?;
        if let Ok(target) = UrlState::parse(&rurl) {
            return Ok(target);
        }

        let body = fetcher.fetch_html(state.as_str()).await?;
        let href = extract_age_check_href(&body)?;
        let target = state
            .parsed()
            .join(&href)
            .map_err(|_| StrategyError::InvalidTarget(href))?;
        Ok(UrlState::from_parsed(target))
    }
}

fn extract_age_check_href(body: &str) -> Result<String, StrategyError> {
    let document = Html::parse_document(body);
    let anchor = document
        .select(&AGE_CHECK_ANCHOR)
        .next()
        .ok_or(StrategyError::MissingElement("age check anchor"))?;
    anchor
        .value()
        .attr("href")
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(str::to_string)
        .ok_or(StrategyError::MissingElement("href of age check anchor"))
}

/// Unwraps `/service/login/password/=/<query>` login redirects.
///
/// The segment after `=` is itself a query string; its `path` parameter is
/// either the target or a token that the age-check page understands.
#[derive(Debug, Clone, Copy, Default)]
pub struct DmmLogin;

#[async_trait]
impl Strategy for DmmLogin {
    fn name(&self) -> &'static str {
        "login-unwrap"
    }

    async fn apply(
        &self,
        state: &UrlState,
        _fetcher: &dyn Fetcher,
    ) -> Result<UrlState, StrategyError> {
        let segments = state.path_segments();
        let embedded = match segments.as_slice() {
            [a, b, c, d, query, ..] if [*a, *b, *c, *d] == LOGIN_PREFIX => *query,
            _ => {
                return Err(StrategyError::UnexpectedPath(
                    state.parsed().path().to_string(),
                ))
            }
        };

        let path = form_urlencoded::parse(embedded.as_bytes())
            .filter(|(key, value)| key == "path" && !value.is_empty())
            .map(|(_, value)| value.into_owned())
            .last()
            .ok_or_else(|| StrategyError::MissingQueryParam("path".to_string()))?;

        if let Ok(target) = UrlState::parse(&path) {
            return Ok(target);
        }
        let age_check = Url::parse_with_params(AGE_CHECK_URL, &[("rurl", path.as_str())])
            .map_err(|_| StrategyError::InvalidTarget(path.clone()))?;
        next_hop(age_check.as_str())
    }
}

/// Storefront pages: age checks are unwrapped, everything else keeps only
/// `allowed_keys` in its query.
pub fn dmm_page(allowed_keys: &[&str]) -> Conditional {
    Conditional::new("storefront-page", StripQuery::keeping(allowed_keys.iter().copied()))
        .case(is_age_check, AgeCheck)
}
