//! Strategies that read the target out of a landing page.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use scraper::{Html, Selector};

use super::{next_hop, Strategy};
use crate::error_handling::StrategyError;
use crate::fetch::Fetcher;
use crate::state::UrlState;

// CSS selector strings
const META_SELECTOR_STR: &str = "meta[http-equiv]";
const SCRIPT_SELECTOR_STR: &str = "script";

// Regex patterns
const REFRESH_PATTERN: &str = r"(?i)^\d+\s*;\s*url=(.+)";
const SCRIPT_URL_PATTERN: &str = r#"\\"(http.+)\\""#;
const UNICODE_ESCAPE_PATTERN: &str = r"\\u([0-9a-fA-F]{4})";

static META_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(META_SELECTOR_STR).expect("Failed to parse meta selector - this is a bug")
});

static SCRIPT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(SCRIPT_SELECTOR_STR).expect("Failed to parse script selector - this is a bug")
});

static REFRESH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(REFRESH_PATTERN).expect("Failed to compile refresh regex - this is a bug")
});

static SCRIPT_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(SCRIPT_URL_PATTERN).expect("Failed to compile script URL regex - this is a bug")
});

static UNICODE_ESCAPE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(UNICODE_ESCAPE_PATTERN)
        .expect("Failed to compile unicode escape regex - this is a bug")
});

/// Fetches the page and follows its `<meta http-equiv="refresh">` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetaRefresh;

#[async_trait]
impl Strategy for MetaRefresh {
    fn name(&self) -> &'static str {
        "meta-refresh-parse"
    }

    async fn apply(
        &self,
        state: &UrlState,
        fetcher: &dyn Fetcher,
    ) -> Result<UrlState, StrategyError> {
        let body = fetcher.fetch_html(state.as_str()).await?;
        let target = extract_refresh_target(&body)?;
        next_hop(&target)
    }
}

/// Fetches the page and pulls an escaped URL literal out of its last script.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptUrl;

#[async_trait]
impl Strategy for ScriptUrl {
    fn name(&self) -> &'static str {
        "script-url-extract"
    }

    async fn apply(
        &self,
        state: &UrlState,
        fetcher: &dyn Fetcher,
    ) -> Result<UrlState, StrategyError> {
        let body = fetcher.fetch_html(state.as_str()).await?;
        let target = extract_script_url(&body)?;
        next_hop(&target)
    }
}

/// Extracts the URL from a `content="0; url=..."` meta refresh.
pub(crate) fn extract_refresh_target(body: &str) -> Result<String, StrategyError> {
    let document = Html::parse_document(body);
    let meta = document
        .select(&META_SELECTOR)
        .find(|element| {
            element
                .value()
                .attr("http-equiv")
                .is_some_and(|v| v.trim().eq_ignore_ascii_case("refresh"))
        })
        .ok_or(StrategyError::MissingElement("meta refresh tag"))?;

    let content = meta
        .value()
        .attr("content")
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or(StrategyError::MissingElement("content of meta refresh tag"))?;

    let target = REFRESH_REGEX
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|url| !url.is_empty())
        .ok_or(StrategyError::PatternNotMatched("meta refresh url"))?;

    Ok(target.to_string())
}

/// Extracts the first `\"http...\"` literal from the last `<script>` element
/// and decodes its `\uXXXX` escapes.
pub(crate) fn extract_script_url(body: &str) -> Result<String, StrategyError> {
    let document = Html::parse_document(body);
    let script = document
        .select(&SCRIPT_SELECTOR)
        .last()
        .ok_or(StrategyError::MissingElement("script tag"))?;
    let text = script.text().collect::<String>();

    let escaped = SCRIPT_URL_REGEX
        .captures(&text)
        .and_then(|caps| caps.get(1))
        .ok_or(StrategyError::PatternNotMatched("escaped URL in script"))?;

    Ok(unescape_unicode(escaped.as_str()))
}

fn unescape_unicode(text: &str) -> String {
    UNICODE_ESCAPE_REGEX
        .replace_all(text, |caps: &regex::Captures| {
            u32::from_str_radix(&caps[1], 16)
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::FetchError;
    use crate::fetch::fake::FakeFetcher;

    #[test]
    fn test_refresh_target_extracted() {
        let html = r#"<html><head>
            <meta charset="utf-8">
            <meta http-equiv="refresh" content="0; URL=https://www.dlsite.com/maniax/work/=/product_id/RJ01.html">
            </head></html>"#;
        assert_eq!(
            extract_refresh_target(html).unwrap(),
            "https://www.dlsite.com/maniax/work/=/product_id/RJ01.html"
        );
    }

    #[test]
    fn test_refresh_http_equiv_case_insensitive() {
        let html = r#"<meta http-equiv="Refresh" content="5;url=https://example.com/">"#;
        assert_eq!(extract_refresh_target(html).unwrap(), "https://example.com/");
    }

    #[test]
    fn test_refresh_failures() {
        assert_eq!(
            extract_refresh_target("<html><head></head></html>"),
            Err(StrategyError::MissingElement("meta refresh tag"))
        );
        assert_eq!(
            extract_refresh_target(r#"<meta http-equiv="refresh">"#),
            Err(StrategyError::MissingElement("content of meta refresh tag"))
        );
        assert_eq!(
            extract_refresh_target(r#"<meta http-equiv="refresh" content="url=https://x.example/">"#),
            Err(StrategyError::PatternNotMatched("meta refresh url"))
        );
    }

    #[test]
    fn test_script_url_from_last_script() {
        let html = r#"<html><body>
            <script>var ignored = "\"https://first.example/\"";</script>
            <script>self.__next_f.push([1,"{\"href\":\"https://www.dmm.co.jp/digital/videoa/-/detail/=/cid=abc123/?i3_ref=x\u0026dmmref=y\"}"])</script>
            </body></html>"#;
        assert_eq!(
            extract_script_url(html).unwrap(),
            "https://www.dmm.co.jp/digital/videoa/-/detail/=/cid=abc123/?i3_ref=x&dmmref=y"
        );
    }

    #[test]
    fn test_script_url_failures() {
        assert_eq!(
            extract_script_url("<html><body>no scripts</body></html>"),
            Err(StrategyError::MissingElement("script tag"))
        );
        assert_eq!(
            extract_script_url("<script>var x = 1;</script>"),
            Err(StrategyError::PatternNotMatched("escaped URL in script"))
        );
    }

    #[test]
    fn test_unescape_unicode() {
        assert_eq!(unescape_unicode(r"a\u0026b=c"), "a&b=c");
        assert_eq!(unescape_unicode(r"\uD800 stays"), r"\uD800 stays");
    }

    #[tokio::test]
    async fn test_meta_refresh_strategy_fetches_page() {
        let fetcher = FakeFetcher::new().with_page(
            "https://b-short.link/abc",
            r#"<meta http-equiv="refresh" content="0;url=https://target.example/x">"#,
        );
        let state = UrlState::parse("https://b-short.link/abc").unwrap();
        let next = MetaRefresh.apply(&state, &fetcher).await.unwrap();
        assert_eq!(next.as_str(), "https://target.example/x");
        assert_eq!(fetcher.requests(), vec!["GET https://b-short.link/abc"]);
    }

    #[tokio::test]
    async fn test_script_strategy_propagates_fetch_failure() {
        let state = UrlState::parse("https://live-dh.cc/x").unwrap();
        let err = ScriptUrl.apply(&state, &FakeFetcher::new()).await.unwrap_err();
        assert_eq!(
            err,
            StrategyError::Fetch(FetchError::Status {
                status: 404,
                url: "https://live-dh.cc/x".to_string()
            })
        );
    }
}
