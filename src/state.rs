//! URL snapshots passed between resolution steps.

use std::fmt;

use url::Url;

/// An immutable URL snapshot: its string form and its parsed components.
///
/// A state built from a string keeps that string verbatim, so a URL that is
/// never rewritten comes back exactly as it went in. A state built from parsed
/// components takes the canonical serialization as its string form. Either
/// way the two halves are derived from one another once, at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlState {
    url: String,
    parsed: Url,
}

impl UrlState {
    /// Parses an absolute URL, keeping `input` as the string form.
    pub fn parse(input: &str) -> Result<Self, url::ParseError> {
        let parsed = Url::parse(input)?;
        Ok(Self {
            url: input.to_string(),
            parsed,
        })
    }

    /// Builds a state from parsed components, re-serializing the string form.
    pub fn from_parsed(parsed: Url) -> Self {
        Self {
            url: parsed.to_string(),
            parsed,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    pub fn parsed(&self) -> &Url {
        &self.parsed
    }

    pub fn into_string(self) -> String {
        self.url
    }

    /// Hostname used for registry lookup; `None` for `mailto:` and friends.
    pub fn host(&self) -> Option<&str> {
        self.parsed.host_str().filter(|host| !host.is_empty())
    }

    /// Non-empty path segments, still percent-encoded.
    ///
    /// Doubled and trailing slashes do not produce segments, so
    /// `/age_check/=/` and `/age_check//=` both yield `["age_check", "="]`.
    pub fn path_segments(&self) -> Vec<&str> {
        self.parsed
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default()
    }

    /// Whether the path segments start with `prefix`.
    pub fn path_starts_with(&self, prefix: &[&str]) -> bool {
        let segments = self.path_segments();
        segments.len() >= prefix.len() && segments.iter().zip(prefix).all(|(a, b)| a == b)
    }

    /// The last non-blank value of query parameter `key`, decoded.
    ///
    /// Blank values (`?u=`) count as absent.
    pub fn last_query_value(&self, key: &str) -> Option<String> {
        self.parsed
            .query_pairs()
            .filter(|(k, v)| k == key && !v.is_empty())
            .map(|(_, v)| v.into_owned())
            .last()
    }
}

impl fmt::Display for UrlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}
