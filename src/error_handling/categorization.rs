//! Error categorization.
//!
//! This module maps transport errors onto `FetchError` and strategy errors
//! onto the `FailureType` categories used for statistics.

use super::types::{FailureType, FetchError, StrategyError};

/// Categorizes a `reqwest::Error` into a `FetchError`.
///
/// Status errors keep the numeric code; everything else keeps reqwest's
/// message (which already names the URL).
pub fn categorize_reqwest_error(error: &reqwest::Error) -> FetchError {
    if let Some(status) = error.status() {
        return FetchError::Status {
            status: status.as_u16(),
            url: error
                .url()
                .map(|url| url.to_string())
                .unwrap_or_default(),
        };
    }

    if error.is_timeout() {
        FetchError::Timeout(error.to_string())
    } else if error.is_connect() {
        FetchError::Connect(error.to_string())
    } else if error.is_decode() || error.is_body() {
        FetchError::Decode(error.to_string())
    } else {
        FetchError::Request(error.to_string())
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        categorize_reqwest_error(&error)
    }
}

/// Categorizes a strategy error for failure statistics.
pub fn categorize_strategy_error(error: &StrategyError) -> FailureType {
    match error {
        StrategyError::Fetch(fetch) => match fetch {
            FetchError::Status { .. } => FailureType::HttpStatus,
            FetchError::Timeout(_) => FailureType::HttpTimeout,
            FetchError::Connect(_) => FailureType::HttpConnect,
            FetchError::MissingLocation(_) => FailureType::MissingLocation,
            FetchError::Decode(_) => FailureType::DecodeError,
            FetchError::BodyTooLarge { .. } | FetchError::Request(_) => FailureType::HttpOther,
        },
        StrategyError::MissingQueryParam(_) => FailureType::MissingQueryParam,
        StrategyError::Decode { .. } => FailureType::DecodeError,
        StrategyError::UnexpectedPath(_) => FailureType::UnexpectedPath,
        StrategyError::MissingElement(_) => FailureType::MissingElement,
        StrategyError::PatternNotMatched(_) => FailureType::PatternNotMatched,
        StrategyError::MissingField(_) => FailureType::MissingField,
        StrategyError::InvalidTarget(_) => FailureType::InvalidTarget,
        StrategyError::Timeout(_) => FailureType::StepTimeout,
    }
}
