//! Error type definitions.
//!
//! This module defines the error types used throughout the resolver. None of
//! them escape `Resolver::resolve`: fetch and strategy failures end a
//! resolution early and are reported through `StopReason`.

use std::time::Duration;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// The resolver registry could not be built.
    #[error("Registry initialization error: {0}")]
    RegistryError(#[from] RegistryError),
}

/// Errors raised while building a resolver registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A hostname was registered twice.
    #[error("duplicate resolver for host '{0}'")]
    DuplicateHost(String),

    /// An empty hostname can never match a parsed URL.
    #[error("empty hostname in registry entry")]
    EmptyHost,

    /// Parsed URLs always carry a lowercase hostname, so this entry could never match.
    #[error("hostname '{0}' must be lowercase")]
    UppercaseHost(String),
}

/// Failures of the network fetch primitives.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The server answered with an error status.
    #[error("HTTP status {status} from {url}")]
    Status {
        /// Numeric status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// A HEAD response without a usable `Location` header.
    #[error("no redirect location in response from {0}")]
    MissingLocation(String),

    /// The response body exceeded `MAX_RESPONSE_BODY_SIZE`.
    #[error("response body of {size} bytes exceeds limit of {limit} bytes")]
    BodyTooLarge {
        /// Observed body size
        size: usize,
        /// Configured limit
        limit: usize,
    },

    /// The request timed out.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The connection could not be established.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The body could not be decoded (invalid JSON, broken compression).
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Any other transport-level failure.
    #[error("HTTP request error: {0}")]
    Request(String),
}

/// Reasons a strategy could not produce a next URL.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StrategyError {
    /// The underlying fetch failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The expected query parameter is absent or blank.
    #[error("query parameter '{0}' not found")]
    MissingQueryParam(String),

    /// A parameter value could not be decoded.
    #[error("failed to decode parameter '{key}': {reason}")]
    Decode {
        /// Parameter name
        key: String,
        /// Decoder message
        reason: String,
    },

    /// The URL path does not have the shape this strategy handles.
    #[error("unexpected path shape: {0}")]
    UnexpectedPath(String),

    /// An expected HTML element or attribute is missing.
    #[error("missing page element: {0}")]
    MissingElement(&'static str),

    /// A text pattern did not match.
    #[error("pattern not matched: {0}")]
    PatternNotMatched(&'static str),

    /// An expected JSON field is missing or not a string.
    #[error("missing JSON field '{0}'")]
    MissingField(&'static str),

    /// The extracted value is not an absolute URL.
    #[error("not an absolute URL: {0}")]
    InvalidTarget(String),

    /// The strategy did not finish within the step deadline.
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Coarse categories of strategy failures, used for statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum FailureType {
    HttpStatus,
    HttpTimeout,
    HttpConnect,
    HttpOther,
    MissingLocation,
    MissingQueryParam,
    DecodeError,
    UnexpectedPath,
    MissingElement,
    PatternNotMatched,
    MissingField,
    InvalidTarget,
    StepTimeout,
}

impl FailureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureType::HttpStatus => "HTTP error status",
            FailureType::HttpTimeout => "HTTP request timeout",
            FailureType::HttpConnect => "HTTP connect error",
            FailureType::HttpOther => "HTTP request error",
            FailureType::MissingLocation => "Missing redirect location",
            FailureType::MissingQueryParam => "Missing query parameter",
            FailureType::DecodeError => "Decode error",
            FailureType::UnexpectedPath => "Unexpected path shape",
            FailureType::MissingElement => "Missing page element",
            FailureType::PatternNotMatched => "Pattern not matched",
            FailureType::MissingField => "Missing JSON field",
            FailureType::InvalidTarget => "Invalid target URL",
            FailureType::StepTimeout => "Resolution step timeout",
        }
    }
}

impl std::fmt::Display for FailureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_failure_type_as_str() {
        assert_eq!(FailureType::HttpTimeout.as_str(), "HTTP request timeout");
        assert_eq!(
            FailureType::MissingQueryParam.as_str(),
            "Missing query parameter"
        );
        assert_eq!(FailureType::StepTimeout.to_string(), "Resolution step timeout");
    }

    #[test]
    fn test_all_failure_types_have_string_representation() {
        for failure_type in FailureType::iter() {
            let str_repr = failure_type.as_str();
            assert!(
                !str_repr.is_empty(),
                "{:?} should have non-empty string",
                failure_type
            );
        }
    }

    #[test]
    fn test_strategy_error_wraps_fetch_error_transparently() {
        let fetch = FetchError::MissingLocation("https://t.co/x".to_string());
        let err = StrategyError::from(fetch.clone());
        assert_eq!(err.to_string(), fetch.to_string());
    }

    #[test]
    fn test_registry_error_messages() {
        assert_eq!(
            RegistryError::DuplicateHost("t.co".to_string()).to_string(),
            "duplicate resolver for host 't.co'"
        );
        let init = InitializationError::from(RegistryError::EmptyHost);
        assert!(init.to_string().contains("empty hostname"));
    }
}
