//! Resolution outcome types.

use std::fmt;

use strum_macros::EnumIter as EnumIterMacro;

use crate::error_handling::StrategyError;

/// Why a resolution stopped where it did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The input does not parse as an absolute URL; it is returned as-is.
    NotAUrl,
    /// The URL has no hostname to dispatch on (`mailto:`, `urn:`, ...).
    NoHostname,
    /// The host has no registered strategy: a final destination.
    NoResolver,
    /// The host's strategy could not produce a next URL.
    StrategyFailed {
        host: String,
        strategy: &'static str,
        error: StrategyError,
    },
    /// The strategy returned the URL it was given.
    FixedPoint,
    /// The strategy returned a URL already visited in this resolution.
    Cycle,
    /// The hop ceiling was reached before the chain converged.
    HopLimit,
}

impl StopReason {
    pub fn kind(&self) -> StopKind {
        match self {
            StopReason::NotAUrl => StopKind::NotAUrl,
            StopReason::NoHostname => StopKind::NoHostname,
            StopReason::NoResolver => StopKind::NoResolver,
            StopReason::StrategyFailed { .. } => StopKind::StrategyFailed,
            StopReason::FixedPoint => StopKind::FixedPoint,
            StopReason::Cycle => StopKind::Cycle,
            StopReason::HopLimit => StopKind::HopLimit,
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::StrategyFailed {
                host,
                strategy,
                error,
            } => write!(f, "{strategy} failed for {host}: {error}"),
            other => f.write_str(other.kind().as_str()),
        }
    }
}

/// Fieldless mirror of [`StopReason`], used for counting and labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum StopKind {
    NotAUrl,
    NoHostname,
    NoResolver,
    StrategyFailed,
    FixedPoint,
    Cycle,
    HopLimit,
}

impl StopKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopKind::NotAUrl => "not a URL",
            StopKind::NoHostname => "no hostname",
            StopKind::NoResolver => "no resolver",
            StopKind::StrategyFailed => "strategy failed",
            StopKind::FixedPoint => "fixed point",
            StopKind::Cycle => "cycle",
            StopKind::HopLimit => "hop limit",
        }
    }
}

impl fmt::Display for StopKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The final URL of a resolution together with how it got there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Best-known URL; the untouched input when nothing could be resolved.
    pub url: String,
    /// Every URL visited, starting with the input. Empty for non-URL input.
    pub hops: Vec<String>,
    pub stop: StopReason,
}

impl Resolution {
    /// Number of successful URL transitions.
    pub fn hop_count(&self) -> usize {
        self.hops.len().saturating_sub(1)
    }

    /// Whether the final URL differs from the input.
    pub fn changed(&self) -> bool {
        self.hops.first().is_some_and(|input| *input != self.url)
    }
}
