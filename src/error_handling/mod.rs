//! Error handling and resolution statistics.
//!
//! This module provides:
//! - Error type definitions (initialization, registry, fetch, strategy)
//! - Mapping of transport errors onto fetch errors
//! - Failure categorization and thread-safe outcome counters
//!
//! Fetch and strategy errors never reach the caller of `resolve`; they end a
//! resolution early and are recorded here for diagnostics.

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::categorize_strategy_error;
pub use stats::ResolutionStats;
pub use types::{FailureType, FetchError, InitializationError, RegistryError, StrategyError};
