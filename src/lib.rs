//! url_resolver library: unwraps tracking redirectors and shortlinks
//!
//! Given arbitrary text that may be a URL, the resolver follows shortlink
//! redirects, pulls targets out of query parameters, landing pages and
//! first-party APIs, and strips tracking parameters, one host-specific step at
//! a time, until it reaches a host it has no rule for.
//!
//! # Example
//!
//! ```no_run
//! # #[tokio::main]
//! # async fn main() {
//! let url = url_resolver::resolve("https://t.co/abc123").await;
//! println!("{url}");
//!
//! // Not a URL: returned unchanged
//! assert_eq!(url_resolver::resolve("hello").await, "hello");
//! # }
//! ```
//!
//! Custom tables and fetchers go through [`Resolver`]:
//!
//! ```no_run
//! use std::sync::Arc;
//! use url_resolver::{Config, HttpFetcher, QueryParam, Registry, Resolver};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut registry = Registry::new();
//! registry.register("short.example", QueryParam::new("u"))?;
//! let fetcher = HttpFetcher::from_config(&Config::default())?;
//! let resolver = Resolver::new(Arc::new(registry), Arc::new(fetcher));
//!
//! let resolution = resolver
//!     .resolve_detailed("https://short.example/go?u=https%3A%2F%2Ftarget.example%2F")
//!     .await;
//! println!("{} ({})", resolution.url, resolution.stop);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

mod app;
pub mod config;
mod error_handling;
mod fetch;
pub mod initialization;
pub mod registry;
mod resolve;
mod state;
pub mod strategy;

// Re-export public API
pub use app::{resolve_all, run_batch, BatchReport};
pub use config::{Config, LogFormat, LogLevel, OutputFormat};
pub use error_handling::{
    categorize_strategy_error, FailureType, FetchError, InitializationError, RegistryError,
    ResolutionStats, StrategyError,
};
pub use fetch::{Fetcher, HttpFetcher};
pub use registry::Registry;
pub use resolve::{resolve, Resolution, Resolver, StopKind, StopReason};
pub use state::UrlState;
pub use strategy::{
    Base64QueryParam, Conditional, FollowRedirect, MetaRefresh, PathLookup, QueryParam,
    ReplaceHost, ScriptUrl, Strategy, StripQuery,
};
