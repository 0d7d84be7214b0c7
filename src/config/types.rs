//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_MAX_CONCURRENCY, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, MAX_RESOLUTION_HOPS,
    STRATEGY_TIMEOUT,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Output format for resolved URLs printed by the batch runner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One resolved URL per line
    Plain,
    /// One JSON object per line with the hop trace and stop reason
    Json,
}

/// Resolver configuration and command-line options.
///
/// Library users construct it with struct update syntax over `Default`; the
/// binary parses it from the command line.
///
/// # Examples
///
/// ```no_run
/// use url_resolver::Config;
///
/// let config = Config {
///     max_hops: 10,
///     timeout_seconds: 5,
///     ..Default::default()
/// };
/// ```
///
/// ```bash
/// # Resolve a single shortlink
/// url_resolver https://t.co/abc123
///
/// # Resolve every line of a file, JSON output
/// url_resolver --output json - < links.txt
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "url_resolver",
    about = "Unwraps tracking redirectors and shortlinks into canonical content URLs."
)]
pub struct Config {
    /// Texts to resolve; reads stdin lines when empty or "-"
    #[arg(value_parser)]
    pub inputs: Vec<String>,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Output format: plain|json
    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    pub output: OutputFormat,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// Deadline for one resolution step in seconds
    #[arg(long, default_value_t = STRATEGY_TIMEOUT.as_secs())]
    pub strategy_timeout_seconds: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Maximum number of resolution steps per input
    #[arg(long, default_value_t = MAX_RESOLUTION_HOPS)]
    pub max_hops: usize,

    /// Maximum number of inputs resolved concurrently
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENCY)]
    pub max_concurrency: usize,
}

impl Config {
    /// Per-step deadline as a `Duration`.
    pub fn strategy_timeout(&self) -> Duration {
        Duration::from_secs(self.strategy_timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            output: OutputFormat::Plain,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            strategy_timeout_seconds: STRATEGY_TIMEOUT.as_secs(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_hops: MAX_RESOLUTION_HOPS,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}
