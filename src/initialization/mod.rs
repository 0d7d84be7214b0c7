//! Application initialization and resource setup.
//!
//! This module provides functions to initialize shared resources:
//! - The redirect-less HTTP client used by every fetch
//! - The logger used by the binary
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;

// Re-export public API
pub use client::init_redirect_client;
pub use logger::init_logger_with;
