//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `url_resolver` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//!
//! All resolution logic is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use url_resolver::initialization::init_logger_with;
use url_resolver::{run_batch, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists), so RUST_LOG
    // can live there. Fall back to a .env next to the executable.
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let config = Config::parse();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    match run_batch(config).await {
        Ok(report) => {
            log::debug!(
                "Finished: {} resolved, {} changed, {} failed in {:.1}s",
                report.total,
                report.changed,
                report.failed,
                report.elapsed_seconds
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("url_resolver error: {:#}", e);
            process::exit(1);
        }
    }
}
