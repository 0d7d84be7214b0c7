//! Output line formatting for resolved inputs.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::OutputFormat;
use crate::resolve::{Resolution, StopReason};

/// One line of `--output json`.
#[derive(Debug, Serialize)]
struct OutputRecord<'a> {
    input: &'a str,
    resolved: &'a str,
    hops: &'a [String],
    stop: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Formats one resolved input as a single output line (no trailing newline).
pub fn format_line(format: OutputFormat, input: &str, resolution: &Resolution) -> Result<String> {
    match format {
        OutputFormat::Plain => Ok(resolution.url.clone()),
        OutputFormat::Json => {
            let error = match &resolution.stop {
                StopReason::StrategyFailed {
                    strategy, error, ..
                } => Some(format!("{strategy}: {error}")),
                _ => None,
            };
            let record = OutputRecord {
                input,
                resolved: &resolution.url,
                hops: &resolution.hops,
                stop: resolution.stop.kind().as_str(),
                error,
            };
            serde_json::to_string(&record).context("Failed to serialize output record")
        }
    }
}
