//! Batch runner behind the command-line binary.
//!
//! This module provides input collection, concurrent resolution with ordered
//! output, output formatting and the end-of-run statistics.

mod input;
mod output;
mod statistics;

use std::io::Write;
use std::time::Instant;

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use log::info;

use crate::config::{Config, OutputFormat};
use crate::error_handling::ResolutionStats;
use crate::resolve::{Resolver, StopKind};

use input::collect_inputs;
use output::format_line;
use statistics::{print_resolution_statistics, print_simple_summary};

/// Summary of a batch run.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Number of inputs resolved
    pub total: usize,
    /// Inputs whose final URL differs from the input
    pub changed: usize,
    /// Inputs whose resolution stopped on a strategy failure
    pub failed: usize,
    /// Elapsed time in seconds
    pub elapsed_seconds: f64,
}

/// Resolves every configured input and prints one line per input to stdout.
///
/// Reads stdin when `config.inputs` is empty or `-`.
///
/// # Errors
///
/// Returns an error if the resolver cannot be initialized or stdin/stdout
/// fail. Individual resolutions never fail.
pub async fn run_batch(config: Config) -> Result<BatchReport> {
    let inputs = collect_inputs(&config.inputs).await?;
    let resolver =
        Resolver::from_config(&config).context("Failed to initialize resolver")?;
    info!(
        "Resolving {} input{} with {} registered hosts",
        inputs.len(),
        if inputs.len() == 1 { "" } else { "s" },
        resolver.registry().len()
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let report = resolve_all(
        &resolver,
        inputs,
        config.output,
        config.max_concurrency,
        &mut out,
    )
    .await?;
    out.flush().context("Failed to flush stdout")?;
    Ok(report)
}

/// Resolves `inputs` at most `max_concurrency` at a time and writes one
/// formatted line per input to `out`, in input order.
pub async fn resolve_all<W: Write>(
    resolver: &Resolver,
    inputs: Vec<String>,
    format: OutputFormat,
    max_concurrency: usize,
    out: &mut W,
) -> Result<BatchReport> {
    let start_time = Instant::now();
    let stats = ResolutionStats::new();
    let mut changed = 0usize;

    let mut results = stream::iter(inputs)
        .map(|input| async move {
            let resolution = resolver.resolve_detailed(&input).await;
            (input, resolution)
        })
        .buffered(max_concurrency.max(1));

    while let Some((input, resolution)) = results.next().await {
        stats.record(&resolution);
        if resolution.changed() {
            changed += 1;
        }
        let line = format_line(format, &input, &resolution)?;
        writeln!(out, "{line}").context("Failed to write output line")?;
    }

    let elapsed_seconds = start_time.elapsed().as_secs_f64();
    let report = BatchReport {
        total: stats.total(),
        changed,
        failed: stats.stop_count(StopKind::StrategyFailed),
        elapsed_seconds,
    };

    print_resolution_statistics(&stats);
    print_simple_summary(report.total, report.changed, report.failed, elapsed_seconds);
    Ok(report)
}
