//! Input collection for the batch runner.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// Whether the command line asks for stdin: no inputs, or a lone `-`.
pub fn reads_stdin(inputs: &[String]) -> bool {
    inputs.is_empty() || (inputs.len() == 1 && inputs[0] == "-")
}

/// Returns the inputs to resolve, reading stdin lines when requested.
pub async fn collect_inputs(inputs: &[String]) -> Result<Vec<String>> {
    if reads_stdin(inputs) {
        log::info!("Reading inputs from stdin");
        read_lines(BufReader::new(tokio::io::stdin())).await
    } else {
        Ok(inputs.to_vec())
    }
}

/// Reads non-blank lines, skipping `#` comments. Lines are trimmed.
pub async fn read_lines<R: AsyncBufRead + Unpin>(reader: R) -> Result<Vec<String>> {
    let mut lines = reader.lines();
    let mut inputs = Vec::new();
    while let Some(line) = lines.next_line().await.context("Failed to read input line")? {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        inputs.push(trimmed.to_string());
    }
    Ok(inputs)
}
