//! Statistics printing for batch runs.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{FailureType, ResolutionStats};
use crate::resolve::StopKind;

/// Prints how resolutions ended and why strategies failed to the log.
pub fn print_resolution_statistics(stats: &ResolutionStats) {
    let total = stats.total();
    if total == 0 {
        return;
    }

    info!(
        "Stop Reasons ({} resolutions, {} hops total):",
        total,
        stats.total_hops()
    );
    for kind in StopKind::iter() {
        let count = stats.stop_count(kind);
        if count > 0 {
            info!("   {}: {}", kind.as_str(), count);
        }
    }

    let failed = stats.stop_count(StopKind::StrategyFailed);
    if failed > 0 {
        info!("Strategy Failures ({} total):", failed);
        for failure in FailureType::iter() {
            let count = stats.failure_count(failure);
            if count > 0 {
                info!("   {}: {}", failure.as_str(), count);
            }
        }
    }
}

/// Prints a one-line summary of the run.
pub fn print_simple_summary(total: usize, changed: usize, failed: usize, elapsed_seconds: f64) {
    info!(
        "✅ Resolved {} input{} ({} changed, {} stopped on a failure) in {:.1}s",
        total,
        if total == 1 { "" } else { "s" },
        changed,
        failed,
        elapsed_seconds
    );
}
