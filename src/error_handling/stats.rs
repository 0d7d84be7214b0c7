//! Resolution statistics tracking.
//!
//! This module provides thread-safe counters for how resolutions ended and
//! why strategies failed, shared across concurrently running resolutions.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::categorization::categorize_strategy_error;
use super::types::FailureType;
use crate::resolve::{Resolution, StopKind, StopReason};

/// Thread-safe resolution statistics tracker.
///
/// All counters are created up front so recording never allocates and the
/// struct can be shared across tasks behind an `Arc`.
pub struct ResolutionStats {
    stops: HashMap<StopKind, AtomicUsize>,
    failures: HashMap<FailureType, AtomicUsize>,
    hops: AtomicUsize,
}

impl ResolutionStats {
    pub fn new() -> Self {
        let mut stops = HashMap::new();
        for kind in StopKind::iter() {
            stops.insert(kind, AtomicUsize::new(0));
        }

        let mut failures = HashMap::new();
        for failure in FailureType::iter() {
            failures.insert(failure, AtomicUsize::new(0));
        }

        ResolutionStats {
            stops,
            failures,
            hops: AtomicUsize::new(0),
        }
    }

    /// Records the outcome of one resolution.
    pub fn record(&self, resolution: &Resolution) {
        if let Some(counter) = self.stops.get(&resolution.stop.kind()) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
        if let StopReason::StrategyFailed { error, .. } = &resolution.stop {
            let failure = categorize_strategy_error(error);
            if let Some(counter) = self.failures.get(&failure) {
                counter.fetch_add(1, Ordering::Relaxed);
            }
        }
        self.hops
            .fetch_add(resolution.hop_count(), Ordering::Relaxed);
    }

    /// Number of resolutions that stopped for the given reason.
    pub fn stop_count(&self, kind: StopKind) -> usize {
        self.stops
            .get(&kind)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Number of strategy failures in the given category.
    pub fn failure_count(&self, failure: FailureType) -> usize {
        self.failures
            .get(&failure)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Total resolutions recorded.
    pub fn total(&self) -> usize {
        self.stops.values().map(|c| c.load(Ordering::SeqCst)).sum()
    }

    /// Total URL transitions across all recorded resolutions.
    pub fn total_hops(&self) -> usize {
        self.hops.load(Ordering::SeqCst)
    }
}

impl Default for ResolutionStats {
    fn default() -> Self {
        Self::new()
    }
}
