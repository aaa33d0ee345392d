//! Progress callbacks for a batch scan.
//!
//! Callbacks fire from worker threads in completion order, not universe
//! order.

use tracing::{debug, info};

use crate::pipeline::{ScanResult, SymbolOutcome};

pub trait ScanProgress: Send + Sync {
    /// Called once before any symbol is dispatched.
    fn on_start(&self, total: usize);

    /// Called when a symbol reaches a terminal state. `done` counts finished
    /// symbols including this one.
    fn on_symbol(&self, symbol: &str, outcome: &SymbolOutcome, done: usize, total: usize);

    /// Called after aggregation.
    fn on_finish(&self, result: &ScanResult);
}

/// Discards all events.
pub struct NoProgress;

impl ScanProgress for NoProgress {
    fn on_start(&self, _total: usize) {}

    fn on_symbol(&self, _symbol: &str, _outcome: &SymbolOutcome, _done: usize, _total: usize) {}

    fn on_finish(&self, _result: &ScanResult) {}
}

/// Logs through `tracing`: every outcome at debug, a heartbeat every
/// `every` symbols at info, and a summary at the end.
pub struct LogProgress {
    every: usize,
}

impl LogProgress {
    pub fn new(every: usize) -> Self {
        Self {
            every: every.max(1),
        }
    }
}

impl Default for LogProgress {
    fn default() -> Self {
        Self::new(100)
    }
}

impl ScanProgress for LogProgress {
    fn on_start(&self, total: usize) {
        info!(total, "scan started");
    }

    fn on_symbol(&self, symbol: &str, outcome: &SymbolOutcome, done: usize, total: usize) {
        debug!(symbol, state = %outcome.state(), done, total, "symbol finished");
        if done % self.every == 0 || done == total {
            info!(done, total, "scan progress");
        }
    }

    fn on_finish(&self, result: &ScanResult) {
        info!(
            total = result.total(),
            buy = result.buyable.len(),
            sell = result.sellable.len(),
            skipped = result.skipped.len(),
            failed = result.failed.len(),
            elapsed_ms = result.elapsed_ms,
            "scan finished"
        );
    }
}
