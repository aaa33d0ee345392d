//! Batch scan pipeline.
//!
//! Each symbol runs `Pending → Fetching → Computing → Classified | Skipped |
//! Failed` on a worker of a private rayon pool. Tasks share only read-only
//! references (config, provider); every task returns its own outcome and the
//! outcomes are reduced after the whole batch completes. A failing symbol is
//! logged and recorded, never propagated.
//!
//! There is no per-symbol timeout: a fetch that hangs holds its worker until
//! the provider's own request timeout fires, and the batch waits for it.

use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

use sigscan_core::data::{FetchWindow, MarketDataProvider, SymbolUniverse};
use sigscan_core::{classify, Classification, ConfigError, ScanConfig, SignalError};

use crate::progress::{NoProgress, ScanProgress};

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("invalid scan config: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}

/// Lifecycle of one symbol within a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolState {
    Pending,
    Fetching,
    Computing,
    Classified,
    Skipped,
    Failed,
}

impl fmt::Display for SymbolState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SymbolState::Pending => "pending",
            SymbolState::Fetching => "fetching",
            SymbolState::Computing => "computing",
            SymbolState::Classified => "classified",
            SymbolState::Skipped => "skipped",
            SymbolState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Terminal state of one symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SymbolOutcome {
    Classified { classification: Classification },
    /// Too little history to trust the indicators.
    Skipped { bars: usize, required: usize },
    /// Fetch or computation error, with the cause.
    Failed { reason: String },
}

impl SymbolOutcome {
    pub fn state(&self) -> SymbolState {
        match self {
            SymbolOutcome::Classified { .. } => SymbolState::Classified,
            SymbolOutcome::Skipped { .. } => SymbolState::Skipped,
            SymbolOutcome::Failed { .. } => SymbolState::Failed,
        }
    }
}

/// Aggregated scan output. All lists are sorted by symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanResult {
    /// Final classification of every symbol that reached `Classified`.
    pub classifications: BTreeMap<String, Classification>,
    pub buyable: Vec<String>,
    pub sellable: Vec<String>,
    pub skipped: Vec<String>,
    /// Symbol → failure cause.
    pub failed: BTreeMap<String, String>,
    pub elapsed_ms: u64,
}

impl ScanResult {
    /// Reduce per-symbol outcomes, in any order, into sorted lists.
    pub fn from_outcomes<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = (String, SymbolOutcome)>,
    {
        let mut result = ScanResult::default();
        for (symbol, outcome) in outcomes {
            match outcome {
                SymbolOutcome::Classified { classification } => {
                    match classification {
                        Classification::Buy => result.buyable.push(symbol.clone()),
                        Classification::Sell => result.sellable.push(symbol.clone()),
                        Classification::Neutral => {}
                    }
                    result.classifications.insert(symbol, classification);
                }
                SymbolOutcome::Skipped { .. } => result.skipped.push(symbol),
                SymbolOutcome::Failed { reason } => {
                    result.failed.insert(symbol, reason);
                }
            }
        }
        result.buyable.sort();
        result.sellable.sort();
        result.skipped.sort();
        result
    }

    /// Number of symbols that reached any terminal state.
    pub fn total(&self) -> usize {
        self.classifications.len() + self.skipped.len() + self.failed.len()
    }

    pub fn classification(&self, symbol: &str) -> Option<Classification> {
        self.classifications.get(symbol).copied()
    }
}

pub struct ScanPipeline {
    provider: Arc<dyn MarketDataProvider>,
    workers: usize,
    progress: Arc<dyn ScanProgress>,
}

impl ScanPipeline {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            provider,
            workers: 0,
            progress: Arc::new(NoProgress),
        }
    }

    /// Fixed worker count; 0 sizes the pool to the available parallelism.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ScanProgress>) -> Self {
        self.progress = progress;
        self
    }

    pub fn worker_count(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }

    /// Scan every symbol of `universe` and reduce to a [`ScanResult`].
    ///
    /// Only an invalid config or a pool that cannot start is an error; an
    /// empty universe gives an empty result.
    pub fn scan(
        &self,
        universe: &SymbolUniverse,
        config: &ScanConfig,
        window: &FetchWindow,
    ) -> Result<ScanResult, ScanError> {
        config.validate()?;

        let started = Instant::now();
        let total = universe.len();
        self.progress.on_start(total);

        if universe.is_empty() {
            info!("empty universe, nothing to scan");
            let result = ScanResult::default();
            self.progress.on_finish(&result);
            return Ok(result);
        }

        let workers = self.worker_count().min(total);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("sigscan-worker-{i}"))
            .build()
            .map_err(|e| ScanError::ThreadPool(e.to_string()))?;
        info!(
            symbols = total,
            workers,
            provider = self.provider.name(),
            "dispatching scan"
        );

        let completed = AtomicUsize::new(0);
        let outcomes: Vec<(String, SymbolOutcome)> = pool.install(|| {
            universe
                .as_slice()
                .par_iter()
                .map(|symbol| {
                    let outcome = self.scan_symbol(symbol, config, window);
                    let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    self.progress.on_symbol(symbol, &outcome, done, total);
                    (symbol.clone(), outcome)
                })
                .collect()
        });

        let mut result = ScanResult::from_outcomes(outcomes);
        result.elapsed_ms = started.elapsed().as_millis() as u64;
        self.progress.on_finish(&result);
        Ok(result)
    }

    /// Run one symbol through fetch and classification.
    pub fn scan_symbol(
        &self,
        symbol: &str,
        config: &ScanConfig,
        window: &FetchWindow,
    ) -> SymbolOutcome {
        debug!(symbol, state = %SymbolState::Pending, "symbol dispatched");
        debug!(symbol, state = %SymbolState::Fetching, "state change");
        let series = match self.provider.fetch_series(symbol, window) {
            Ok(series) => series,
            Err(e) => {
                warn!(symbol, error = %e, "fetch failed");
                return SymbolOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        debug!(symbol, state = %SymbolState::Computing, bars = series.len(), "state change");
        match classify(&series, config) {
            Ok(classification) => {
                debug!(symbol, state = %SymbolState::Classified, %classification, "state change");
                SymbolOutcome::Classified { classification }
            }
            Err(SignalError::InsufficientData { bars, required }) => {
                debug!(
                    symbol,
                    state = %SymbolState::Skipped,
                    bars,
                    required,
                    "insufficient history"
                );
                SymbolOutcome::Skipped { bars, required }
            }
            Err(e) => {
                warn!(symbol, error = %e, "classification failed");
                SymbolOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
