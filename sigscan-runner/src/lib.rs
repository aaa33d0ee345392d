//! SigScan runner: symbol-universe caching and the parallel batch scan.
//!
//! The runner owns everything with a lifecycle: the per-run universe cache,
//! the worker pool, progress reporting and the run configuration file.
//! Signal semantics live in `sigscan-core`.

pub mod config;
pub mod pipeline;
pub mod progress;
pub mod universe;

pub use config::{ProviderConfig, RunConfig, RunConfigError, UniverseConfig};
pub use pipeline::{ScanError, ScanPipeline, ScanResult, SymbolOutcome, SymbolState};
pub use progress::{LogProgress, NoProgress, ScanProgress};
pub use universe::{RetryPolicy, UniverseProvider};
