//! Market-data provider trait and structured error types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Series, SeriesError};

/// Errors from fetching bars or universes. All are transient from the
/// scanner's point of view: a symbol that fails is dropped for this run.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid series: {0}")]
    Series(#[from] SeriesError),

    #[error("data error: {0}")]
    Other(String),
}

/// How much history to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FetchWindow {
    /// Everything the provider has.
    #[default]
    Max,
    /// Inclusive date range.
    Range { start: NaiveDate, end: NaiveDate },
}

impl FetchWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        match self {
            FetchWindow::Max => true,
            FetchWindow::Range { start, end } => *start <= date && date <= *end,
        }
    }
}

/// Trait for market-data providers (Yahoo chart API, CSV directory, mocks).
///
/// One call, one attempt: providers do not retry per-symbol fetches.
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the date-ascending daily series for `symbol`.
    fn fetch_series(&self, symbol: &str, window: &FetchWindow) -> Result<Series, DataError>;
}
