//! Offline provider: one CSV file per symbol in a directory.
//!
//! Files are named `<SYMBOL>.csv` and use Yahoo's download columns:
//! `Date,Open,High,Low,Close,Adj Close,Volume`. Rows with a missing or
//! `null` price, or with high/low not bounding open and close, are skipped;
//! rows may appear in any order.

use chrono::NaiveDate;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::debug;

use super::provider::{DataError, FetchWindow, MarketDataProvider};
use crate::domain::{Bar, Series};

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Open", deserialize_with = "csv::invalid_option")]
    open: Option<f64>,
    #[serde(rename = "High", deserialize_with = "csv::invalid_option")]
    high: Option<f64>,
    #[serde(rename = "Low", deserialize_with = "csv::invalid_option")]
    low: Option<f64>,
    #[serde(rename = "Close", deserialize_with = "csv::invalid_option")]
    close: Option<f64>,
    #[serde(
        rename = "Adj Close",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    adj_close: Option<f64>,
    #[serde(rename = "Volume", deserialize_with = "csv::invalid_option")]
    volume: Option<f64>,
}

impl CsvRow {
    /// `None` for rows with a missing price or an inconsistent OHLC range.
    fn into_bar(self) -> Option<Bar> {
        let close = self.close?;
        let bar = Bar {
            date: self.date,
            open: self.open?,
            high: self.high?,
            low: self.low?,
            close,
            adj_close: self.adj_close.unwrap_or(close),
            volume: self.volume.map(|v| v.max(0.0) as u64).unwrap_or(0),
        };
        Some(bar).filter(Bar::is_sane)
    }
}

/// Reads `<dir>/<SYMBOL>.csv` per fetch.
#[derive(Debug, Clone)]
pub struct CsvDirProvider {
    dir: PathBuf,
}

impl CsvDirProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }
}

/// Parse Yahoo-format CSV text into date-sorted bars inside `window`.
pub fn parse_bars_csv(
    reader: impl std::io::Read,
    window: &FetchWindow,
) -> Result<Vec<Bar>, DataError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut bars = Vec::new();
    for result in csv_reader.deserialize() {
        let row: CsvRow = result.map_err(|e| DataError::Parse(e.to_string()))?;
        if !window.contains(row.date) {
            continue;
        }
        if let Some(bar) = row.into_bar() {
            bars.push(bar);
        }
    }
    bars.sort_by_key(|b| b.date);
    Ok(bars)
}

impl MarketDataProvider for CsvDirProvider {
    fn name(&self) -> &str {
        "csv_dir"
    }

    fn fetch_series(&self, symbol: &str, window: &FetchWindow) -> Result<Series, DataError> {
        let path = self.path_for(symbol);
        if !path.exists() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        let file = std::fs::File::open(&path)?;
        let bars = parse_bars_csv(file, window)?;
        debug!(symbol, path = %path.display(), bars = bars.len(), "loaded csv");
        Ok(Series::new(symbol, bars)?)
    }
}
