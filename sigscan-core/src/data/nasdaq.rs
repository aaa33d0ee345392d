//! NASDAQ Trader symbol directory (`nasdaqtraded.txt`).
//!
//! Pipe-delimited listing of every exchange-traded US security, ending with a
//! `File Creation Time` trailer row. Kept: ETF = N, Test Issue = N and a
//! Financial Status other than D (deficient).

use std::time::Duration;
use tracing::debug;

use super::provider::DataError;
use super::universe::{SymbolUniverse, UniverseSource};

pub const NASDAQ_TRADED_URL: &str = "https://www.nasdaqtrader.com/dynamic/SymDir/nasdaqtraded.txt";

const COL_SYMBOL: &str = "Symbol";
const COL_ETF: &str = "ETF";
const COL_TEST_ISSUE: &str = "Test Issue";
const COL_FINANCIAL_STATUS: &str = "Financial Status";

/// Universe source over the NASDAQ Trader directory file.
pub struct NasdaqTradedSource {
    client: reqwest::blocking::Client,
    url: String,
}

impl NasdaqTradedSource {
    pub fn new() -> Result<Self, DataError> {
        Self::with_url(NASDAQ_TRADED_URL)
    }

    pub fn with_url(url: impl Into<String>) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl UniverseSource for NasdaqTradedSource {
    fn name(&self) -> &str {
        "nasdaq_traded"
    }

    fn list_symbols(&self) -> Result<SymbolUniverse, DataError> {
        debug!(url = %self.url, "fetching symbol directory");
        let resp = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(DataError::Other(format!("HTTP {status} for {}", self.url)));
        }
        let text = resp
            .text()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;
        parse_nasdaq_traded(&text)
    }
}

/// Parse and filter the directory text.
pub fn parse_nasdaq_traded(text: &str) -> Result<SymbolUniverse, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'|')
        .flexible(true)
        .quoting(false)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| DataError::Parse(e.to_string()))?
        .clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| DataError::ResponseFormatChanged(format!("missing column '{name}'")))
    };
    let symbol_col = column(COL_SYMBOL)?;
    let etf_col = column(COL_ETF)?;
    let test_col = column(COL_TEST_ISSUE)?;
    let status_col = column(COL_FINANCIAL_STATUS)?;

    let mut symbols = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| DataError::Parse(e.to_string()))?;
        let field = |i: usize| record.get(i).map(str::trim).unwrap_or("");

        let symbol = field(symbol_col);
        if symbol.is_empty() || field(0).starts_with("File Creation Time") {
            continue;
        }
        let common = field(etf_col) == "N";
        let live = field(test_col) == "N";
        let sound = field(status_col) != "D";
        if common && live && sound {
            symbols.push(symbol.to_string());
        }
    }

    debug!(count = symbols.len(), "parsed symbol directory");
    Ok(SymbolUniverse::new(symbols))
}
