//! Series: the ordered bar history of one symbol.

use super::Bar;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("{symbol}: bar dates not strictly ascending at index {index} ({prev} then {date})")]
    OutOfOrder {
        symbol: String,
        index: usize,
        prev: NaiveDate,
        date: NaiveDate,
    },
}

/// Immutable, date-ascending bar history for one symbol.
///
/// Gaps for non-trading days are allowed. Once built there is no way to
/// reorder or modify the bars.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    symbol: String,
    bars: Vec<Bar>,
}

impl Series {
    /// Build a series, rejecting duplicate or descending dates.
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, SeriesError> {
        let symbol = symbol.into();
        for (i, pair) in bars.windows(2).enumerate() {
            if pair[1].date <= pair[0].date {
                return Err(SeriesError::OutOfOrder {
                    symbol,
                    index: i + 1,
                    prev: pair[0].date,
                    date: pair[1].date,
                });
            }
        }
        Ok(Self { symbol, bars })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }
}
