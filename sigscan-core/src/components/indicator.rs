//! Indicator trait and the named-series output container.
//!
//! Indicators are pure functions: bar history in, one or more numeric series
//! out. Every output series is aligned index-for-index with the input bars.

use crate::domain::Bar;
use std::collections::BTreeMap;

/// Series names produced by the built-in indicators.
pub mod keys {
    pub const RSI: &str = "rsi";
    pub const MACD: &str = "macd";
    pub const MACD_SIGNAL: &str = "macd_signal";
    pub const MACD_HIST: &str = "macd_hist";
    pub const KDJ_K: &str = "kdj_k";
    pub const KDJ_D: &str = "kdj_d";
    pub const KDJ_J: &str = "kdj_j";
    pub const VOLUME_RATIO: &str = "volume_ratio";
}

/// Trait for indicators.
///
/// `compute` must return series of exactly `bars.len()` entries; entries
/// before enough history accumulates are `f64::NAN`.
///
/// # Look-ahead guard
/// No value at index t may depend on bars after t. Every indicator must give
/// the same prefix on a truncated series as on the full one.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "rsi_14", "macd_12_26_9").
    fn name(&self) -> &str;

    /// Number of leading indices that are undefined.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    fn compute(&self, bars: &[Bar]) -> IndicatorOutput;
}

/// Named indicator series, all the same length as the input bars.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorOutput {
    series: BTreeMap<String, Vec<f64>>,
}

impl IndicatorOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a named series, replacing any previous one with that name.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.series.insert(name.into(), values);
    }

    /// Value of `name` at `index`. `None` when the series or index is missing.
    pub fn get(&self, name: &str, index: usize) -> Option<f64> {
        self.series.get(name).and_then(|v| v.get(index).copied())
    }

    /// Like [`get`](Self::get) but also maps NaN (warm-up) to `None`.
    pub fn defined(&self, name: &str, index: usize) -> Option<f64> {
        self.get(name, index).filter(|v| !v.is_nan())
    }

    pub fn get_series(&self, name: &str) -> Option<&[f64]> {
        self.series.get(name).map(|v| v.as_slice())
    }

    /// Move all series from `other` into `self`.
    pub fn merge(&mut self, other: IndicatorOutput) {
        self.series.extend(other.series);
    }

    /// Iterate `(name, series)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.series.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of series stored.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Run every indicator over `bars` and merge their outputs.
pub fn compute_all(indicators: &[Box<dyn Indicator>], bars: &[Bar]) -> IndicatorOutput {
    let mut out = IndicatorOutput::new();
    for ind in indicators {
        out.merge(ind.compute(bars));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let mut out = IndicatorOutput::new();
        out.insert(keys::RSI, vec![f64::NAN, 40.0, 55.0]);
        assert!(out.get(keys::RSI, 0).unwrap().is_nan());
        assert_eq!(out.defined(keys::RSI, 0), None);
        assert_eq!(out.get(keys::RSI, 2), Some(55.0));
        assert_eq!(out.get(keys::RSI, 3), None);
        assert_eq!(out.get("missing", 0), None);
    }

    #[test]
    fn merge_combines_names() {
        let mut a = IndicatorOutput::new();
        a.insert(keys::MACD, vec![1.0]);
        let mut b = IndicatorOutput::new();
        b.insert(keys::MACD_SIGNAL, vec![0.5]);
        a.merge(b);
        assert_eq!(a.len(), 2);
        let names: Vec<&str> = a.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec![keys::MACD, keys::MACD_SIGNAL]);
    }
}
