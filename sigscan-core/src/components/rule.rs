//! Signal rules: per-indicator decision logic.
//!
//! A rule reads precomputed indicator series and votes Buy, Sell or Neutral
//! at one index. Rules never see anything past that index.

use super::indicator::IndicatorOutput;
use crate::domain::Classification;

/// Raw Buy and Sell conditions of one rule at one index.
///
/// Both may hold when thresholds overlap; the combiner ANDs these raw
/// conditions across rules before any tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Predicates {
    pub buy: bool,
    pub sell: bool,
}

impl Predicates {
    pub fn new(buy: bool, sell: bool) -> Self {
        Self { buy, sell }
    }

    /// Collapse to one vote, Buy first.
    pub fn classification(self) -> Classification {
        Classification::from_predicates(self.buy, self.sell)
    }
}

/// Trait for per-indicator signal rules.
///
/// Undefined (NaN) inputs satisfy neither condition.
pub trait SignalRule: Send + Sync {
    /// Rule name (e.g., "macd_crossover").
    fn name(&self) -> &str;

    /// Buy and Sell conditions at `index`, using only values at `index` and
    /// earlier.
    fn predicates(&self, indicators: &IndicatorOutput, index: usize) -> Predicates;

    /// This rule's own vote at `index`. Buy wins when both conditions hold,
    /// so a single vote is never both.
    fn evaluate(&self, indicators: &IndicatorOutput, index: usize) -> Classification {
        self.predicates(indicators, index).classification()
    }
}

/// Current and previous values of two series at `index`, all defined.
pub(crate) fn pair_with_prev(
    indicators: &IndicatorOutput,
    a: &str,
    b: &str,
    index: usize,
) -> Option<((f64, f64), (f64, f64))> {
    let prev = index.checked_sub(1)?;
    let cur = (indicators.defined(a, index)?, indicators.defined(b, index)?);
    let before = (indicators.defined(a, prev)?, indicators.defined(b, prev)?);
    Some((before, cur))
}

/// True if `a` crossed above `b` between `prev` and `cur`.
pub(crate) fn crossed_above(prev: (f64, f64), cur: (f64, f64)) -> bool {
    prev.0 <= prev.1 && cur.0 > cur.1
}

/// True if `a` crossed below `b` between `prev` and `cur`.
pub(crate) fn crossed_below(prev: (f64, f64), cur: (f64, f64)) -> bool {
    prev.0 >= prev.1 && cur.0 < cur.1
}
