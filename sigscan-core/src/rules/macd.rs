//! MACD rules.
//!
//! - `MacdCrossover` (strict): MACD crosses its signal line on this bar.
//! - `MacdLevel` (simple): MACD is beyond a level and on the same side of
//!   its signal line.

use crate::components::indicator::{keys, IndicatorOutput};
use crate::components::rule::{
    crossed_above, crossed_below, pair_with_prev, Predicates, SignalRule,
};
#[derive(Debug, Clone, Default)]
pub struct MacdCrossover;

impl MacdCrossover {
    pub fn new() -> Self {
        Self
    }
}

impl SignalRule for MacdCrossover {
    fn name(&self) -> &str {
        "macd_crossover"
    }

    fn predicates(&self, indicators: &IndicatorOutput, index: usize) -> Predicates {
        match pair_with_prev(indicators, keys::MACD, keys::MACD_SIGNAL, index) {
            Some((prev, cur)) => {
                Predicates::new(crossed_above(prev, cur), crossed_below(prev, cur))
            }
            None => Predicates::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MacdLevel {
    buy_level: f64,
    sell_level: f64,
}

impl MacdLevel {
    pub fn new(buy_level: f64, sell_level: f64) -> Self {
        Self {
            buy_level,
            sell_level,
        }
    }
}

impl SignalRule for MacdLevel {
    fn name(&self) -> &str {
        "macd_level"
    }

    fn predicates(&self, indicators: &IndicatorOutput, index: usize) -> Predicates {
        let (Some(macd), Some(signal)) = (
            indicators.defined(keys::MACD, index),
            indicators.defined(keys::MACD_SIGNAL, index),
        ) else {
            return Predicates::default();
        };
        Predicates::new(
            macd > self.buy_level && macd > signal,
            macd < self.sell_level && macd < signal,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Classification;
    use crate::rules::output_of;

    fn lines(macd: Vec<f64>, signal: Vec<f64>) -> IndicatorOutput {
        output_of(&[(keys::MACD, macd), (keys::MACD_SIGNAL, signal)])
    }

    #[test]
    fn crossover_fires_only_on_cross_bar() {
        let out = lines(vec![-1.0, 0.0, 1.0, 2.0, 0.5], vec![0.0, 0.0, 0.5, 1.0, 1.0]);
        let rule = MacdCrossover::new();
        assert_eq!(rule.evaluate(&out, 0), Classification::Neutral);
        assert_eq!(rule.evaluate(&out, 1), Classification::Neutral);
        assert_eq!(rule.evaluate(&out, 2), Classification::Buy);
        assert_eq!(rule.evaluate(&out, 3), Classification::Neutral);
        assert_eq!(rule.evaluate(&out, 4), Classification::Sell);
    }

    #[test]
    fn crossover_from_touch_counts() {
        let out = lines(vec![1.0, 0.5], vec![1.0, 1.0]);
        assert_eq!(MacdCrossover::new().evaluate(&out, 1), Classification::Sell);
    }

    #[test]
    fn level_rule_needs_both_conditions() {
        let out = lines(vec![0.5, 0.5, -0.5, -0.5], vec![0.2, 0.8, -0.8, -0.2]);
        let rule = MacdLevel::new(0.0, 0.0);
        assert_eq!(rule.evaluate(&out, 0), Classification::Buy);
        assert_eq!(rule.evaluate(&out, 1), Classification::Neutral);
        assert_eq!(rule.evaluate(&out, 2), Classification::Neutral);
        assert_eq!(rule.evaluate(&out, 3), Classification::Sell);
    }

    #[test]
    fn undefined_votes_neutral() {
        let out = lines(vec![f64::NAN, 1.0], vec![0.0, f64::NAN]);
        assert_eq!(MacdLevel::new(0.0, 0.0).evaluate(&out, 0), Classification::Neutral);
        assert_eq!(MacdCrossover::new().evaluate(&out, 1), Classification::Neutral);
    }
}
