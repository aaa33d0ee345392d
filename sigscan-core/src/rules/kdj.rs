//! KDJ rules.
//!
//! - `KdjCrossover` (strict): K crosses D on this bar, confirmed by J past
//!   the threshold (J > buy for a golden cross, J < sell for a dead cross).
//! - `KdjLevel` (simple): K and J beyond the threshold with K on the same
//!   side of D.

use crate::components::indicator::{keys, IndicatorOutput};
use crate::components::rule::{
    crossed_above, crossed_below, pair_with_prev, Predicates, SignalRule,
};
#[derive(Debug, Clone)]
pub struct KdjCrossover {
    buy: f64,
    sell: f64,
}

impl KdjCrossover {
    pub fn new(buy: f64, sell: f64) -> Self {
        Self { buy, sell }
    }
}

impl SignalRule for KdjCrossover {
    fn name(&self) -> &str {
        "kdj_crossover"
    }

    fn predicates(&self, indicators: &IndicatorOutput, index: usize) -> Predicates {
        let Some((prev, cur)) = pair_with_prev(indicators, keys::KDJ_K, keys::KDJ_D, index) else {
            return Predicates::default();
        };
        let Some(j) = indicators.defined(keys::KDJ_J, index) else {
            return Predicates::default();
        };
        Predicates::new(
            crossed_above(prev, cur) && j > self.buy,
            crossed_below(prev, cur) && j < self.sell,
        )
    }
}

#[derive(Debug, Clone)]
pub struct KdjLevel {
    buy: f64,
    sell: f64,
}

impl KdjLevel {
    pub fn new(buy: f64, sell: f64) -> Self {
        Self { buy, sell }
    }
}

impl SignalRule for KdjLevel {
    fn name(&self) -> &str {
        "kdj_level"
    }

    fn predicates(&self, indicators: &IndicatorOutput, index: usize) -> Predicates {
        let (Some(k), Some(d), Some(j)) = (
            indicators.defined(keys::KDJ_K, index),
            indicators.defined(keys::KDJ_D, index),
            indicators.defined(keys::KDJ_J, index),
        ) else {
            return Predicates::default();
        };
        Predicates::new(
            k > self.buy && k > d && j > self.buy,
            k < self.sell && k < d && j < self.sell,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Classification;
    use crate::rules::output_of;

    fn kdj(k: Vec<f64>, d: Vec<f64>, j: Vec<f64>) -> IndicatorOutput {
        output_of(&[(keys::KDJ_K, k), (keys::KDJ_D, d), (keys::KDJ_J, j)])
    }

    #[test]
    fn golden_cross_needs_j_confirmation() {
        let rule = KdjCrossover::new(20.0, 80.0);
        let confirmed = kdj(vec![10.0, 30.0], vec![15.0, 25.0], vec![0.0, 40.0]);
        assert_eq!(rule.evaluate(&confirmed, 1), Classification::Buy);

        let weak = kdj(vec![10.0, 30.0], vec![15.0, 25.0], vec![0.0, 15.0]);
        assert_eq!(rule.evaluate(&weak, 1), Classification::Neutral);
    }

    #[test]
    fn dead_cross_needs_j_below_sell() {
        let rule = KdjCrossover::new(20.0, 80.0);
        let out = kdj(vec![90.0, 70.0], vec![85.0, 75.0], vec![100.0, 60.0]);
        assert_eq!(rule.evaluate(&out, 1), Classification::Sell);
        assert_eq!(rule.evaluate(&out, 0), Classification::Neutral);
    }

    #[test]
    fn level_rule() {
        let rule = KdjLevel::new(20.0, 80.0);
        let out = kdj(
            vec![50.0, 50.0, 50.0],
            vec![40.0, 60.0, 50.0],
            vec![70.0, 30.0, 50.0],
        );
        // mid-range K: the side of D decides
        assert_eq!(rule.evaluate(&out, 0), Classification::Buy);
        assert_eq!(rule.evaluate(&out, 1), Classification::Sell);
        assert_eq!(rule.evaluate(&out, 2), Classification::Neutral);
    }
}
