//! RSI level rule: oversold buys, overbought sells.

use crate::components::indicator::{keys, IndicatorOutput};
use crate::components::rule::{Predicates, SignalRule};
#[derive(Debug, Clone)]
pub struct RsiLevel {
    buy: f64,
    sell: f64,
}

impl RsiLevel {
    pub fn new(buy: f64, sell: f64) -> Self {
        Self { buy, sell }
    }
}

impl SignalRule for RsiLevel {
    fn name(&self) -> &str {
        "rsi_level"
    }

    fn predicates(&self, indicators: &IndicatorOutput, index: usize) -> Predicates {
        match indicators.defined(keys::RSI, index) {
            Some(rsi) => Predicates::new(rsi < self.buy, rsi > self.sell),
            None => Predicates::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Classification;
    use crate::rules::output_of;

    #[test]
    fn thresholds_are_strict() {
        let out = output_of(&[(keys::RSI, vec![f64::NAN, 29.9, 30.0, 70.0, 70.1])]);
        let rule = RsiLevel::new(30.0, 70.0);
        let votes: Vec<_> = (0..5).map(|i| rule.evaluate(&out, i)).collect();
        assert_eq!(
            votes,
            vec![
                Classification::Neutral,
                Classification::Buy,
                Classification::Neutral,
                Classification::Neutral,
                Classification::Sell,
            ]
        );
    }

    #[test]
    fn overlapping_thresholds_prefer_buy() {
        let out = output_of(&[(keys::RSI, vec![50.0])]);
        let rule = RsiLevel::new(80.0, 20.0);
        assert_eq!(rule.predicates(&out, 0), Predicates::new(true, true));
        assert_eq!(rule.evaluate(&out, 0), Classification::Buy);
    }
}
