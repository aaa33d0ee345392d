//! Volume anomaly rule: heavy volume buys, dried-up volume sells.

use crate::components::indicator::{keys, IndicatorOutput};
use crate::components::rule::{Predicates, SignalRule};
#[derive(Debug, Clone)]
pub struct VolumeLevel {
    buy: f64,
    sell: f64,
}

impl VolumeLevel {
    pub fn new(buy: f64, sell: f64) -> Self {
        Self { buy, sell }
    }
}

impl SignalRule for VolumeLevel {
    fn name(&self) -> &str {
        "volume_level"
    }

    fn predicates(&self, indicators: &IndicatorOutput, index: usize) -> Predicates {
        match indicators.defined(keys::VOLUME_RATIO, index) {
            Some(ratio) => Predicates::new(ratio > self.buy, ratio < self.sell),
            None => Predicates::default(),
        }
    }
}
