//! Moving Average Convergence Divergence (MACD) on adjusted close.
//!
//! MACD = EMA(price, short) - EMA(price, long); signal = EMA(MACD, signal).
//! The histogram (MACD - signal) is emitted as a convenience series.
//! Lookback: 0. EMAs seed on the first bar, so early values are defined but
//! low-confidence.

use crate::components::indicator::{keys, Indicator, IndicatorOutput};
use crate::domain::Bar;

use super::ema::ema_of_series;

#[derive(Debug, Clone)]
pub struct Macd {
    short: usize,
    long: usize,
    signal: usize,
    name: String,
}

impl Macd {
    pub fn new(short: usize, long: usize, signal: usize) -> Self {
        assert!(
            short >= 1 && long >= 1 && signal >= 1,
            "MACD spans must be >= 1"
        );
        Self {
            short,
            long,
            signal,
            name: format!("macd_{short}_{long}_{signal}"),
        }
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[Bar]) -> IndicatorOutput {
        let prices: Vec<f64> = bars.iter().map(|b| b.adj_close).collect();
        let fast = ema_of_series(&prices, self.short);
        let slow = ema_of_series(&prices, self.long);

        let macd: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = ema_of_series(&macd, self.signal);
        let hist: Vec<f64> = macd.iter().zip(&signal).map(|(m, s)| m - s).collect();

        let mut out = IndicatorOutput::new();
        out.insert(keys::MACD, macd);
        out.insert(keys::MACD_SIGNAL, signal);
        out.insert(keys::MACD_HIST, hist);
        out
    }
}
