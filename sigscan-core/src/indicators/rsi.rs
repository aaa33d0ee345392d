//! Relative Strength Index (RSI) on adjusted close.
//!
//! gains/losses = max(±delta, 0); averages are simple moving averages over
//! `period` deltas. RSI = 100 - 100 / (1 + avg_gain / avg_loss).
//! Lookback: period (the first delta exists at index 1).
//! Edge case: avg_loss == 0 → RSI = 100, including a flat series.

use crate::components::indicator::{keys, Indicator, IndicatorOutput};
use crate::domain::Bar;

use super::sma::sma_of_series;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }

    /// RSI series alone, without the output container.
    pub fn values(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut gains = vec![f64::NAN; n];
        let mut losses = vec![f64::NAN; n];
        for i in 1..n {
            let delta = bars[i].adj_close - bars[i - 1].adj_close;
            if delta.is_nan() {
                continue;
            }
            gains[i] = delta.max(0.0);
            losses[i] = (-delta).max(0.0);
        }

        let avg_gain = sma_of_series(&gains, self.period);
        let avg_loss = sma_of_series(&losses, self.period);

        avg_gain
            .iter()
            .zip(&avg_loss)
            .map(|(&g, &l)| rsi_from_averages(g, l))
            .collect()
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> IndicatorOutput {
        let mut out = IndicatorOutput::new();
        out.insert(keys::RSI, self.values(bars));
        out
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_gain.is_nan() || avg_loss.is_nan() {
        f64::NAN
    } else if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
