//! KDJ stochastic oscillator on close/high/low.
//!
//! RSV = (close - lowest_low(n)) / (highest_high(n) - lowest_low(n)) * 100
//! K = EMA(RSV, m1), D = EMA(K, m2), J = 3K - 2D.
//! Lookback: n - 1.
//! Edge case: a zero high-low range gives RSV = 0.

use crate::components::indicator::{keys, Indicator, IndicatorOutput};
use crate::domain::Bar;

use super::ema::ema_of_series;

#[derive(Debug, Clone)]
pub struct Kdj {
    n: usize,
    m1: usize,
    m2: usize,
    name: String,
}

impl Kdj {
    pub fn new(n: usize, m1: usize, m2: usize) -> Self {
        assert!(n >= 1 && m1 >= 1 && m2 >= 1, "KDJ periods must be >= 1");
        Self {
            n,
            m1,
            m2,
            name: format!("kdj_{n}_{m1}_{m2}"),
        }
    }

    fn rsv(&self, bars: &[Bar]) -> Vec<f64> {
        let len = bars.len();
        let mut rsv = vec![f64::NAN; len];
        if len < self.n {
            return rsv;
        }

        for i in (self.n - 1)..len {
            let window = &bars[i + 1 - self.n..=i];
            let mut lowest = f64::INFINITY;
            let mut highest = f64::NEG_INFINITY;
            let mut void = false;
            for bar in window {
                if bar.low.is_nan() || bar.high.is_nan() {
                    void = true;
                    break;
                }
                lowest = lowest.min(bar.low);
                highest = highest.max(bar.high);
            }
            let close = bars[i].close;
            if void || close.is_nan() {
                continue;
            }

            let range = highest - lowest;
            rsv[i] = if range == 0.0 {
                0.0
            } else {
                (close - lowest) / range * 100.0
            };
        }

        rsv
    }
}

impl Indicator for Kdj {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.n - 1
    }

    fn compute(&self, bars: &[Bar]) -> IndicatorOutput {
        let rsv = self.rsv(bars);
        let k = ema_of_series(&rsv, self.m1);
        let d = ema_of_series(&k, self.m2);
        let j: Vec<f64> = k.iter().zip(&d).map(|(k, d)| 3.0 * k - 2.0 * d).collect();

        let mut out = IndicatorOutput::new();
        out.insert(keys::KDJ_K, k);
        out.insert(keys::KDJ_D, d);
        out.insert(keys::KDJ_J, j);
        out
    }
}
