//! Volume ratio: today's volume relative to its trailing average.
//!
//! ratio[t] = volume[t] / mean(volume[t-n+1..=t]).
//! Lookback: n. The first `n` indices are undefined.
//! Edge case: a zero average volume gives NaN (no vote).

use crate::components::indicator::{keys, Indicator, IndicatorOutput};
use crate::domain::Bar;

use super::sma::sma_of_series;

#[derive(Debug, Clone)]
pub struct VolumeRatio {
    n: usize,
    name: String,
}

impl VolumeRatio {
    pub fn new(n: usize) -> Self {
        assert!(n >= 1, "volume ratio window must be >= 1");
        Self {
            n,
            name: format!("volume_ratio_{n}"),
        }
    }
}

impl Indicator for VolumeRatio {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.n
    }

    fn compute(&self, bars: &[Bar]) -> IndicatorOutput {
        let volumes: Vec<f64> = bars.iter().map(|b| b.volume as f64).collect();
        let avg = sma_of_series(&volumes, self.n);

        let ratio = volumes
            .iter()
            .zip(&avg)
            .enumerate()
            .map(|(i, (&v, &a))| {
                if i < self.n || a.is_nan() || a == 0.0 {
                    f64::NAN
                } else {
                    v / a
                }
            })
            .collect();

        let mut out = IndicatorOutput::new();
        out.insert(keys::VOLUME_RATIO, ratio);
        out
    }
}
