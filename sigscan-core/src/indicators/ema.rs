//! Exponential moving average over an arbitrary series.
//!
//! EMA[t] = EMA[t-1] + alpha * (x[t] - EMA[t-1]), alpha = 2 / (span + 1).
//! Seeded with the first defined value, no bias adjustment, so the output is
//! defined from the first non-NaN input onward. A NaN input after the seed
//! yields NaN at that index and leaves the running average untouched.

/// EMA of `values` with the given span.
pub fn ema_of_series(values: &[f64], span: usize) -> Vec<f64> {
    let mut result = vec![f64::NAN; values.len()];
    if span == 0 {
        return result;
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut prev: Option<f64> = None;

    for (out, &v) in result.iter_mut().zip(values) {
        if v.is_nan() {
            continue;
        }
        let ema = match prev {
            None => v,
            Some(p) => p + alpha * (v - p),
        };
        *out = ema;
        prev = Some(ema);
    }

    result
}
