//! Trailing simple moving average over an arbitrary series.
//!
//! SMA[t] = mean(x[t-period+1..=t]). Defined from index period-1; any NaN in
//! the window makes that entry NaN.

/// SMA of `values` over a trailing window of `period` entries.
pub fn sma_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n < period {
        return result;
    }

    for i in (period - 1)..n {
        let window = &values[i + 1 - period..=i];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        result[i] = window.iter().sum::<f64>() / period as f64;
    }

    result
}
