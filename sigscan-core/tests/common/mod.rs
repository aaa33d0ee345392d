//! Shared bar builders for integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use sigscan_core::domain::{Bar, Series};

/// Bars from adjusted closes and volumes. open = previous close,
/// high/low = max/min(open, close) ± 1.0.
pub fn bars_from(closes: &[f64], volumes: &[u64]) -> Vec<Bar> {
    let base_date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (&close, &volume))| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                adj_close: close,
                volume,
            }
        })
        .collect()
}

pub fn series_from(closes: &[f64]) -> Series {
    let volumes = vec![1_000; closes.len()];
    Series::new("TEST", bars_from(closes, &volumes)).unwrap()
}

/// Deterministic pseudo-random walk with varying volume.
pub fn walk_series(n: usize) -> Series {
    let mut price: f64 = 100.0;
    let mut closes = Vec::with_capacity(n);
    let mut volumes = Vec::with_capacity(n);
    for i in 0..n {
        let seed = (i as u64).wrapping_mul(6364136223846793005).wrapping_add(1);
        price = (price + ((seed % 200) as f64 - 100.0) * 0.05).max(10.0);
        closes.push(price);
        volumes.push(500 + (seed >> 33) % 2_000);
    }
    Series::new("WALK", bars_from(&closes, &volumes)).unwrap()
}
