//! Look-ahead contamination tests.
//!
//! Compute on a truncated series and on the full series; the shared prefix
//! must be identical. Any difference means a value at bar t read bar t+1.

mod common;

use common::walk_series;
use sigscan_core::components::indicator::Indicator;
use sigscan_core::domain::{Bar, Series};
use sigscan_core::indicators::{Kdj, Macd, Rsi, VolumeRatio};
use sigscan_core::{classify_series, RuleStyle, ScanPreset};

fn same(a: f64, b: f64) -> bool {
    (a.is_nan() && b.is_nan()) || a == b
}

fn assert_no_lookahead(indicator: &dyn Indicator, bars: &[Bar], cut: usize) {
    let full = indicator.compute(bars);
    let truncated = indicator.compute(&bars[..cut]);
    for (name, short) in truncated.iter() {
        assert_eq!(short.len(), cut, "{}: {name} length", indicator.name());
        let long = full.get_series(name).unwrap();
        assert_eq!(long.len(), bars.len());
        for i in 0..cut {
            assert!(
                same(short[i], long[i]),
                "{}: {name} differs at {i}: {} vs {}",
                indicator.name(),
                short[i],
                long[i]
            );
        }
    }
}

#[test]
fn indicators_do_not_look_ahead() {
    let series = walk_series(200);
    let indicators: Vec<Box<dyn Indicator>> = vec![
        Box::new(Rsi::new(14)),
        Box::new(Macd::new(12, 26, 9)),
        Box::new(Kdj::new(9, 3, 3)),
        Box::new(VolumeRatio::new(20)),
    ];
    for ind in &indicators {
        for cut in [1, 20, 100, 199] {
            assert_no_lookahead(ind.as_ref(), series.bars(), cut);
        }
    }
}

#[test]
fn classifications_do_not_look_ahead() {
    let series = walk_series(200);
    let truncated = Series::new("WALK", series.bars()[..120].to_vec()).unwrap();
    for preset in ScanPreset::all() {
        for style in [RuleStyle::Strict, RuleStyle::Simple] {
            let mut config = preset.to_config();
            config.rule_style = style;
            let full = classify_series(&series, &config).unwrap();
            let short = classify_series(&truncated, &config).unwrap();
            assert_eq!(&full[..120], &short[..], "{} {style:?}", preset.name());
        }
    }
}
