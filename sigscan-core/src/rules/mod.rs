//! Per-indicator signal rules in two styles.
//!
//! Strict rules fire on the bar where one line crosses another; simple rules
//! compare levels at the bar. RSI and volume rules are level-based in both
//! styles. `components::factory::build_rules` picks the variants.

pub mod kdj;
pub mod macd;
pub mod rsi;
pub mod volume;

pub use kdj::{KdjCrossover, KdjLevel};
pub use macd::{MacdCrossover, MacdLevel};
pub use rsi::RsiLevel;
pub use volume::VolumeLevel;

#[cfg(test)]
pub(crate) fn output_of(pairs: &[(&str, Vec<f64>)]) -> crate::components::IndicatorOutput {
    let mut out = crate::components::IndicatorOutput::new();
    for (name, values) in pairs {
        out.insert(*name, values.clone());
    }
    out
}
