//! Single-symbol classification.
//!
//! `classify` is the entry point the batch pipeline calls per symbol. It is a
//! pure function of the series and the config: same inputs, same output.

use thiserror::Error;

use crate::combiner::{evaluate_window, SignalCombiner};
use crate::components::factory::build_indicators;
use crate::components::indicator::{compute_all, IndicatorOutput};
use crate::config::{ConfigError, ScanConfig};
use crate::domain::{Classification, Series};

#[derive(Debug, Error)]
pub enum SignalError {
    #[error("insufficient data: {bars} bars, need at least {required}")]
    InsufficientData { bars: usize, required: usize },

    #[error("computation error: {0}")]
    Computation(String),

    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
}

/// Compute every enabled indicator over `series`.
///
/// Fails with `InsufficientData` when the series is shorter than
/// `config.min_bars` (and always when it is empty).
pub fn compute_indicators(
    series: &Series,
    config: &ScanConfig,
) -> Result<IndicatorOutput, SignalError> {
    config.validate()?;

    let required = config.min_bars.max(1);
    if series.len() < required {
        return Err(SignalError::InsufficientData {
            bars: series.len(),
            required,
        });
    }

    let indicators = build_indicators(config)?;
    let output = compute_all(&indicators, series.bars());
    check_output(&output, series.len())?;
    Ok(output)
}

/// Combined classification at every index of `series`.
pub fn classify_series(
    series: &Series,
    config: &ScanConfig,
) -> Result<Vec<Classification>, SignalError> {
    let output = compute_indicators(series, config)?;
    let combiner = SignalCombiner::from_config(config)?;
    Ok((0..series.len())
        .map(|i| combiner.classify_at(&output, i))
        .collect())
}

/// Final classification of `series` under the config's evaluation window.
pub fn classify(series: &Series, config: &ScanConfig) -> Result<Classification, SignalError> {
    let output = compute_indicators(series, config)?;
    let combiner = SignalCombiner::from_config(config)?;

    let start = series.len().saturating_sub(config.evaluation_window);
    let tail: Vec<Classification> = (start..series.len())
        .map(|i| combiner.classify_at(&output, i))
        .collect();
    Ok(evaluate_window(&tail, config.evaluation_window))
}

/// Every series must be input-aligned and free of infinities.
fn check_output(output: &IndicatorOutput, len: usize) -> Result<(), SignalError> {
    for (name, values) in output.iter() {
        if values.len() != len {
            return Err(SignalError::Computation(format!(
                "{name}: {} values for {len} bars",
                values.len()
            )));
        }
        if let Some(i) = values.iter().position(|v| v.is_infinite()) {
            return Err(SignalError::Computation(format!(
                "{name}: non-finite value at index {i}"
            )));
        }
    }
    Ok(())
}
