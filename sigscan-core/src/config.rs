//! Scan configuration: per-indicator parameters, rule style, evaluation mode.
//!
//! `ScanConfig` is plain data (serde + TOML friendly). Named presets cover the
//! single-indicator scanners and the combination scanner; individual numeric
//! options can be layered on top with [`ScanConfig::with_option`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors, surfaced before any series is touched.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("no indicators enabled")]
    NoIndicatorsEnabled,

    #[error("invalid parameter '{name}': {reason}")]
    InvalidParam { name: &'static str, reason: String },

    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    #[error("parse config: {0}")]
    Parse(String),
}

/// Which rule variant MACD and KDJ use.
///
/// `Strict` fires on the crossover bar only; `Simple` compares levels at the
/// bar. RSI and volume rules are level-based in both styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleStyle {
    Strict,
    #[default]
    Simple,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiParams {
    pub enabled: bool,
    pub period: usize,
    pub buy: f64,
    pub sell: f64,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self {
            enabled: true,
            period: 14,
            buy: 30.0,
            sell: 70.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdParams {
    pub enabled: bool,
    pub short: usize,
    pub long: usize,
    pub signal: usize,
    /// Level-rule thresholds (simple style only).
    pub buy_level: f64,
    pub sell_level: f64,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            enabled: true,
            short: 12,
            long: 26,
            signal: 9,
            buy_level: 0.0,
            sell_level: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdjParams {
    pub enabled: bool,
    pub n: usize,
    pub m1: usize,
    pub m2: usize,
    pub buy: f64,
    pub sell: f64,
}

impl Default for KdjParams {
    fn default() -> Self {
        Self {
            enabled: true,
            n: 9,
            m1: 3,
            m2: 3,
            buy: 20.0,
            sell: 80.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeParams {
    pub enabled: bool,
    pub n: usize,
    pub buy: f64,
    pub sell: f64,
}

impl Default for VolumeParams {
    fn default() -> Self {
        Self {
            enabled: true,
            n: 20,
            buy: 1.5,
            sell: 0.5,
        }
    }
}

/// Immutable scan configuration.
///
/// `evaluation_window` = 1 classifies on the latest bar only; K > 1 reports
/// Buy if any of the last K bars is Buy, else Sell if any is Sell.
/// Series shorter than `min_bars` are skipped rather than classified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub rsi: RsiParams,
    pub macd: MacdParams,
    pub kdj: KdjParams,
    pub volume: VolumeParams,
    pub rule_style: RuleStyle,
    pub evaluation_window: usize,
    pub min_bars: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanPreset::Combination.to_config()
    }
}

impl ScanConfig {
    /// Parse a config from a TOML string. Missing fields take defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn enabled_count(&self) -> usize {
        [
            self.rsi.enabled,
            self.macd.enabled,
            self.kdj.enabled,
            self.volume.enabled,
        ]
        .iter()
        .filter(|&&e| e)
        .count()
    }

    /// Copy of this config with only the named indicators enabled.
    pub fn only(&self, rsi: bool, macd: bool, kdj: bool, volume: bool) -> Self {
        let mut c = self.clone();
        c.rsi.enabled = rsi;
        c.macd.enabled = macd;
        c.kdj.enabled = kdj;
        c.volume.enabled = volume;
        c
    }

    /// Check periods, thresholds and the enabled set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled_count() == 0 {
            return Err(ConfigError::NoIndicatorsEnabled);
        }

        let periods = [
            ("rsi.period", self.rsi.period),
            ("macd.short", self.macd.short),
            ("macd.long", self.macd.long),
            ("macd.signal", self.macd.signal),
            ("kdj.n", self.kdj.n),
            ("kdj.m1", self.kdj.m1),
            ("kdj.m2", self.kdj.m2),
            ("volume.n", self.volume.n),
            ("evaluation_window", self.evaluation_window),
        ];
        for (name, value) in periods {
            if value == 0 {
                return Err(ConfigError::InvalidParam {
                    name,
                    reason: "must be >= 1".into(),
                });
            }
        }

        let thresholds = [
            ("rsi.buy", self.rsi.buy),
            ("rsi.sell", self.rsi.sell),
            ("macd.buy_level", self.macd.buy_level),
            ("macd.sell_level", self.macd.sell_level),
            ("kdj.buy", self.kdj.buy),
            ("kdj.sell", self.kdj.sell),
            ("volume.buy", self.volume.buy),
            ("volume.sell", self.volume.sell),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() {
                return Err(ConfigError::InvalidParam {
                    name,
                    reason: format!("must be finite, got {value}"),
                });
            }
        }

        Ok(())
    }

    /// Apply one named numeric option (e.g. `rsiBuy=25`, `enableVol=0`).
    ///
    /// Integer options reject fractional or negative values; `enable*`
    /// options treat any non-zero value as true.
    pub fn with_option(mut self, key: &str, value: f64) -> Result<Self, ConfigError> {
        match key {
            "rsiPeriod" => self.rsi.period = as_period("rsiPeriod", value)?,
            "rsiBuy" => self.rsi.buy = value,
            "rsiSell" => self.rsi.sell = value,
            "macdShort" => self.macd.short = as_period("macdShort", value)?,
            "macdLong" => self.macd.long = as_period("macdLong", value)?,
            "macdSignal" => self.macd.signal = as_period("macdSignal", value)?,
            "macdBuyLevel" => self.macd.buy_level = value,
            "macdSellLevel" => self.macd.sell_level = value,
            "kdjN" => self.kdj.n = as_period("kdjN", value)?,
            "kdjM1" => self.kdj.m1 = as_period("kdjM1", value)?,
            "kdjM2" => self.kdj.m2 = as_period("kdjM2", value)?,
            "kdjBuy" => self.kdj.buy = value,
            "kdjSell" => self.kdj.sell = value,
            "volN" => self.volume.n = as_period("volN", value)?,
            "volBuy" => self.volume.buy = value,
            "volSell" => self.volume.sell = value,
            "enableRsi" => self.rsi.enabled = value != 0.0,
            "enableMacd" => self.macd.enabled = value != 0.0,
            "enableKdj" => self.kdj.enabled = value != 0.0,
            "enableVol" => self.volume.enabled = value != 0.0,
            "evaluationWindow" => {
                self.evaluation_window = as_period("evaluationWindow", value)?
            }
            other => return Err(ConfigError::UnknownOption(other.to_string())),
        }
        Ok(self)
    }

    /// Apply a `key=value` assignment string.
    pub fn with_assignment(self, assignment: &str) -> Result<Self, ConfigError> {
        let (key, raw) = assignment
            .split_once('=')
            .ok_or_else(|| ConfigError::Parse(format!("expected key=value, got '{assignment}'")))?;
        let value: f64 = raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Parse(format!("'{}' is not a number", raw.trim())))?;
        self.with_option(key.trim(), value)
    }
}

fn as_period(name: &'static str, value: f64) -> Result<usize, ConfigError> {
    if value.fract() != 0.0 || value < 0.0 || !value.is_finite() {
        return Err(ConfigError::InvalidParam {
            name,
            reason: format!("expected a non-negative integer, got {value}"),
        });
    }
    Ok(value as usize)
}

// ─── Presets ────────────────────────────────────────────────────────

/// Named scanner presets.
///
/// The single-indicator presets use strict (crossover) rules and look for
/// any signal in the last five bars, except RSI which reads the latest bar.
/// The combination preset ANDs all four with simple (level) rules on the
/// latest bar and needs more history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanPreset {
    Rsi,
    Macd,
    Kdj,
    Volume,
    Combination,
}

impl ScanPreset {
    pub fn all() -> &'static [ScanPreset] {
        &[
            ScanPreset::Rsi,
            ScanPreset::Macd,
            ScanPreset::Kdj,
            ScanPreset::Volume,
            ScanPreset::Combination,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ScanPreset::Rsi => "rsi",
            ScanPreset::Macd => "macd",
            ScanPreset::Kdj => "kdj",
            ScanPreset::Volume => "volume",
            ScanPreset::Combination => "combination",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        Self::all()
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| ConfigError::UnknownPreset(name.to_string()))
    }

    pub fn to_config(&self) -> ScanConfig {
        let base = ScanConfig {
            rsi: RsiParams::default(),
            macd: MacdParams::default(),
            kdj: KdjParams::default(),
            volume: VolumeParams::default(),
            rule_style: RuleStyle::Strict,
            evaluation_window: 5,
            min_bars: 30,
        };
        match self {
            ScanPreset::Rsi => ScanConfig {
                evaluation_window: 1,
                ..base.only(true, false, false, false)
            },
            ScanPreset::Macd => base.only(false, true, false, false),
            ScanPreset::Kdj => base.only(false, false, true, false),
            ScanPreset::Volume => base.only(false, false, false, true),
            ScanPreset::Combination => ScanConfig {
                rule_style: RuleStyle::Simple,
                evaluation_window: 1,
                min_bars: 60,
                ..base
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_presets_validate() {
        for preset in ScanPreset::all() {
            let config = preset.to_config();
            config.validate().unwrap_or_else(|e| panic!("{}: {e}", preset.name()));
        }
    }

    #[test]
    fn single_presets_enable_one() {
        for preset in &ScanPreset::all()[..4] {
            let config = preset.to_config();
            assert_eq!(config.enabled_count(), 1, "{}", preset.name());
            assert_eq!(config.rule_style, RuleStyle::Strict);
            assert_eq!(config.min_bars, 30);
        }
        assert_eq!(ScanPreset::Rsi.to_config().evaluation_window, 1);
        assert_eq!(ScanPreset::Kdj.to_config().evaluation_window, 5);
    }

    #[test]
    fn combination_preset_defaults() {
        let c = ScanConfig::default();
        assert_eq!(c.enabled_count(), 4);
        assert_eq!(c.rule_style, RuleStyle::Simple);
        assert_eq!(c.evaluation_window, 1);
        assert_eq!(c.min_bars, 60);
        assert_eq!(c.rsi.period, 14);
        assert_eq!(c.macd.long, 26);
        assert_eq!(c.kdj.sell, 80.0);
        assert_eq!(c.volume.buy, 1.5);
    }

    #[test]
    fn preset_from_name() {
        assert_eq!(ScanPreset::from_name("MACD").unwrap(), ScanPreset::Macd);
        assert!(matches!(
            ScanPreset::from_name("bollinger"),
            Err(ConfigError::UnknownPreset(_))
        ));
    }

    #[test]
    fn no_indicators_rejected() {
        let c = ScanConfig::default().only(false, false, false, false);
        assert_eq!(c.validate(), Err(ConfigError::NoIndicatorsEnabled));
    }

    #[test]
    fn zero_period_rejected() {
        let mut c = ScanConfig::default();
        c.kdj.m1 = 0;
        assert!(matches!(
            c.validate(),
            Err(ConfigError::InvalidParam { name: "kdj.m1", .. })
        ));
    }

    #[test]
    fn options_map_to_fields() {
        let c = ScanConfig::default()
            .with_option("rsiBuy", 25.0)
            .and_then(|c| c.with_option("macdShort", 8.0))
            .and_then(|c| c.with_option("enableVol", 0.0))
            .and_then(|c| c.with_assignment("evaluationWindow = 3"))
            .unwrap();
        assert_eq!(c.rsi.buy, 25.0);
        assert_eq!(c.macd.short, 8);
        assert!(!c.volume.enabled);
        assert_eq!(c.evaluation_window, 3);
    }

    #[test]
    fn bad_options_rejected() {
        let c = ScanConfig::default();
        assert!(matches!(
            c.clone().with_option("rsiLength", 10.0),
            Err(ConfigError::UnknownOption(_))
        ));
        assert!(c.clone().with_option("kdjN", 2.5).is_err());
        assert!(c.with_assignment("rsiBuy").is_err());
    }

    #[test]
    fn toml_partial_override() {
        let c = ScanConfig::from_toml(
            r#"
            rule_style = "strict"
            evaluation_window = 5

            [rsi]
            buy = 25.0

            [volume]
            enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(c.rule_style, RuleStyle::Strict);
        assert_eq!(c.rsi.buy, 25.0);
        assert_eq!(c.rsi.period, 14);
        assert!(!c.volume.enabled);
        assert!(c.kdj.enabled);
    }
}
