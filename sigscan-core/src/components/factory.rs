//! Component factory: maps a `ScanConfig` to indicator and rule objects.
//!
//! Only enabled indicators are built. The rule variant for MACD and KDJ is
//! chosen by `rule_style`; RSI and volume have a single variant.

use crate::config::{ConfigError, RuleStyle, ScanConfig};
use crate::indicators::{Kdj, Macd, Rsi, VolumeRatio};
use crate::rules::{KdjCrossover, KdjLevel, MacdCrossover, MacdLevel, RsiLevel, VolumeLevel};

use super::indicator::Indicator;
use super::rule::SignalRule;

/// Build the indicators needed by every enabled rule.
pub fn build_indicators(config: &ScanConfig) -> Result<Vec<Box<dyn Indicator>>, ConfigError> {
    config.validate()?;

    let mut indicators: Vec<Box<dyn Indicator>> = Vec::with_capacity(4);
    if config.rsi.enabled {
        indicators.push(Box::new(Rsi::new(config.rsi.period)));
    }
    if config.macd.enabled {
        let m = &config.macd;
        indicators.push(Box::new(Macd::new(m.short, m.long, m.signal)));
    }
    if config.kdj.enabled {
        let k = &config.kdj;
        indicators.push(Box::new(Kdj::new(k.n, k.m1, k.m2)));
    }
    if config.volume.enabled {
        indicators.push(Box::new(VolumeRatio::new(config.volume.n)));
    }
    Ok(indicators)
}

/// Build one rule per enabled indicator, in RSI, MACD, KDJ, volume order.
pub fn build_rules(config: &ScanConfig) -> Result<Vec<Box<dyn SignalRule>>, ConfigError> {
    config.validate()?;

    let mut rules: Vec<Box<dyn SignalRule>> = Vec::with_capacity(4);
    if config.rsi.enabled {
        rules.push(Box::new(RsiLevel::new(config.rsi.buy, config.rsi.sell)));
    }
    if config.macd.enabled {
        let m = &config.macd;
        let rule: Box<dyn SignalRule> = match config.rule_style {
            RuleStyle::Strict => Box::new(MacdCrossover::new()),
            RuleStyle::Simple => Box::new(MacdLevel::new(m.buy_level, m.sell_level)),
        };
        rules.push(rule);
    }
    if config.kdj.enabled {
        let k = &config.kdj;
        let rule: Box<dyn SignalRule> = match config.rule_style {
            RuleStyle::Strict => Box::new(KdjCrossover::new(k.buy, k.sell)),
            RuleStyle::Simple => Box::new(KdjLevel::new(k.buy, k.sell)),
        };
        rules.push(rule);
    }
    if config.volume.enabled {
        rules.push(Box::new(VolumeLevel::new(config.volume.buy, config.volume.sell)));
    }
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScanPreset;

    fn rule_names(config: &ScanConfig) -> Vec<String> {
        build_rules(config)
            .unwrap()
            .iter()
            .map(|r| r.name().to_string())
            .collect()
    }

    #[test]
    fn simple_style_uses_level_rules() {
        let names = rule_names(&ScanPreset::Combination.to_config());
        assert_eq!(names, vec!["rsi_level", "macd_level", "kdj_level", "volume_level"]);
    }

    #[test]
    fn strict_style_uses_crossovers() {
        let mut config = ScanPreset::Combination.to_config();
        config.rule_style = RuleStyle::Strict;
        let names = rule_names(&config);
        assert_eq!(names[1], "macd_crossover");
        assert_eq!(names[2], "kdj_crossover");
    }

    #[test]
    fn only_enabled_indicators_built() {
        let indicators = build_indicators(&ScanPreset::Kdj.to_config()).unwrap();
        assert_eq!(indicators.len(), 1);
        assert_eq!(indicators[0].name(), "kdj_9_3_3");
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = ScanConfig::default().only(false, false, false, false);
        assert!(build_rules(&config).is_err());
        assert!(build_indicators(&config).is_err());
    }
}
