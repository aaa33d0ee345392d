//! Run configuration file (TOML).
//!
//! ```toml
//! preset = "combination"
//! workers = 0            # 0 = one per CPU
//! max_symbols = 200
//!
//! [options]              # numeric overrides, applied last
//! rsiBuy = 25
//!
//! [universe]
//! kind = "nasdaq"
//!
//! [provider]
//! kind = "yahoo"
//!
//! [fetch]
//! kind = "range"
//! start = "2023-01-01"
//! end = "2024-01-01"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use sigscan_core::data::{
    CsvDirProvider, DataError, FetchWindow, FixedUniverseSource, MarketDataProvider,
    MembershipFileSource, NasdaqTradedSource, UniverseSource, YahooProvider,
};
use sigscan_core::{ConfigError, ScanConfig, ScanPreset};

use crate::universe::RetryPolicy;

#[derive(Debug, Error)]
pub enum RunConfigError {
    #[error("read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse config file: {0}")]
    Parse(String),

    #[error(transparent)]
    Scan(#[from] ConfigError),
}

/// Where the symbol universe comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum UniverseConfig {
    /// NASDAQ Trader directory, optionally from a mirror URL.
    Nasdaq {
        #[serde(default)]
        url: Option<String>,
    },
    /// Index membership TOML file, optionally limited to some sectors.
    File {
        path: PathBuf,
        #[serde(default)]
        sectors: Vec<String>,
    },
    /// Explicit ticker list.
    List { symbols: Vec<String> },
}

impl Default for UniverseConfig {
    fn default() -> Self {
        UniverseConfig::Nasdaq { url: None }
    }
}

impl UniverseConfig {
    pub fn build(&self) -> Result<Box<dyn UniverseSource>, DataError> {
        Ok(match self {
            UniverseConfig::Nasdaq { url: None } => Box::new(NasdaqTradedSource::new()?),
            UniverseConfig::Nasdaq { url: Some(url) } => {
                Box::new(NasdaqTradedSource::with_url(url.clone())?)
            }
            UniverseConfig::File { path, sectors } => {
                Box::new(MembershipFileSource::new(path).with_sectors(sectors.clone()))
            }
            UniverseConfig::List { symbols } => Box::new(FixedUniverseSource::new(symbols)),
        })
    }
}

/// Where bars come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProviderConfig {
    Yahoo {
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
    Csv { dir: PathBuf },
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig::Yahoo {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProviderConfig {
    pub fn build(&self) -> Result<Arc<dyn MarketDataProvider>, DataError> {
        Ok(match self {
            ProviderConfig::Yahoo { timeout_secs } => Arc::new(YahooProvider::with_timeout(
                Duration::from_secs(*timeout_secs),
            )?),
            ProviderConfig::Csv { dir } => Arc::new(CsvDirProvider::new(dir)),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub attempts: u32,
    pub delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            attempts: policy.max_attempts,
            delay_secs: policy.delay.as_secs(),
        }
    }
}

/// Everything needed to reproduce one scan run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Starting point for the scan config; `scan` replaces it when present.
    pub preset: Option<ScanPreset>,
    pub scan: Option<ScanConfig>,
    /// Named numeric options (`rsiBuy`, `enableVol`, ...) applied last.
    pub options: BTreeMap<String, f64>,
    pub universe: UniverseConfig,
    pub provider: ProviderConfig,
    pub fetch: FetchWindow,
    pub retry: RetryConfig,
    /// Worker threads; 0 = available parallelism.
    pub workers: usize,
    /// Scan only the first N symbols of the universe.
    pub max_symbols: Option<usize>,
}

impl RunConfig {
    pub fn from_file(path: &Path) -> Result<Self, RunConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, RunConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| RunConfigError::Parse(e.to_string()))?;
        config.scan_config()?;
        Ok(config)
    }

    /// Resolve preset, explicit scan table and options into one validated
    /// `ScanConfig`.
    pub fn scan_config(&self) -> Result<ScanConfig, ConfigError> {
        let mut config = match (&self.scan, self.preset) {
            (Some(scan), _) => scan.clone(),
            (None, Some(preset)) => preset.to_config(),
            (None, None) => ScanConfig::default(),
        };
        for (key, value) in &self.options {
            config = config.with_option(key, *value)?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry.attempts, Duration::from_secs(self.retry.delay_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigscan_core::RuleStyle;

    #[test]
    fn empty_file_uses_defaults() {
        let config = RunConfig::from_toml("").unwrap();
        assert_eq!(config.universe, UniverseConfig::Nasdaq { url: None });
        assert_eq!(config.fetch, FetchWindow::Max);
        assert_eq!(config.workers, 0);
        assert_eq!(config.retry_policy(), RetryPolicy::default());
        assert_eq!(config.scan_config().unwrap(), ScanConfig::default());
    }

    #[test]
    fn preset_and_options() {
        let config = RunConfig::from_toml(
            r#"
            preset = "kdj"
            max_symbols = 200

            [options]
            kdjBuy = 25
            evaluationWindow = 3

            [universe]
            kind = "list"
            symbols = ["AAPL", "MSFT"]

            [provider]
            kind = "csv"
            dir = "data/bars"
            "#,
        )
        .unwrap();
        let scan = config.scan_config().unwrap();
        assert_eq!(scan.rule_style, RuleStyle::Strict);
        assert!(scan.kdj.enabled && !scan.rsi.enabled);
        assert_eq!(scan.kdj.buy, 25.0);
        assert_eq!(scan.evaluation_window, 3);
        assert_eq!(config.max_symbols, Some(200));
        assert_eq!(
            config.provider,
            ProviderConfig::Csv {
                dir: PathBuf::from("data/bars")
            }
        );
    }

    #[test]
    fn explicit_scan_table_wins_over_preset() {
        let config = RunConfig::from_toml(
            r#"
            preset = "rsi"

            [scan]
            rule_style = "simple"

            [scan.volume]
            enabled = false
            "#,
        )
        .unwrap();
        let scan = config.scan_config().unwrap();
        assert_eq!(scan.enabled_count(), 3);
        assert_eq!(scan.min_bars, 60);
    }

    #[test]
    fn unknown_option_rejected() {
        let err = RunConfig::from_toml("[options]\nrsiLength = 10\n").unwrap_err();
        assert!(matches!(err, RunConfigError::Scan(ConfigError::UnknownOption(_))));
    }

    #[test]
    fn list_universe_builds() {
        let cfg = UniverseConfig::List {
            symbols: vec!["B".into(), "A".into(), "B".into()],
        };
        let source = cfg.build().unwrap();
        assert_eq!(source.list_symbols().unwrap().as_slice(), &["B", "A"]);
    }

    #[test]
    fn file_config_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.toml");
        std::fs::write(&path, "workers = 4\n[fetch]\nkind = \"max\"\n").unwrap();
        let config = RunConfig::from_file(&path).unwrap();
        assert_eq!(config.workers, 4);
        assert!(RunConfig::from_file(&dir.path().join("missing.toml")).is_err());
    }
}
