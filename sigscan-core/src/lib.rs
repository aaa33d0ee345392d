//! SigScan core: bar series, indicator library, signal rules, combiner and
//! the data-source collaborators the scan pipeline depends on.
//!
//! The signal engine is a pure function of a [`domain::Series`] and a
//! [`config::ScanConfig`]: indicators are computed once per series, each
//! enabled rule votes per index, and the combiner folds the votes into a
//! single [`domain::Classification`].

pub mod classify;
pub mod combiner;
pub mod components;
pub mod config;
pub mod data;
pub mod domain;
pub mod indicators;
pub mod rules;

pub use classify::{classify, classify_series, SignalError};
pub use combiner::{evaluate_window, CombinedVote, SignalCombiner};
pub use config::{ConfigError, RuleStyle, ScanConfig, ScanPreset};
pub use domain::{Bar, Classification, Series, SeriesError};
