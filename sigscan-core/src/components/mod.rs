//! Component traits and the factory that assembles them from a `ScanConfig`.

pub mod factory;
pub mod indicator;
pub mod rule;

pub use factory::{build_indicators, build_rules};
pub use indicator::{compute_all, keys, Indicator, IndicatorOutput};
pub use rule::{Predicates, SignalRule};
