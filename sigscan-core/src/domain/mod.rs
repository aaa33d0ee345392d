//! Domain types: bars, per-symbol series, classifications.

pub mod bar;
pub mod classification;
pub mod series;

pub use bar::Bar;
pub use classification::Classification;
pub use series::{Series, SeriesError};
