//! External data collaborators: market-data providers and symbol-universe
//! sources. Both sit behind traits so the pipeline can be driven by mocks.

pub mod csv_dir;
pub mod nasdaq;
pub mod provider;
pub mod universe;
pub mod yahoo;

pub use csv_dir::CsvDirProvider;
pub use nasdaq::{parse_nasdaq_traded, NasdaqTradedSource};
pub use provider::{DataError, FetchWindow, MarketDataProvider};
pub use universe::{FixedUniverseSource, MembershipFileSource, SymbolUniverse, UniverseSource};
pub use yahoo::YahooProvider;
