//! Symbol universes and the sources that produce them.
//!
//! A `SymbolUniverse` is an ordered, de-duplicated ticker list. Sources are
//! collaborators: each one fetches a listing and filters it down to common,
//! non-deficient, non-test issues before handing it over.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use super::provider::DataError;

/// Ordered set of tickers. Cloning shares the underlying list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolUniverse {
    symbols: Arc<[String]>,
}

impl SymbolUniverse {
    /// Build from tickers, trimming whitespace and dropping blanks and
    /// repeats. First occurrence wins the position.
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let list: Vec<String> = symbols
            .into_iter()
            .filter_map(|s| {
                let t = s.as_ref().trim();
                (!t.is_empty() && seen.insert(t.to_string())).then(|| t.to_string())
            })
            .collect();
        Self {
            symbols: list.into(),
        }
    }

    pub fn empty() -> Self {
        Self {
            symbols: Vec::new().into(),
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.symbols
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(|s| s.as_str())
    }

    /// The first `n` symbols, in order.
    pub fn take(&self, n: usize) -> Self {
        if n >= self.len() {
            return self.clone();
        }
        Self {
            symbols: self.symbols[..n].to_vec().into(),
        }
    }
}

impl Default for SymbolUniverse {
    fn default() -> Self {
        Self::empty()
    }
}

/// Trait for universe listings (exchange directory, index membership file).
pub trait UniverseSource: Send + Sync {
    /// Stable identity, used in logs.
    fn name(&self) -> &str;

    /// Fetch and filter the listing.
    fn list_symbols(&self) -> Result<SymbolUniverse, DataError>;
}

/// In-memory list, for explicit `--symbols` runs and tests.
#[derive(Debug, Clone)]
pub struct FixedUniverseSource {
    universe: SymbolUniverse,
}

impl FixedUniverseSource {
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            universe: SymbolUniverse::new(symbols),
        }
    }
}

impl UniverseSource for FixedUniverseSource {
    fn name(&self) -> &str {
        "fixed"
    }

    fn list_symbols(&self) -> Result<SymbolUniverse, DataError> {
        Ok(self.universe.clone())
    }
}

// ─── Index membership file ─────────────────────────────────────────

/// Index membership grouped by sector, stored as TOML:
///
/// ```toml
/// [sectors]
/// Technology = ["AAPL", "MSFT"]
/// Energy = ["XOM"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Membership {
    pub sectors: BTreeMap<String, Vec<String>>,
}

impl Membership {
    pub fn from_toml(content: &str) -> Result<Self, DataError> {
        toml::from_str(content).map_err(|e| DataError::Parse(format!("membership TOML: {e}")))
    }

    /// All tickers, sectors in name order.
    pub fn universe(&self) -> SymbolUniverse {
        SymbolUniverse::new(self.sectors.values().flatten())
    }

    /// Tickers of the named sectors only.
    pub fn universe_of(&self, sectors: &[String]) -> SymbolUniverse {
        SymbolUniverse::new(
            sectors
                .iter()
                .filter_map(|s| self.sectors.get(s))
                .flatten(),
        )
    }
}

/// Reads a [`Membership`] file on each fetch, optionally limited to sectors.
#[derive(Debug, Clone)]
pub struct MembershipFileSource {
    path: PathBuf,
    sectors: Vec<String>,
    name: String,
}

impl MembershipFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = format!("membership:{}", path.display());
        Self {
            path,
            sectors: Vec::new(),
            name,
        }
    }

    pub fn with_sectors(mut self, sectors: Vec<String>) -> Self {
        self.sectors = sectors;
        self
    }
}

impl UniverseSource for MembershipFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn list_symbols(&self) -> Result<SymbolUniverse, DataError> {
        let content = std::fs::read_to_string(&self.path)?;
        let membership = Membership::from_toml(&content)?;
        if self.sectors.is_empty() {
            Ok(membership.universe())
        } else {
            Ok(membership.universe_of(&self.sectors))
        }
    }
}
