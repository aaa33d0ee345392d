//! Discrete per-index trading classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a rule or of the combiner at one time index.
///
/// `Neutral` is the absence of a signal; a single value can never be both
/// Buy and Sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Buy,
    Sell,
    #[default]
    Neutral,
}

impl Classification {
    /// Build from two predicates. Buy wins when both hold.
    pub fn from_predicates(buy: bool, sell: bool) -> Self {
        if buy {
            Classification::Buy
        } else if sell {
            Classification::Sell
        } else {
            Classification::Neutral
        }
    }

    pub fn is_buy(self) -> bool {
        self == Classification::Buy
    }

    pub fn is_sell(self) -> bool {
        self == Classification::Sell
    }

    pub fn is_neutral(self) -> bool {
        self == Classification::Neutral
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Classification::Buy => "buy",
            Classification::Sell => "sell",
            Classification::Neutral => "neutral",
        };
        f.write_str(s)
    }
}
