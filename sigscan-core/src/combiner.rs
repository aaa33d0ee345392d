//! Signal combiner: folds per-indicator votes into one classification.
//!
//! Buy at index i holds when every enabled rule's raw Buy condition holds;
//! Sell when every raw Sell condition holds. The conditions are ANDed before
//! any per-rule tie-break, so a rule whose thresholds overlap contributes to
//! both sides. Disabled indicators have no rule and so drop out of both
//! conjunctions. Buy wins when both conjunctions hold.

use crate::components::factory::build_rules;
use crate::components::indicator::IndicatorOutput;
use crate::components::rule::{Predicates, SignalRule};
use crate::config::{ConfigError, ScanConfig};
use crate::domain::Classification;

/// The two conjunctions before the tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CombinedVote {
    pub buy: bool,
    pub sell: bool,
}

impl CombinedVote {
    pub fn classification(self) -> Classification {
        Classification::from_predicates(self.buy, self.sell)
    }
}

/// AND-combiner over a set of rules.
pub struct SignalCombiner {
    rules: Vec<Box<dyn SignalRule>>,
}

impl SignalCombiner {
    pub fn new(rules: Vec<Box<dyn SignalRule>>) -> Self {
        Self { rules }
    }

    /// Build the rules for every enabled indicator of `config`.
    pub fn from_config(config: &ScanConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(build_rules(config)?))
    }

    pub fn rules(&self) -> &[Box<dyn SignalRule>] {
        &self.rules
    }

    /// Raw conjunctions at `index`. With no rules neither side holds.
    pub fn vote(&self, indicators: &IndicatorOutput, index: usize) -> CombinedVote {
        if self.rules.is_empty() {
            return CombinedVote::default();
        }
        let mut vote = CombinedVote {
            buy: true,
            sell: true,
        };
        for rule in &self.rules {
            let p = rule.predicates(indicators, index);
            vote.buy &= p.buy;
            vote.sell &= p.sell;
            if !vote.buy && !vote.sell {
                break;
            }
        }
        vote
    }

    pub fn classify_at(&self, indicators: &IndicatorOutput, index: usize) -> Classification {
        self.vote(indicators, index).classification()
    }
}

/// Reduce the tail of a classification series per the evaluation window.
///
/// `window` = 1 returns the last entry. For larger windows any Buy among the
/// last `window` entries wins, then any Sell. Empty input is Neutral.
pub fn evaluate_window(classes: &[Classification], window: usize) -> Classification {
    let start = classes.len().saturating_sub(window.max(1));
    let tail = &classes[start..];
    if tail.iter().any(|c| c.is_buy()) {
        Classification::Buy
    } else if tail.iter().any(|c| c.is_sell()) {
        Classification::Sell
    } else {
        Classification::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Rule that replays a fixed vote sequence.
    struct Scripted(Vec<Classification>);

    impl SignalRule for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn predicates(&self, _indicators: &IndicatorOutput, index: usize) -> Predicates {
            let c = self.0[index];
            Predicates::new(c.is_buy(), c.is_sell())
        }
    }

    /// Rule with fixed raw conditions at every index.
    struct Fixed(Predicates);

    impl SignalRule for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn predicates(&self, _indicators: &IndicatorOutput, _index: usize) -> Predicates {
            self.0
        }
    }

    fn fixed(buy: bool, sell: bool) -> Box<dyn SignalRule> {
        Box::new(Fixed(Predicates::new(buy, sell)))
    }

    use crate::domain::Classification::{Buy, Neutral, Sell};

    fn combiner(scripts: Vec<Vec<Classification>>) -> SignalCombiner {
        SignalCombiner::new(
            scripts
                .into_iter()
                .map(|s| Box::new(Scripted(s)) as Box<dyn SignalRule>)
                .collect(),
        )
    }

    #[test]
    fn all_must_agree() {
        let c = combiner(vec![vec![Buy, Buy, Sell, Sell], vec![Buy, Neutral, Sell, Buy]]);
        let out = IndicatorOutput::new();
        let got: Vec<_> = (0..4).map(|i| c.classify_at(&out, i)).collect();
        assert_eq!(got, vec![Buy, Neutral, Sell, Neutral]);
    }

    #[test]
    fn single_rule_passes_through() {
        let votes = vec![Buy, Sell, Neutral];
        let c = combiner(vec![votes.clone()]);
        let out = IndicatorOutput::new();
        let got: Vec<_> = (0..3).map(|i| c.classify_at(&out, i)).collect();
        assert_eq!(got, votes);
    }

    #[test]
    fn empty_combiner_is_neutral() {
        let c = combiner(Vec::new());
        assert_eq!(c.vote(&IndicatorOutput::new(), 0), CombinedVote::default());
    }

    #[test]
    fn overlapping_rule_counts_on_both_sides() {
        // the first rule votes Buy on its own, yet its Sell condition still
        // completes the Sell conjunction
        let c = SignalCombiner::new(vec![fixed(true, true), fixed(false, true)]);
        let out = IndicatorOutput::new();
        assert_eq!(c.rules()[0].evaluate(&out, 0), Buy);
        assert_eq!(
            c.vote(&out, 0),
            CombinedVote {
                buy: false,
                sell: true
            }
        );
        assert_eq!(c.classify_at(&out, 0), Sell);
    }

    #[test]
    fn both_conjunctions_holding_gives_buy() {
        let c = SignalCombiner::new(vec![fixed(true, true), fixed(true, true)]);
        let out = IndicatorOutput::new();
        assert_eq!(
            c.vote(&out, 0),
            CombinedVote {
                buy: true,
                sell: true
            }
        );
        assert_eq!(c.classify_at(&out, 0), Buy);
    }

    #[test]
    fn tie_break_prefers_buy() {
        let v = CombinedVote {
            buy: true,
            sell: true,
        };
        assert_eq!(v.classification(), Buy);
    }

    #[test]
    fn window_semantics() {
        let series = [Sell, Neutral, Buy, Sell, Neutral];
        assert_eq!(evaluate_window(&series, 1), Neutral);
        assert_eq!(evaluate_window(&series, 2), Sell);
        assert_eq!(evaluate_window(&series, 3), Buy);
        assert_eq!(evaluate_window(&series, 50), Buy);
        assert_eq!(evaluate_window(&[], 5), Neutral);
    }
}
