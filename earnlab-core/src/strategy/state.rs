//! Explicit strategy state, owned by the strategy and passed to no one else.

use crate::bracket::PositionBracket;
use crate::domain::SymbolId;
use crate::indicators::TrackerBook;
use crate::options::OptionContractSelector;
use crate::strategy::config::StrategyConfig;

/// Monthly counter that raises the rebalance flag every `period` events.
///
/// The first monthly event raises it. The flag stays up until consumed by
/// a selection cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct RebalanceClock {
    months_seen: u32,
    period: u32,
    pending: bool,
}

impl RebalanceClock {
    pub fn new(period: u32) -> Self {
        assert!(period >= 1, "rebalance period must be >= 1");
        Self {
            months_seen: 0,
            period,
            pending: false,
        }
    }

    /// Record a monthly event; returns whether it raised the flag.
    pub fn on_month_start(&mut self) -> bool {
        let fires = self.months_seen % self.period == 0;
        self.months_seen = self.months_seen.wrapping_add(1);
        if fires {
            self.pending = true;
        }
        fires
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Consume the flag.
    pub fn take(&mut self) -> bool {
        std::mem::replace(&mut self.pending, false)
    }

    pub fn months_seen(&self) -> u32 {
        self.months_seen
    }
}

/// Mutable state of one strategy instance.
#[derive(Debug, Clone)]
pub struct StrategyState {
    /// Rolling windows, one per symbol ever selected as a candidate
    pub trackers: TrackerBook,
    /// Current top-quantile selection
    pub selected: Vec<SymbolId>,
    pub bracket: PositionBracket,
    pub options: OptionContractSelector,
    pub rebalance: RebalanceClock,
}

impl StrategyState {
    pub fn new(config: &StrategyConfig) -> Self {
        Self {
            trackers: TrackerBook::new(config.window_len),
            selected: Vec::new(),
            bracket: PositionBracket::new(config.bracket_capacity),
            options: OptionContractSelector::new(config.chain_filter.clone(), config.option_right),
            rebalance: RebalanceClock::new(config.rebalance_months),
        }
    }

    pub fn is_selected(&self, symbol: &SymbolId) -> bool {
        self.selected.contains(symbol)
    }
}
