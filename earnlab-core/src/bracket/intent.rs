/// Bracket order intents
///
/// The bracket emits *intents* (target weights and liquidations), never
/// orders. The broker seam turns them into host orders.
use crate::domain::{OptionContract, SymbolId};

/// Order intent emitted by the position bracket
#[derive(Debug, Clone, PartialEq)]
pub enum BracketIntent {
    /// Target a signed fraction of portfolio value in the contract
    SetHoldings {
        underlying: SymbolId,
        contract: OptionContract,
        weight: f64,
    },

    /// Close the contract position entirely
    Liquidate {
        underlying: SymbolId,
        contract: OptionContract,
    },
}

impl BracketIntent {
    pub fn underlying(&self) -> &SymbolId {
        match self {
            BracketIntent::SetHoldings { underlying, .. } => underlying,
            BracketIntent::Liquidate { underlying, .. } => underlying,
        }
    }

    pub fn is_liquidation(&self) -> bool {
        matches!(self, BracketIntent::Liquidate { .. })
    }
}
