//! Order/holdings seam to the hosting platform.

use crate::bracket::BracketIntent;
use crate::domain::{OptionContract, SecurityModels, SymbolId};

/// Portfolio and order services owned by the host.
///
/// Implementations translate target weights into orders; the strategy never
/// sizes positions itself.
pub trait Broker {
    /// Last tradable price of an equity; `0.0` when unknown.
    fn price(&self, symbol: &SymbolId) -> f64;

    fn is_tradable(&self, symbol: &SymbolId) -> bool;

    /// Whether any holding is open in `symbol` or its options.
    fn is_invested(&self, symbol: &SymbolId) -> bool;

    /// Target a signed fraction of portfolio value in `contract`.
    fn set_holdings(&mut self, contract: &OptionContract, weight: f64);

    fn liquidate(&mut self, contract: &OptionContract);

    /// Attach leverage and fee model to a newly added security.
    fn attach_models(&mut self, symbol: &SymbolId, models: SecurityModels);
}

/// Forward a bracket intent to the broker.
pub fn dispatch(broker: &mut dyn Broker, intent: &BracketIntent) {
    match intent {
        BracketIntent::SetHoldings { contract, weight, .. } => broker.set_holdings(contract, *weight),
        BracketIntent::Liquidate { contract, .. } => broker.liquidate(contract),
    }
}
