use super::ids::SymbolId;
use serde::{Deserialize, Serialize};

/// One row of the daily coarse universe delivered by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoarseCandidate {
    pub symbol: SymbolId,
    pub price: f64,
    pub has_fundamental_data: bool,
}

impl CoarseCandidate {
    pub fn new(symbol: SymbolId, price: f64, has_fundamental_data: bool) -> Self {
        Self { symbol, price, has_fundamental_data }
    }
}
