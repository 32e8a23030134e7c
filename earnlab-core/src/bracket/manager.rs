/// Fixed-capacity position bracket
///
/// Each managed symbol moves through `Long → Short → Liquidated`:
/// - entry is long at `+1/capacity` of portfolio value
/// - on or after the switch date it flips to `-1/capacity`
/// - on or after the liquidate date it is closed and dropped
///
/// The scan over managed entries never mutates the container; liquidated
/// entries are compacted in a second pass.
use crate::bracket::intent::BracketIntent;
use crate::domain::{OptionContract, SymbolId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Default bracket capacity.
pub const DEFAULT_CAPACITY: usize = 50;

/// Lifecycle phase of a managed symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Long,
    Short,
    Liquidated,
}

/// A symbol under active management.
#[derive(Debug, Clone, PartialEq)]
pub struct ManagedSymbol {
    pub underlying: SymbolId,
    pub contract: OptionContract,
    pub switch_date: NaiveDate,
    pub liquidate_date: NaiveDate,
    pub phase: Phase,
}

impl ManagedSymbol {
    pub fn new(
        underlying: SymbolId,
        contract: OptionContract,
        switch_date: NaiveDate,
        liquidate_date: NaiveDate,
    ) -> Self {
        Self {
            underlying,
            contract,
            switch_date,
            liquidate_date,
            phase: Phase::Long,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum BracketError {
    #[error("bracket is full ({capacity} slots)")]
    Full { capacity: usize },

    #[error("{symbol} is already managed")]
    AlreadyManaged { symbol: String },

    #[error("{symbol}: liquidate date {liquidate} is not after switch date {switch}")]
    InvertedDates {
        symbol: String,
        switch: NaiveDate,
        liquidate: NaiveDate,
    },
}

/// Ledger of managed symbols with a hard capacity.
#[derive(Debug, Clone)]
pub struct PositionBracket {
    entries: Vec<ManagedSymbol>,
    capacity: usize,
}

impl Default for PositionBracket {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl PositionBracket {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "bracket capacity must be >= 1");
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_capacity(&self) -> bool {
        self.entries.len() < self.capacity
    }

    /// Equal-weight slot size.
    pub fn slot_weight(&self) -> f64 {
        1.0 / self.capacity as f64
    }

    pub fn contains(&self, underlying: &SymbolId) -> bool {
        self.entries.iter().any(|e| &e.underlying == underlying)
    }

    pub fn get(&self, underlying: &SymbolId) -> Option<&ManagedSymbol> {
        self.entries.iter().find(|e| &e.underlying == underlying)
    }

    pub fn entries(&self) -> &[ManagedSymbol] {
        &self.entries
    }

    /// Admit a new entry and return its long entry intent.
    ///
    /// Refused when full, when the underlying is already managed, or when the
    /// liquidate date does not come after the switch date.
    pub fn register(&mut self, entry: ManagedSymbol) -> Result<BracketIntent, BracketError> {
        if !self.has_capacity() {
            return Err(BracketError::Full {
                capacity: self.capacity,
            });
        }
        if self.contains(&entry.underlying) {
            return Err(BracketError::AlreadyManaged {
                symbol: entry.underlying.to_string(),
            });
        }
        if entry.liquidate_date <= entry.switch_date {
            warn!(
                symbol = %entry.underlying,
                switch = %entry.switch_date,
                liquidate = %entry.liquidate_date,
                "refusing entry with inverted bracket dates"
            );
            return Err(BracketError::InvertedDates {
                symbol: entry.underlying.to_string(),
                switch: entry.switch_date,
                liquidate: entry.liquidate_date,
            });
        }

        info!(
            symbol = %entry.underlying,
            contract = %entry.contract,
            switch = %entry.switch_date,
            liquidate = %entry.liquidate_date,
            "bracket entry"
        );
        let intent = BracketIntent::SetHoldings {
            underlying: entry.underlying.clone(),
            contract: entry.contract.clone(),
            weight: self.slot_weight(),
        };
        self.entries.push(entry);
        Ok(intent)
    }

    /// Advance every entry to `today` and return the resulting intents.
    ///
    /// An entry whose switch date was missed is still flipped short before it
    /// is liquidated, so both intents may be emitted on the same bar.
    pub fn on_bar(&mut self, today: NaiveDate) -> Vec<BracketIntent> {
        let weight = self.slot_weight();
        let mut intents = Vec::new();

        for entry in self.entries.iter_mut() {
            if entry.phase == Phase::Long && today >= entry.switch_date {
                entry.phase = Phase::Short;
                info!(symbol = %entry.underlying, %today, "bracket switch to short");
                intents.push(BracketIntent::SetHoldings {
                    underlying: entry.underlying.clone(),
                    contract: entry.contract.clone(),
                    weight: -weight,
                });
            }
            if entry.phase == Phase::Short && today >= entry.liquidate_date {
                entry.phase = Phase::Liquidated;
                info!(symbol = %entry.underlying, %today, "bracket liquidate");
                intents.push(BracketIntent::Liquidate {
                    underlying: entry.underlying.clone(),
                    contract: entry.contract.clone(),
                });
            }
        }

        self.entries.retain(|e| e.phase != Phase::Liquidated);
        intents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OptionRight;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn entry(ticker: &str, switch: NaiveDate, liquidate: NaiveDate) -> ManagedSymbol {
        let underlying = SymbolId::usa(ticker);
        let contract =
            OptionContract::new(underlying.clone(), OptionRight::Call, 100.0, d(2024, 2, 16));
        ManagedSymbol::new(underlying, contract, switch, liquidate)
    }

    #[test]
    fn register_returns_long_entry_intent() {
        let mut bracket = PositionBracket::default();
        let intent = bracket
            .register(entry("AAPL", d(2024, 1, 16), d(2024, 1, 23)))
            .unwrap();
        match intent {
            BracketIntent::SetHoldings { weight, .. } => assert!((weight - 0.02).abs() < 1e-12),
            other => panic!("unexpected intent: {other:?}"),
        }
        assert_eq!(bracket.get(&SymbolId::usa("AAPL")).unwrap().phase, Phase::Long);
    }

    #[test]
    fn rejects_duplicates() {
        let mut bracket = PositionBracket::new(2);
        bracket.register(entry("AAPL", d(2024, 1, 16), d(2024, 1, 23))).unwrap();
        let err = bracket
            .register(entry("AAPL", d(2024, 1, 17), d(2024, 1, 24)))
            .unwrap_err();
        assert!(matches!(err, BracketError::AlreadyManaged { .. }));
    }

    #[test]
    fn rejects_when_full() {
        let mut bracket = PositionBracket::new(1);
        bracket.register(entry("AAPL", d(2024, 1, 16), d(2024, 1, 23))).unwrap();
        let err = bracket
            .register(entry("MSFT", d(2024, 1, 16), d(2024, 1, 23)))
            .unwrap_err();
        assert_eq!(err, BracketError::Full { capacity: 1 });
    }

    #[test]
    fn rejects_inverted_dates() {
        let mut bracket = PositionBracket::default();
        let err = bracket
            .register(entry("AAPL", d(2024, 1, 23), d(2024, 1, 16)))
            .unwrap_err();
        assert!(matches!(err, BracketError::InvertedDates { .. }));
        let err = bracket
            .register(entry("AAPL", d(2024, 1, 16), d(2024, 1, 16)))
            .unwrap_err();
        assert!(matches!(err, BracketError::InvertedDates { .. }));
        assert!(bracket.is_empty());
    }

    #[test]
    fn missed_switch_still_passes_through_short() {
        let mut bracket = PositionBracket::default();
        bracket.register(entry("AAPL", d(2024, 1, 16), d(2024, 1, 23))).unwrap();
        let intents = bracket.on_bar(d(2024, 1, 24));
        assert_eq!(intents.len(), 2);
        assert!(matches!(intents[0], BracketIntent::SetHoldings { weight, .. } if weight < 0.0));
        assert!(intents[1].is_liquidation());
        assert!(bracket.is_empty());
    }
}
