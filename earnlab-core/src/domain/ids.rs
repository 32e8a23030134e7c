use serde::{Deserialize, Serialize};
use std::fmt;

/// Listing market of a security.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Market {
    Usa,
    Other(String),
}

impl Market {
    pub fn is_usa(&self) -> bool {
        matches!(self, Market::Usa)
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Market::Usa => write!(f, "USA"),
            Market::Other(name) => write!(f, "{name}"),
        }
    }
}

/// Strongly-typed security identifier (ticker + listing market).
///
/// Tickers are normalized to upper case so that lookups against the
/// earnings calendar are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolId {
    pub ticker: String,
    pub market: Market,
}

impl SymbolId {
    pub fn new(ticker: impl AsRef<str>, market: Market) -> Self {
        Self {
            ticker: ticker.as_ref().trim().to_ascii_uppercase(),
            market,
        }
    }

    /// Shorthand for a US-listed equity.
    pub fn usa(ticker: impl AsRef<str>) -> Self {
        Self::new(ticker, Market::Usa)
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.market {
            Market::Usa => write!(f, "{}", self.ticker),
            other => write!(f, "{}.{}", self.ticker, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_is_normalized() {
        let id = SymbolId::usa(" aapl ");
        assert_eq!(id.ticker(), "AAPL");
        assert_eq!(id, SymbolId::usa("AAPL"));
    }

    #[test]
    fn display_includes_market_outside_usa() {
        assert_eq!(SymbolId::usa("MSFT").to_string(), "MSFT");
        let id = SymbolId::new("VOD", Market::Other("LSE".into()));
        assert_eq!(id.to_string(), "VOD.LSE");
        assert!(!id.market.is_usa());
    }
}
