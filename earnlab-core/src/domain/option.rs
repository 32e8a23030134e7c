//! Option contract identity and the chain universe filter.

use super::ids::SymbolId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Option right (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionRight {
    Call,
    Put,
}

impl OptionRight {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Call => "C",
            Self::Put => "P",
        }
    }
}

/// A single listed option contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionContract {
    pub underlying: SymbolId,
    pub right: OptionRight,
    pub strike: f64,
    pub expiry: NaiveDate,
}

impl OptionContract {
    pub fn new(underlying: SymbolId, right: OptionRight, strike: f64, expiry: NaiveDate) -> Self {
        Self { underlying, right, strike, expiry }
    }

    /// Calendar days from `today` to expiry (negative once expired).
    pub fn days_to_expiry(&self, today: NaiveDate) -> i64 {
        (self.expiry - today).num_days()
    }
}

impl fmt::Display for OptionContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}{:.2}",
            self.underlying,
            self.expiry.format("%Y%m%d"),
            self.right.as_str(),
            self.strike
        )
    }
}

/// Chain filter registered with an option subscription.
///
/// Strike bounds are counted in listed strikes relative to the at-the-money
/// strike (the strike closest to the underlying price); `-1..=1` keeps the
/// ATM strike and one on either side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainFilter {
    pub min_strike_rank: i32,
    pub max_strike_rank: i32,
    pub max_expiry_days: i64,
}

impl Default for ChainFilter {
    fn default() -> Self {
        Self {
            min_strike_rank: -1,
            max_strike_rank: 1,
            max_expiry_days: 30,
        }
    }
}

impl ChainFilter {
    /// Apply the filter to a raw chain.
    ///
    /// Returns nothing when the underlying price is not positive, since the
    /// ATM strike is undefined.
    pub fn apply(
        &self,
        chain: &[OptionContract],
        underlying_price: f64,
        today: NaiveDate,
    ) -> Vec<OptionContract> {
        if !(underlying_price.is_finite() && underlying_price > 0.0) {
            return Vec::new();
        }

        let in_expiry: Vec<&OptionContract> = chain
            .iter()
            .filter(|c| {
                let dte = c.days_to_expiry(today);
                dte >= 0 && dte <= self.max_expiry_days
            })
            .collect();

        let mut strikes: Vec<f64> = in_expiry
            .iter()
            .map(|c| c.strike)
            .filter(|s| s.is_finite())
            .collect();
        strikes.sort_by(|a, b| a.total_cmp(b));
        strikes.dedup();

        let Some(atm) = strikes
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                (*a - underlying_price)
                    .abs()
                    .total_cmp(&(*b - underlying_price).abs())
            })
            .map(|(i, _)| i as i64)
        else {
            return Vec::new();
        };

        let lo = (atm + self.min_strike_rank as i64).max(0) as usize;
        let hi = (atm + self.max_strike_rank as i64).min(strikes.len() as i64 - 1);
        if hi < lo as i64 {
            return Vec::new();
        }
        let allowed = &strikes[lo..=hi as usize];

        in_expiry
            .into_iter()
            .filter(|c| allowed.contains(&c.strike))
            .cloned()
            .collect()
    }
}
