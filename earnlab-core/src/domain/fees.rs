//! Leverage and fee settings attached to every security the strategy adds.

use serde::{Deserialize, Serialize};

/// Fee model charged as a fraction of traded notional.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentageFee {
    pub rate: f64,
}

impl PercentageFee {
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }

    /// Fee for a fill of `quantity` units at `price` (sign of quantity ignored).
    pub fn fee(&self, price: f64, quantity: f64) -> f64 {
        price * quantity.abs() * self.rate
    }
}

/// Models the host attaches to a newly added security.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SecurityModels {
    pub leverage: f64,
    pub fee: PercentageFee,
}

impl Default for SecurityModels {
    fn default() -> Self {
        Self {
            leverage: 5.0,
            fee: PercentageFee::new(0.00005),
        }
    }
}
