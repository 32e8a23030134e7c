//! Serializable strategy configuration.

use crate::calendar::TradingCalendar;
use crate::domain::{ChainFilter, OptionRight, PercentageFee, SecurityModels};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("parse config TOML: {0}")]
    Parse(String),

    #[error("serialize config: {0}")]
    Serialize(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Every knob of the earnings-window momentum strategy.
///
/// All fields have defaults so a partial TOML file is valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StrategyConfig {
    /// Rolling window length in trading days
    pub window_len: usize,

    /// Quantile divisor: 10 keeps the top decile
    pub quantile: usize,

    /// Minimum candidate price (exclusive)
    pub min_price: f64,

    /// Number of concurrently managed symbols
    pub bracket_capacity: usize,

    /// Business days between the check and the announcement
    pub days_before: u32,

    /// Business days after the announcement to flip short
    pub switch_offset: u32,

    /// Business days after the announcement to liquidate
    pub liquidate_offset: u32,

    /// Monthly events per rebalance
    pub rebalance_months: u32,

    pub option_right: OptionRight,

    pub leverage: f64,

    /// Fee as a fraction of traded notional
    pub fee_rate: f64,

    /// Exchange holidays excluded from business-day arithmetic
    pub holidays: Vec<NaiveDate>,

    /// Kept last: serialized as a TOML table
    pub chain_filter: ChainFilter,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            window_len: 252,
            quantile: 10,
            min_price: 5.0,
            bracket_capacity: 50,
            days_before: 5,
            switch_offset: 1,
            liquidate_offset: 6,
            rebalance_months: 3,
            option_right: OptionRight::Call,
            leverage: 5.0,
            fee_rate: 0.00005,
            holidays: Vec::new(),
            chain_filter: ChainFilter::default(),
        }
    }
}

impl StrategyConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_len < 2 {
            return Err(ConfigError::Invalid("window_len must be >= 2".into()));
        }
        if self.quantile == 0 {
            return Err(ConfigError::Invalid("quantile must be >= 1".into()));
        }
        if self.bracket_capacity == 0 {
            return Err(ConfigError::Invalid("bracket_capacity must be >= 1".into()));
        }
        if self.rebalance_months == 0 {
            return Err(ConfigError::Invalid("rebalance_months must be >= 1".into()));
        }
        if self.liquidate_offset <= self.switch_offset {
            return Err(ConfigError::Invalid(format!(
                "liquidate_offset ({}) must exceed switch_offset ({})",
                self.liquidate_offset, self.switch_offset
            )));
        }
        if self.chain_filter.min_strike_rank > self.chain_filter.max_strike_rank {
            return Err(ConfigError::Invalid(
                "chain_filter.min_strike_rank exceeds max_strike_rank".into(),
            ));
        }
        if self.chain_filter.max_expiry_days < 0 {
            return Err(ConfigError::Invalid("chain_filter.max_expiry_days must be >= 0".into()));
        }
        if !(self.min_price.is_finite() && self.min_price >= 0.0) {
            return Err(ConfigError::Invalid("min_price must be a non-negative number".into()));
        }
        if !(self.leverage.is_finite() && self.leverage > 0.0) {
            return Err(ConfigError::Invalid("leverage must be positive".into()));
        }
        if !(self.fee_rate.is_finite() && self.fee_rate >= 0.0) {
            return Err(ConfigError::Invalid("fee_rate must be non-negative".into()));
        }
        Ok(())
    }

    pub fn trading_calendar(&self) -> TradingCalendar {
        TradingCalendar::with_holidays(self.holidays.iter().copied())
    }

    pub fn security_models(&self) -> SecurityModels {
        SecurityModels {
            leverage: self.leverage,
            fee: PercentageFee::new(self.fee_rate),
        }
    }

    /// Deterministic identifier of this configuration (BLAKE3 of its JSON).
    pub fn config_id(&self) -> Result<String, ConfigError> {
        let json = serde_json::to_string(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        Ok(blake3::hash(json.as_bytes()).to_hex().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = StrategyConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.window_len, 252);
        assert_eq!(config.bracket_capacity, 50);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config = StrategyConfig::from_toml("quantile = 5\nholidays = [\"2024-07-04\"]\n").unwrap();
        assert_eq!(config.quantile, 5);
        assert_eq!(config.days_before, 5);
        assert_eq!(config.holidays, vec![NaiveDate::from_ymd_opt(2024, 7, 4).unwrap()]);
    }

    #[test]
    fn toml_roundtrip() {
        let config = StrategyConfig::default();
        let text = config.to_toml().unwrap();
        assert_eq!(StrategyConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn rejects_inverted_offsets() {
        let err = StrategyConfig::from_toml("switch_offset = 6\nliquidate_offset = 6\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_zero_capacity() {
        let config = StrategyConfig {
            bracket_capacity: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_id_is_deterministic() {
        let a = StrategyConfig::default();
        let b = StrategyConfig::default();
        assert_eq!(a.config_id().unwrap(), b.config_id().unwrap());
        let c = StrategyConfig {
            quantile: 5,
            ..Default::default()
        };
        assert_ne!(a.config_id().unwrap(), c.config_id().unwrap());
    }
}
