//! Strategy: configuration, explicit state, broker seam and host callbacks

pub mod broker;
pub mod config;
pub mod engine;
pub mod state;

pub use broker::{dispatch, Broker};
pub use config::{ConfigError, StrategyConfig};
pub use engine::EarningsMomentumStrategy;
pub use state::{RebalanceClock, StrategyState};
