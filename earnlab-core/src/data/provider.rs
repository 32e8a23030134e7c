//! Host data seams and structured error types.
//!
//! The `HistoryProvider` and `OptionChainProvider` traits abstract over the
//! platform that owns market data, so the strategy can be driven by a live
//! host, local files, or in-memory fixtures in tests.

use crate::domain::{ChainFilter, OptionContract, SymbolId};
use chrono::NaiveDate;
use thiserror::Error;

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("unexpected HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("insufficient history for {symbol}: needed {needed}, got {got}")]
    InsufficientHistory {
        symbol: String,
        needed: usize,
        got: usize,
    },

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("csv error: {0}")]
    Csv(String),

    #[error("data error: {0}")]
    Other(String),
}

/// Source of historical daily closes.
pub trait HistoryProvider: Send + Sync {
    /// Up to `bars` daily closes for `symbol` dated on or before `end`,
    /// oldest first.
    fn daily_closes(
        &self,
        symbol: &SymbolId,
        bars: usize,
        end: NaiveDate,
    ) -> Result<Vec<f64>, DataError>;
}

/// Option chain enumeration owned by the host.
pub trait OptionChainProvider: Send {
    /// Register an option subscription for `underlying`. Only contracts
    /// passing `filter` need to be returned by later `chain` calls.
    fn subscribe(&mut self, underlying: &SymbolId, filter: &ChainFilter);

    /// Contracts currently listed for `underlying` as of `today`.
    fn chain(&self, underlying: &SymbolId, today: NaiveDate) -> Vec<OptionContract>;
}
