//! Data seams, loaders and error types

pub mod csv_history;
pub mod earnings_source;
pub mod provider;

pub use csv_history::CsvHistory;
pub use earnings_source::HttpEarningsSource;
pub use provider::{DataError, HistoryProvider, OptionChainProvider};
