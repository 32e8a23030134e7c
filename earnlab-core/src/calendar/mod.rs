//! Date handling: trading-day arithmetic and the earnings calendar index

pub mod earnings;
pub mod trading;

pub use earnings::EarningsCalendar;
pub use trading::TradingCalendar;
