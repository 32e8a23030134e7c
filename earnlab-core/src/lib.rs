//! EarnLab Core — earnings-window momentum strategy.
//!
//! This crate contains the strategy logic, independent of any hosting
//! platform:
//! - Domain types (symbol ids, option contracts, coarse candidates, fee models)
//! - Rolling momentum trackers
//! - Trading-day arithmetic and the earnings calendar index
//! - Top-quantile universe selection
//! - Option contract selection
//! - Fixed-capacity position bracket (long → short → liquidated)
//! - Host callback handlers over explicit strategy state

pub mod bracket;
pub mod calendar;
pub mod data;
pub mod domain;
pub mod indicators;
pub mod options;
pub mod selection;
pub mod strategy;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: core types are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::SymbolId>();
        require_sync::<domain::SymbolId>();
        require_send::<domain::OptionContract>();
        require_sync::<domain::OptionContract>();
        require_send::<calendar::EarningsCalendar>();
        require_sync::<calendar::EarningsCalendar>();
        require_send::<indicators::TrackerBook>();
        require_sync::<indicators::TrackerBook>();
        require_send::<bracket::PositionBracket>();
        require_sync::<bracket::PositionBracket>();
        require_send::<strategy::StrategyState>();
        require_sync::<strategy::StrategyState>();
        require_send::<strategy::EarningsMomentumStrategy>();
        require_sync::<strategy::EarningsMomentumStrategy>();
    }

    /// Architecture contract: the bracket only sees dates, never the broker.
    #[test]
    fn bracket_on_bar_takes_no_broker() {
        fn _check(
            ledger: &mut bracket::PositionBracket,
            today: chrono::NaiveDate,
        ) -> Vec<bracket::BracketIntent> {
            ledger.on_bar(today)
        }
    }
}
