//! Option contract selection for an upcoming announcement date.

use crate::data::OptionChainProvider;
use crate::domain::{ChainFilter, OptionContract, OptionRight, SymbolId};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::debug;

/// Picks the nearest-expiring contract at or after a target date.
///
/// Subscriptions are registered lazily, once per underlying, and never
/// removed.
#[derive(Debug, Clone)]
pub struct OptionContractSelector {
    filter: ChainFilter,
    right: OptionRight,
    subscribed: HashSet<SymbolId>,
}

impl OptionContractSelector {
    pub fn new(filter: ChainFilter, right: OptionRight) -> Self {
        Self {
            filter,
            right,
            subscribed: HashSet::new(),
        }
    }

    pub fn is_subscribed(&self, underlying: &SymbolId) -> bool {
        self.subscribed.contains(underlying)
    }

    pub fn subscription_count(&self) -> usize {
        self.subscribed.len()
    }

    /// Subscribe `underlying` with the chain filter if not done already.
    pub fn ensure_subscribed(&mut self, underlying: &SymbolId, chain: &mut dyn OptionChainProvider) {
        if self.subscribed.insert(underlying.clone()) {
            debug!(%underlying, "registering option subscription");
            chain.subscribe(underlying, &self.filter);
        }
    }

    /// Earliest-expiring contract with `expiry >= target`, or `None`.
    ///
    /// Among contracts sharing that expiry the strike nearest the underlying
    /// price wins; remaining ties go to the lower strike.
    pub fn select(
        &mut self,
        underlying: &SymbolId,
        underlying_price: f64,
        target: NaiveDate,
        today: NaiveDate,
        chain: &mut dyn OptionChainProvider,
    ) -> Option<OptionContract> {
        self.ensure_subscribed(underlying, chain);

        let listed = chain.chain(underlying, today);
        let candidates = self.filter.apply(&listed, underlying_price, today);

        candidates
            .into_iter()
            .filter(|c| c.right == self.right && c.expiry >= target)
            .min_by(|a, b| {
                a.expiry
                    .cmp(&b.expiry)
                    .then_with(|| {
                        let da = (a.strike - underlying_price).abs();
                        let db = (b.strike - underlying_price).abs();
                        da.partial_cmp(&db).unwrap_or(Ordering::Equal)
                    })
                    .then_with(|| a.strike.total_cmp(&b.strike))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingChain {
        contracts: Vec<OptionContract>,
        subscribe_calls: Vec<SymbolId>,
    }

    impl OptionChainProvider for RecordingChain {
        fn subscribe(&mut self, underlying: &SymbolId, _filter: &ChainFilter) {
            self.subscribe_calls.push(underlying.clone());
        }

        fn chain(&self, underlying: &SymbolId, _today: NaiveDate) -> Vec<OptionContract> {
            self.contracts
                .iter()
                .filter(|c| &c.underlying == underlying)
                .cloned()
                .collect()
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn contract(right: OptionRight, strike: f64, expiry: NaiveDate) -> OptionContract {
        OptionContract::new(SymbolId::usa("AAPL"), right, strike, expiry)
    }

    #[test]
    fn picks_earliest_expiry_on_or_after_target() {
        let mut chain = RecordingChain {
            contracts: vec![
                contract(OptionRight::Call, 100.0, d(2024, 1, 12)),
                contract(OptionRight::Call, 100.0, d(2024, 1, 26)),
                contract(OptionRight::Call, 100.0, d(2024, 1, 19)),
            ],
            ..Default::default()
        };
        let mut selector = OptionContractSelector::new(ChainFilter::default(), OptionRight::Call);
        let picked = selector
            .select(&SymbolId::usa("AAPL"), 100.0, d(2024, 1, 15), d(2024, 1, 8), &mut chain)
            .unwrap();
        assert_eq!(picked.expiry, d(2024, 1, 19));
    }

    #[test]
    fn expiry_on_target_qualifies() {
        let mut chain = RecordingChain {
            contracts: vec![contract(OptionRight::Call, 100.0, d(2024, 1, 19))],
            ..Default::default()
        };
        let mut selector = OptionContractSelector::new(ChainFilter::default(), OptionRight::Call);
        let picked = selector.select(&SymbolId::usa("AAPL"), 100.0, d(2024, 1, 19), d(2024, 1, 12), &mut chain);
        assert!(picked.is_some());
    }

    #[test]
    fn none_when_everything_expires_before_target() {
        let mut chain = RecordingChain {
            contracts: vec![contract(OptionRight::Call, 100.0, d(2024, 1, 12))],
            ..Default::default()
        };
        let mut selector = OptionContractSelector::new(ChainFilter::default(), OptionRight::Call);
        let picked = selector.select(&SymbolId::usa("AAPL"), 100.0, d(2024, 1, 15), d(2024, 1, 8), &mut chain);
        assert!(picked.is_none());
    }

    #[test]
    fn ignores_other_right_and_prefers_atm() {
        let exp = d(2024, 1, 19);
        let mut chain = RecordingChain {
            contracts: vec![
                contract(OptionRight::Put, 100.0, exp),
                contract(OptionRight::Call, 95.0, exp),
                contract(OptionRight::Call, 100.0, exp),
                contract(OptionRight::Call, 105.0, exp),
            ],
            ..Default::default()
        };
        let mut selector = OptionContractSelector::new(ChainFilter::default(), OptionRight::Call);
        let picked = selector
            .select(&SymbolId::usa("AAPL"), 101.0, d(2024, 1, 15), d(2024, 1, 8), &mut chain)
            .unwrap();
        assert_eq!(picked.right, OptionRight::Call);
        assert_eq!(picked.strike, 100.0);
    }

    #[test]
    fn subscribes_once_per_underlying() {
        let mut chain = RecordingChain::default();
        let mut selector = OptionContractSelector::new(ChainFilter::default(), OptionRight::Call);
        let aapl = SymbolId::usa("AAPL");
        selector.select(&aapl, 100.0, d(2024, 1, 15), d(2024, 1, 8), &mut chain);
        selector.select(&aapl, 100.0, d(2024, 1, 16), d(2024, 1, 9), &mut chain);
        assert_eq!(chain.subscribe_calls, vec![aapl.clone()]);
        assert!(selector.is_subscribed(&aapl));
        assert_eq!(selector.subscription_count(), 1);
    }
}
