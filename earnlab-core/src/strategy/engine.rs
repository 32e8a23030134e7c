//! Callback handlers driven by the host clock.
//!
//! The host invokes these synchronously, one at a time:
//! - `on_month_start` from a monthly schedule
//! - `on_universe_selection` from the daily universe callback
//! - `on_securities_changed` when constituents are added
//! - `on_pre_earnings_check` from a daily schedule
//! - `on_bar` on every data bar

use crate::bracket::{BracketIntent, ManagedSymbol};
use crate::calendar::{EarningsCalendar, TradingCalendar};
use crate::data::{HistoryProvider, OptionChainProvider};
use crate::domain::{CoarseCandidate, SymbolId};
use crate::selection::{Selection, UniverseSelector};
use crate::strategy::broker::{dispatch, Broker};
use crate::strategy::config::{ConfigError, StrategyConfig};
use crate::strategy::state::StrategyState;
use chrono::NaiveDate;
use tracing::{debug, info, warn};

/// Earnings-window momentum strategy.
#[derive(Debug, Clone)]
pub struct EarningsMomentumStrategy {
    config: StrategyConfig,
    trading_calendar: TradingCalendar,
    earnings: EarningsCalendar,
    selector: UniverseSelector,
    state: StrategyState,
}

impl EarningsMomentumStrategy {
    pub fn new(config: StrategyConfig, earnings: EarningsCalendar) -> Result<Self, ConfigError> {
        config.validate()?;
        let config_id = config.config_id()?;
        info!(
            %config_id,
            announcement_dates = earnings.len(),
            "strategy initialized"
        );
        Ok(Self {
            trading_calendar: config.trading_calendar(),
            selector: UniverseSelector::new(config.quantile, config.min_price),
            state: StrategyState::new(&config),
            earnings,
            config,
        })
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn earnings(&self) -> &EarningsCalendar {
        &self.earnings
    }

    pub fn state(&self) -> &StrategyState {
        &self.state
    }

    pub fn selected(&self) -> &[SymbolId] {
        &self.state.selected
    }

    /// Monthly schedule: raise the rebalance flag every `rebalance_months`.
    pub fn on_month_start(&mut self) -> bool {
        let fired = self.state.rebalance.on_month_start();
        if fired {
            debug!(months = self.state.rebalance.months_seen(), "rebalance flagged");
        }
        fired
    }

    /// Daily universe callback.
    ///
    /// Tracked symbols always receive today's price. When the rebalance flag
    /// is up, a selection cycle runs and replaces the selection; otherwise the
    /// current selection is returned unchanged.
    pub fn on_universe_selection(
        &mut self,
        today: NaiveDate,
        candidates: &[CoarseCandidate],
        history: &dyn HistoryProvider,
    ) -> &[SymbolId] {
        self.selector.refresh(candidates, &mut self.state.trackers);

        if self.state.rebalance.take() {
            let Selection { selected, .. } = self.selector.select(
                today,
                candidates,
                &self.earnings,
                &mut self.state.trackers,
                history,
            );
            self.state.selected = selected;
        }

        &self.state.selected
    }

    /// Constituent-change callback: attach leverage and fee model.
    pub fn on_securities_changed(&self, added: &[SymbolId], broker: &mut dyn Broker) {
        let models = self.config.security_models();
        for symbol in added {
            broker.attach_models(symbol, models);
        }
    }

    /// Daily check `days_before` business days ahead of announcements.
    ///
    /// Returns the symbols newly admitted to the bracket.
    pub fn on_pre_earnings_check(
        &mut self,
        today: NaiveDate,
        chain: &mut dyn OptionChainProvider,
        broker: &mut dyn Broker,
    ) -> Vec<SymbolId> {
        let target = self
            .trading_calendar
            .add_business_days(today, self.config.days_before);
        if !self.earnings.has_entry(target) {
            return Vec::new();
        }

        let switch_date = self
            .trading_calendar
            .add_business_days(target, self.config.switch_offset);
        let liquidate_date = self
            .trading_calendar
            .add_business_days(target, self.config.liquidate_offset);

        let StrategyState {
            selected,
            bracket,
            options,
            ..
        } = &mut self.state;

        let mut admitted = Vec::new();
        for symbol in selected.iter() {
            if !self.earnings.reports_on(symbol.ticker(), target) {
                continue;
            }
            if !bracket.has_capacity() {
                debug!(%symbol, "bracket full, entry refused");
                continue;
            }
            if bracket.contains(symbol) || broker.is_invested(symbol) {
                continue;
            }
            let price = broker.price(symbol);
            if price == 0.0 || !broker.is_tradable(symbol) {
                continue;
            }

            let Some(contract) = options.select(symbol, price, target, today, chain) else {
                info!(%symbol, %target, "no option contract found, skipping");
                continue;
            };

            let entry = ManagedSymbol::new(symbol.clone(), contract, switch_date, liquidate_date);
            match bracket.register(entry) {
                Ok(intent) => {
                    dispatch(broker, &intent);
                    admitted.push(symbol.clone());
                }
                Err(e) => warn!(%symbol, error = %e, "bracket refused entry"),
            }
        }

        admitted
    }

    /// Per-bar position switching and liquidation.
    pub fn on_bar(&mut self, today: NaiveDate, broker: &mut dyn Broker) -> Vec<BracketIntent> {
        let intents = self.state.bracket.on_bar(today);
        for intent in &intents {
            debug!(
                symbol = %intent.underlying(),
                liquidation = intent.is_liquidation(),
                "bracket transition"
            );
            dispatch(broker, intent);
        }
        intents
    }
}
