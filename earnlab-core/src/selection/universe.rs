//! Universe selection: earnings-gated liquid US names, ranked by trailing
//! momentum, top quantile retained.

use crate::calendar::EarningsCalendar;
use crate::data::{DataError, HistoryProvider};
use crate::domain::{CoarseCandidate, SymbolId};
use crate::indicators::{MomentumTracker, TrackerBook};
use chrono::NaiveDate;
use std::cmp::Ordering;
use tracing::{debug, info, warn};

/// Result of one selection cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    /// Top-quantile symbols, strongest momentum last.
    pub selected: Vec<SymbolId>,
    /// Ready candidates ranked ascending by performance.
    pub ranked: Vec<(SymbolId, f64)>,
    /// Candidates that passed the eligibility filter.
    pub eligible: usize,
    /// Candidates dropped for insufficient history.
    pub skipped: Vec<SymbolId>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

/// Filters, backfills and ranks the coarse universe.
#[derive(Debug, Clone)]
pub struct UniverseSelector {
    quantile: usize,
    min_price: f64,
}

impl UniverseSelector {
    pub fn new(quantile: usize, min_price: f64) -> Self {
        assert!(quantile >= 1, "quantile must be >= 1");
        Self { quantile, min_price }
    }

    pub fn quantile(&self) -> usize {
        self.quantile
    }

    /// Eligibility: fundamental data, US listing, price above the floor,
    /// ticker present in the earnings universe.
    pub fn is_eligible(&self, candidate: &CoarseCandidate, earnings: &EarningsCalendar) -> bool {
        candidate.has_fundamental_data
            && candidate.symbol.market.is_usa()
            && candidate.price > self.min_price
            && earnings.contains_ticker(candidate.symbol.ticker())
    }

    /// Push today's price into every tracker that already exists.
    pub fn refresh(&self, candidates: &[CoarseCandidate], trackers: &mut TrackerBook) {
        for candidate in candidates {
            if trackers.contains(&candidate.symbol) {
                trackers.update(&candidate.symbol, candidate.price);
            }
        }
    }

    /// Run a full selection cycle.
    ///
    /// Newly seen eligible candidates are backfilled from `history`; those
    /// without a full window of history are logged and skipped. Fewer ready
    /// candidates than the quantile divisor yields an empty selection.
    pub fn select(
        &self,
        today: NaiveDate,
        candidates: &[CoarseCandidate],
        earnings: &EarningsCalendar,
        trackers: &mut TrackerBook,
        history: &dyn HistoryProvider,
    ) -> Selection {
        let eligible: Vec<&CoarseCandidate> = candidates
            .iter()
            .filter(|c| self.is_eligible(c, earnings))
            .collect();

        let mut skipped = Vec::new();
        for candidate in &eligible {
            if trackers.contains(&candidate.symbol) {
                continue;
            }
            match backfill(&candidate.symbol, trackers.window(), today, history) {
                Ok(tracker) => trackers.insert(candidate.symbol.clone(), tracker),
                Err(e) => {
                    warn!(symbol = %candidate.symbol, error = %e, "skipping candidate");
                    skipped.push(candidate.symbol.clone());
                }
            }
        }

        let mut ranked: Vec<(SymbolId, f64)> = eligible
            .iter()
            .filter_map(|c| {
                trackers
                    .performance(&c.symbol)
                    .filter(|p| p.is_finite())
                    .map(|p| (c.symbol.clone(), p))
            })
            .collect();
        sort_ascending(&mut ranked);

        let selected = if ranked.len() < self.quantile {
            debug!(
                ready = ranked.len(),
                needed = self.quantile,
                "not enough ready candidates, clearing selection"
            );
            Vec::new()
        } else {
            top_quantile(&ranked, self.quantile)
        };

        info!(
            eligible = eligible.len(),
            ready = ranked.len(),
            selected = selected.len(),
            skipped = skipped.len(),
            "universe selection"
        );

        Selection {
            selected,
            ranked,
            eligible: eligible.len(),
            skipped,
        }
    }
}

fn backfill(
    symbol: &SymbolId,
    window: usize,
    today: NaiveDate,
    history: &dyn HistoryProvider,
) -> Result<MomentumTracker, DataError> {
    let closes = history.daily_closes(symbol, window, today)?;
    let mut tracker = MomentumTracker::new(window);
    tracker.warm_up(&closes);
    if !tracker.is_ready() {
        return Err(DataError::InsufficientHistory {
            symbol: symbol.to_string(),
            needed: window,
            got: tracker.len(),
        });
    }
    Ok(tracker)
}

/// Sort by performance ascending; ties by symbol.
pub fn sort_ascending(ranked: &mut [(SymbolId, f64)]) {
    ranked.sort_by(|a, b| {
        a.1.partial_cmp(&b.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
}

/// Keep the top `len / quantile` entries of an ascending ranking.
pub fn top_quantile(ranked: &[(SymbolId, f64)], quantile: usize) -> Vec<SymbolId> {
    let count = ranked.len() / quantile;
    ranked[ranked.len() - count..]
        .iter()
        .map(|(symbol, _)| symbol.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranked(n: usize) -> Vec<(SymbolId, f64)> {
        (0..n)
            .map(|i| (SymbolId::usa(format!("S{i:02}")), i as f64))
            .collect()
    }

    #[test]
    fn top_decile_of_ten_is_single_best() {
        let letters = ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J"];
        let mut r: Vec<(SymbolId, f64)> = letters
            .iter()
            .enumerate()
            .rev()
            .map(|(i, t)| (SymbolId::usa(t), (i + 1) as f64))
            .collect();
        sort_ascending(&mut r);
        assert_eq!(top_quantile(&r, 10), vec![SymbolId::usa("J")]);
    }

    #[test]
    fn top_quantile_uses_integer_division() {
        let r = ranked(29);
        let top = top_quantile(&r, 10);
        assert_eq!(top, vec![SymbolId::usa("S27"), SymbolId::usa("S28")]);
        assert!(top_quantile(&ranked(9), 10).is_empty());
    }

    #[test]
    fn ties_break_by_symbol() {
        let mut r = vec![
            (SymbolId::usa("B"), 1.0),
            (SymbolId::usa("A"), 1.0),
        ];
        sort_ascending(&mut r);
        assert_eq!(r[0].0, SymbolId::usa("A"));
    }
}
