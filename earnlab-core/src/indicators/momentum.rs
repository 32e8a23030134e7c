//! Trailing momentum over a fixed rolling window of daily closes.
//!
//! performance = close[newest] / close[oldest] - 1
//! Lookback: window length (252 trading days by default).

use crate::domain::SymbolId;
use std::collections::{HashMap, VecDeque};

/// One trading year of daily closes.
pub const TRADING_YEAR: usize = 252;

/// Per-symbol rolling window of closes.
#[derive(Debug, Clone)]
pub struct MomentumTracker {
    closes: VecDeque<f64>,
    capacity: usize,
}

impl MomentumTracker {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "MomentumTracker capacity must be >= 1");
        Self {
            closes: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a close, evicting the oldest once over capacity.
    ///
    /// Non-finite and non-positive prices are ignored.
    pub fn update(&mut self, price: f64) {
        if !(price.is_finite() && price > 0.0) {
            return;
        }
        self.closes.push_back(price);
        while self.closes.len() > self.capacity {
            self.closes.pop_front();
        }
    }

    /// Feed a slice of closes, oldest first.
    pub fn warm_up(&mut self, closes: &[f64]) {
        for &close in closes {
            self.update(close);
        }
    }

    pub fn is_ready(&self) -> bool {
        self.closes.len() == self.capacity
    }

    /// Trailing return across the window; `None` until the window is full.
    pub fn performance(&self) -> Option<f64> {
        if !self.is_ready() {
            return None;
        }
        let oldest = self.closes.front()?;
        let newest = self.closes.back()?;
        Some(newest / oldest - 1.0)
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.closes.iter().copied()
    }
}

/// Trackers keyed by symbol. Entries are created on first sight and live
/// for the lifetime of the book.
#[derive(Debug, Clone)]
pub struct TrackerBook {
    trackers: HashMap<SymbolId, MomentumTracker>,
    window: usize,
}

impl TrackerBook {
    pub fn new(window: usize) -> Self {
        Self {
            trackers: HashMap::new(),
            window,
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn contains(&self, symbol: &SymbolId) -> bool {
        self.trackers.contains_key(symbol)
    }

    pub fn get(&self, symbol: &SymbolId) -> Option<&MomentumTracker> {
        self.trackers.get(symbol)
    }

    /// Insert a tracker built elsewhere (e.g. after a history backfill).
    pub fn insert(&mut self, symbol: SymbolId, tracker: MomentumTracker) {
        self.trackers.insert(symbol, tracker);
    }

    /// Update an existing tracker, creating it on first sight.
    pub fn update(&mut self, symbol: &SymbolId, price: f64) {
        let window = self.window;
        self.trackers
            .entry(symbol.clone())
            .or_insert_with(|| MomentumTracker::new(window))
            .update(price);
    }

    pub fn performance(&self, symbol: &SymbolId) -> Option<f64> {
        self.trackers.get(symbol).and_then(|t| t.performance())
    }

    pub fn len(&self) -> usize {
        self.trackers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trackers.is_empty()
    }
}
