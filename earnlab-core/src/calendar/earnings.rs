//! Earnings calendar index: announcement date → tickers reporting that day.
//!
//! Built once from the JSON dataset and immutable afterwards. The set of all
//! tickers that ever report forms the "earnings universe" used to gate
//! universe selection.

use crate::data::DataError;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RawEarningsDay {
    date: NaiveDate,
    stocks: Vec<RawEarningsStock>,
}

#[derive(Debug, Deserialize)]
struct RawEarningsStock {
    ticker: String,
    #[serde(default)]
    #[allow(dead_code)]
    eps: Option<serde_json::Value>,
}

/// Immutable date → tickers mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EarningsCalendar {
    by_date: BTreeMap<NaiveDate, Vec<String>>,
    universe: BTreeSet<String>,
}

impl EarningsCalendar {
    /// Parse the dataset JSON: `[{"date": "YYYY-MM-DD", "stocks": [{"ticker": .., "eps": ..}]}]`.
    ///
    /// Tickers are upper-cased. Repeated dates are merged and repeated
    /// tickers within a date collapse to one entry.
    pub fn from_json(json: &str) -> Result<Self, DataError> {
        let days: Vec<RawEarningsDay> = serde_json::from_str(json)
            .map_err(|e| DataError::ResponseFormatChanged(format!("earnings dataset: {e}")))?;

        let mut by_date: BTreeMap<NaiveDate, Vec<String>> = BTreeMap::new();
        let mut universe = BTreeSet::new();

        for day in days {
            let tickers = by_date.entry(day.date).or_default();
            for stock in day.stocks {
                let ticker = stock.ticker.trim().to_ascii_uppercase();
                if ticker.is_empty() {
                    return Err(DataError::ValidationError(format!(
                        "empty ticker on {}",
                        day.date
                    )));
                }
                if !tickers.contains(&ticker) {
                    tickers.push(ticker.clone());
                }
                universe.insert(ticker);
            }
        }

        Ok(Self { by_date, universe })
    }

    /// Load the dataset from a local JSON file.
    pub fn from_file(path: &Path) -> Result<Self, DataError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DataError::Other(format!("read {}: {e}", path.display())))?;
        Self::from_json(&content)
    }

    /// Tickers reporting on `date` (empty slice when none).
    pub fn tickers_on(&self, date: NaiveDate) -> &[String] {
        self.by_date.get(&date).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn has_entry(&self, date: NaiveDate) -> bool {
        self.by_date.contains_key(&date)
    }

    pub fn reports_on(&self, ticker: &str, date: NaiveDate) -> bool {
        self.tickers_on(date).iter().any(|t| t == ticker)
    }

    pub fn contains_ticker(&self, ticker: &str) -> bool {
        self.universe.contains(ticker)
    }

    /// Every ticker that appears anywhere in the dataset.
    pub fn universe(&self) -> &BTreeSet<String> {
        &self.universe
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.by_date.keys().copied()
    }

    /// First and last announcement dates.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.by_date.keys().next()?;
        let last = self.by_date.keys().next_back()?;
        Some((*first, *last))
    }

    /// Number of distinct announcement dates.
    pub fn len(&self) -> usize {
        self.by_date.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"date": "2024-01-25", "stocks": [{"ticker": "aapl", "eps": 2.1}, {"ticker": "MSFT", "eps": null}]},
        {"date": "2024-01-26", "stocks": [{"ticker": "IBM", "eps": "3.50"}]},
        {"date": "2024-01-25", "stocks": [{"ticker": "AAPL", "eps": 2.1}, {"ticker": "INTC"}]}
    ]"#;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parses_and_merges_dates() {
        let cal = EarningsCalendar::from_json(SAMPLE).unwrap();
        assert_eq!(cal.len(), 2);
        assert_eq!(cal.tickers_on(d(2024, 1, 25)), &["AAPL", "MSFT", "INTC"]);
        assert_eq!(cal.tickers_on(d(2024, 1, 26)), &["IBM"]);
        assert!(cal.tickers_on(d(2024, 1, 27)).is_empty());
    }

    #[test]
    fn universe_collects_every_ticker() {
        let cal = EarningsCalendar::from_json(SAMPLE).unwrap();
        assert_eq!(cal.universe().len(), 4);
        assert!(cal.contains_ticker("INTC"));
        assert!(!cal.contains_ticker("TSLA"));
        assert!(cal.reports_on("IBM", d(2024, 1, 26)));
    }

    #[test]
    fn date_range_spans_dataset() {
        let cal = EarningsCalendar::from_json(SAMPLE).unwrap();
        assert_eq!(cal.date_range(), Some((d(2024, 1, 25), d(2024, 1, 26))));
        assert_eq!(EarningsCalendar::default().date_range(), None);
    }

    #[test]
    fn malformed_dataset_is_an_error() {
        assert!(EarningsCalendar::from_json(r#"{"date": "2024-01-25"}"#).is_err());
        assert!(EarningsCalendar::from_json(r#"[{"date": "25/01/2024", "stocks": []}]"#).is_err());
        assert!(EarningsCalendar::from_json(r#"[{"date": "2024-01-25", "stocks": [{"eps": 1}]}]"#).is_err());
        assert!(EarningsCalendar::from_json(r#"[{"date": "2024-01-25", "stocks": [{"ticker": " "}]}]"#).is_err());
    }
}
