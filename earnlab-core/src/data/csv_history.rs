//! Daily close history read from one CSV file per ticker.
//!
//! Layout: `<dir>/<TICKER>.csv` with a `date,close` header. File names are
//! matched case-insensitively, so `msft.csv` serves `MSFT`. Rows may be in
//! any order; they are sorted by date on load.

use super::provider::{DataError, HistoryProvider};
use crate::domain::SymbolId;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct CloseRow {
    date: NaiveDate,
    close: f64,
}

/// File-backed history provider.
#[derive(Debug, Clone)]
pub struct CsvHistory {
    dir: PathBuf,
}

impl CsvHistory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// CSV file backing `symbol`, if one exists under any letter case.
    pub fn path_for(&self, symbol: &SymbolId) -> Option<PathBuf> {
        let exact = self.dir.join(format!("{}.csv", symbol.ticker()));
        if exact.is_file() {
            return Some(exact);
        }
        self.csv_files()
            .ok()?
            .into_iter()
            .find(|(stem, _)| stem.eq_ignore_ascii_case(symbol.ticker()))
            .map(|(_, path)| path)
    }

    /// All rows for a symbol, sorted by date.
    pub fn load(&self, symbol: &SymbolId) -> Result<Vec<(NaiveDate, f64)>, DataError> {
        let path = self.path_for(symbol).ok_or_else(|| DataError::SymbolNotFound {
            symbol: symbol.to_string(),
        })?;
        read_closes(&path)
    }

    /// Tickers with a CSV file in the directory, upper-cased.
    pub fn available_tickers(&self) -> Result<Vec<String>, DataError> {
        let mut tickers: Vec<String> = self
            .csv_files()?
            .into_iter()
            .map(|(stem, _)| stem.to_ascii_uppercase())
            .collect();
        tickers.sort();
        tickers.dedup();
        Ok(tickers)
    }

    fn csv_files(&self) -> Result<Vec<(String, PathBuf)>, DataError> {
        let entries = std::fs::read_dir(&self.dir)
            .map_err(|e| DataError::Other(format!("read dir {}: {e}", self.dir.display())))?;
        Ok(entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "csv"))
            .filter_map(|p| {
                let stem = p.file_stem()?.to_string_lossy().into_owned();
                Some((stem, p))
            })
            .collect())
    }
}

fn read_closes(path: &Path) -> Result<Vec<(NaiveDate, f64)>, DataError> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| DataError::Csv(format!("{}: {e}", path.display())))?;
    let mut rows = Vec::new();
    for record in reader.deserialize::<CloseRow>() {
        let row = record.map_err(|e| DataError::Csv(format!("{}: {e}", path.display())))?;
        rows.push((row.date, row.close));
    }
    rows.sort_by_key(|(date, _)| *date);
    Ok(rows)
}

impl HistoryProvider for CsvHistory {
    fn daily_closes(
        &self,
        symbol: &SymbolId,
        bars: usize,
        end: NaiveDate,
    ) -> Result<Vec<f64>, DataError> {
        let rows = self.load(symbol)?;
        let closes: Vec<f64> = rows
            .into_iter()
            .filter(|(date, _)| *date <= end)
            .map(|(_, close)| close)
            .collect();
        let skip = closes.len().saturating_sub(bars);
        Ok(closes[skip..].to_vec())
    }
}
