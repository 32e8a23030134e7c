//! Integration tests for file-backed data: earnings calendar and CSV history
//! feeding a selection cycle.

use chrono::NaiveDate;
use earnlab_core::calendar::EarningsCalendar;
use earnlab_core::data::{CsvHistory, DataError};
use earnlab_core::domain::{CoarseCandidate, SymbolId};
use earnlab_core::indicators::TrackerBook;
use earnlab_core::selection::UniverseSelector;
use std::fmt::Write as _;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn calendar_loads_from_file() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("earnings.json");
    std::fs::write(
        &path,
        r#"[{"date": "2024-02-01", "stocks": [{"ticker": "AAPL", "eps": 2.18}, {"ticker": "AMZN", "eps": 0.8}]}]"#,
    )
    .unwrap();

    let cal = EarningsCalendar::from_file(&path).unwrap();
    assert_eq!(cal.tickers_on(d(2024, 2, 1)), &["AAPL", "AMZN"]);
}

#[test]
fn missing_calendar_file_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    let err = EarningsCalendar::from_file(&tmp.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, DataError::Other(_)));
}

#[test]
fn csv_history_drives_selection() {
    let tmp = tempfile::tempdir().unwrap();
    let window = 5;
    let start = d(2024, 1, 1);

    let mut stocks = Vec::new();
    for i in 0..12 {
        let ticker = format!("S{i:02}");
        let mut body = String::from("date,close\n");
        for k in 0..window {
            let date = start + chrono::Days::new(k as u64);
            let close = 10.0 + (i as f64) * k as f64;
            writeln!(body, "{date},{close}").unwrap();
        }
        std::fs::write(tmp.path().join(format!("{ticker}.csv")), body).unwrap();
        stocks.push(format!(r#"{{"ticker": "{ticker}"}}"#));
    }
    // One ticker with too little history.
    std::fs::write(tmp.path().join("SHORT.csv"), "date,close\n2024-01-05,20\n").unwrap();
    stocks.push(r#"{"ticker": "SHORT"}"#.to_string());

    let cal = EarningsCalendar::from_json(&format!(
        r#"[{{"date": "2024-03-01", "stocks": [{}]}}]"#,
        stocks.join(",")
    ))
    .unwrap();

    let history = CsvHistory::new(tmp.path());
    let candidates: Vec<CoarseCandidate> = history
        .available_tickers()
        .unwrap()
        .into_iter()
        .map(|t| CoarseCandidate::new(SymbolId::usa(t), 20.0, true))
        .collect();
    assert_eq!(candidates.len(), 13);

    let selector = UniverseSelector::new(10, 5.0);
    let mut trackers = TrackerBook::new(window);
    let selection = selector.select(d(2024, 1, 5), &candidates, &cal, &mut trackers, &history);

    assert_eq!(selection.eligible, 13);
    assert_eq!(selection.skipped, vec![SymbolId::usa("SHORT")]);
    assert_eq!(selection.ranked.len(), 12);
    assert_eq!(selection.selected, vec![SymbolId::usa("S11")]);
}
