//! Business-day arithmetic over weekends and an explicit holiday list.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use std::collections::BTreeSet;

/// Trading calendar: Monday–Friday minus configured holidays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradingCalendar {
    holidays: BTreeSet<NaiveDate>,
}

impl TradingCalendar {
    /// Weekends only, no holidays.
    pub fn weekdays() -> Self {
        Self::default()
    }

    pub fn with_holidays(holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            holidays: holidays.into_iter().collect(),
        }
    }

    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.holidays.contains(&date)
    }

    /// Step forward `n` business days from `date`.
    ///
    /// `n == 0` returns `date` unchanged, business day or not.
    pub fn add_business_days(&self, date: NaiveDate, n: u32) -> NaiveDate {
        let mut current = date;
        let mut remaining = n;
        while remaining > 0 {
            current = match current.checked_add_days(Days::new(1)) {
                Some(next) => next,
                None => return current,
            };
            if self.is_business_day(current) {
                remaining -= 1;
            }
        }
        current
    }
}
