//! One-shot HTTP download of the earnings dataset.
//!
//! The dataset is fetched once at startup. There is no retry layer: an
//! unreachable endpoint or a malformed body is fatal for the caller.

use super::provider::DataError;
use crate::calendar::EarningsCalendar;
use std::time::Duration;
use tracing::{debug, info};

/// Blocking HTTP client for the earnings JSON feed.
pub struct HttpEarningsSource {
    client: reqwest::blocking::Client,
}

impl HttpEarningsSource {
    pub fn new() -> Result<Self, DataError> {
        Self::with_timeout(Duration::from_secs(30))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("earnlab/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DataError::Other(format!("build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Download the raw dataset body.
    pub fn fetch_raw(&self, url: &str) -> Result<String, DataError> {
        debug!(url, "requesting earnings dataset");
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DataError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        resp.text()
            .map_err(|e| DataError::ResponseFormatChanged(format!("read body: {e}")))
    }

    /// Download and parse the dataset into a calendar.
    pub fn fetch(&self, url: &str) -> Result<EarningsCalendar, DataError> {
        let body = self.fetch_raw(url)?;
        let calendar = EarningsCalendar::from_json(&body)?;
        info!(
            dates = calendar.len(),
            tickers = calendar.universe().len(),
            "earnings calendar loaded"
        );
        Ok(calendar)
    }
}
