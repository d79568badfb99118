#![allow(dead_code)]

use chrono::NaiveDate;
use macross::domain::config::CrossoverConfig;
use macross::domain::error::CrossoverError;
use macross::domain::price_series::business_days;
pub use macross::domain::quote::DailyClose;
use macross::ports::data_port::DataPort;
use std::cell::Cell;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<DailyClose>>,
    pub errors: HashMap<String, String>,
    pub calls: Cell<usize>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            calls: Cell::new(0),
        }
    }

    pub fn with_closes(mut self, ticker: &str, closes: Vec<DailyClose>) -> Self {
        self.data.insert(ticker.to_string(), closes);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_daily_closes(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<DailyClose>, CrossoverError> {
        self.calls.set(self.calls.get() + 1);
        if let Some(reason) = self.errors.get(ticker) {
            return Err(CrossoverError::DataSource {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(ticker)
            .map(|closes| {
                closes
                    .iter()
                    .filter(|c| c.date >= start_date && c.date <= end_date)
                    .copied()
                    .collect()
            })
            .unwrap_or_default())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// One close per business day starting at `start`, taken from `prices` in order.
pub fn closes_on_business_days(start: NaiveDate, prices: &[f64]) -> Vec<DailyClose> {
    let far_end = start + chrono::Duration::days(prices.len() as i64 * 2 + 7);
    business_days(start, far_end)
        .into_iter()
        .zip(prices)
        .map(|(date, &close)| DailyClose::new(date, close))
        .collect()
}

/// Config covering exactly the dates of `closes`.
pub fn config_for(
    ticker: &str,
    closes: &[DailyClose],
    short_window: usize,
    long_window: usize,
) -> CrossoverConfig {
    let start = closes.first().map(|c| c.date).unwrap_or(date(2024, 1, 1));
    let end = closes.last().map(|c| c.date).unwrap_or(start);
    CrossoverConfig {
        short_window,
        long_window,
        ..CrossoverConfig::new(ticker, start, end)
    }
}
