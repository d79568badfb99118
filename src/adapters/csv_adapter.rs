//! CSV file price data adapter.
//!
//! Reads `<base_path>/<TICKER>.csv` as exported by common market-data
//! services: a header row with a `Date` column and a `Close` column (matched
//! case-insensitively). Rows whose date is unparsable, or whose close is
//! `null`, empty or unparsable, are dropped so the calendar normalizer
//! forward-fills them.

use crate::domain::error::CrossoverError;
use crate::domain::quote::DailyClose;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::{debug, warn};

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }
}

fn column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name))
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    // Accept a trailing time component ("2017-12-29 00:00:00").
    let day = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

impl DataPort for CsvAdapter {
    fn fetch_daily_closes(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<DailyClose>, CrossoverError> {
        let path = self.csv_path(ticker);
        let mut rdr = csv::Reader::from_path(&path).map_err(|e| CrossoverError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let headers = rdr
            .headers()
            .map_err(|e| CrossoverError::DataSource {
                reason: format!("CSV header error in {}: {}", path.display(), e),
            })?
            .clone();
        let date_col = column(&headers, "date").unwrap_or(0);
        let close_col = column(&headers, "close").ok_or_else(|| CrossoverError::DataSource {
            reason: format!("missing close column in {}", path.display()),
        })?;

        let mut closes = Vec::new();
        let mut skipped = 0usize;

        for result in rdr.records() {
            let record = result.map_err(|e| CrossoverError::DataSource {
                reason: format!("CSV parse error: {}", e),
            })?;

            let Some(date) = record.get(date_col).and_then(parse_date) else {
                debug!(ticker, row = ?record.position().map(|p| p.line()), "unparsable date");
                skipped += 1;
                continue;
            };

            if date < start_date || date > end_date {
                continue;
            }

            match record
                .get(close_col)
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite())
            {
                Some(close) => closes.push(DailyClose::new(date, close)),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            warn!(ticker, skipped, "rows without a usable date or close were skipped");
        }
        debug!(ticker, rows = closes.len(), path = %path.display(), "closes loaded");

        closes.sort_by_key(|c| c.date);
        Ok(closes)
    }
}
