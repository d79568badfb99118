//! The run pipeline: load → normalize → signal → backtest → summarize.
//!
//! Each stage is a pure function of the previous stage's output and the
//! validated [`CrossoverConfig`]; only the initial fetch touches a port.

use tracing::{debug, info, warn};

use super::backtest::run_backtest;
use super::config::CrossoverConfig;
use super::config_validation::validate_config;
use super::error::{CrossoverError, RunWarning};
use super::portfolio::Portfolio;
use super::price_series::{normalize_calendar, PriceSeries};
use super::signal::{generate_signals, SignalSeries};
use super::summary::Summary;
use crate::ports::data_port::DataPort;

#[derive(Debug, Clone, PartialEq)]
pub struct CrossoverRun {
    pub config: CrossoverConfig,
    pub prices: PriceSeries,
    pub signals: SignalSeries,
    pub portfolio: Portfolio,
    pub summary: Summary,
    pub warnings: Vec<RunWarning>,
}

/// Validate, fetch and compute a full run.
pub fn run_pipeline(
    data_port: &dyn DataPort,
    config: &CrossoverConfig,
) -> Result<CrossoverRun, CrossoverError> {
    validate_config(config)?;

    info!(
        ticker = %config.ticker,
        start = %config.start_date,
        end = %config.end_date,
        "loading daily closes"
    );
    let raw = data_port.fetch_daily_closes(&config.ticker, config.start_date, config.end_date)?;
    debug!(rows = raw.len(), "raw closes fetched");

    let prices = normalize_calendar(&raw, config.start_date, config.end_date);
    if prices.prices().all(|p| p.is_none()) {
        return Err(CrossoverError::DataUnavailable {
            ticker: config.ticker.clone(),
            start_date: config.start_date,
            end_date: config.end_date,
        });
    }

    Ok(compute(config, prices))
}

/// Signal, backtest and summary over an already normalized series.
pub fn compute(config: &CrossoverConfig, prices: PriceSeries) -> CrossoverRun {
    info!(
        business_days = prices.len(),
        leading_gap = prices.leading_gap(),
        "calendar normalized"
    );

    let signals = generate_signals(&prices, config.short_window, config.long_window);

    let mut warnings = Vec::new();
    if signals.long_ma.first_valid().is_none() {
        let warning = RunWarning::InsufficientHistory {
            business_days: prices.len(),
            long_window: config.long_window,
        };
        warn!("{warning}");
        warnings.push(warning);
    }

    let portfolio = run_backtest(&signals, &prices, &config.backtest());
    let summary = Summary::compute(&portfolio, &signals);
    info!(
        buys = summary.buys,
        sells = summary.sells,
        final_total = summary.final_total,
        "backtest complete"
    );

    CrossoverRun {
        config: config.clone(),
        prices,
        signals,
        portfolio,
        summary,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quote::DailyClose;
    use chrono::NaiveDate;

    struct FixedPort(Vec<DailyClose>);

    impl DataPort for FixedPort {
        fn fetch_daily_closes(
            &self,
            _ticker: &str,
            _start_date: NaiveDate,
            _end_date: NaiveDate,
        ) -> Result<Vec<DailyClose>, CrossoverError> {
            Ok(self.0.clone())
        }
    }

    fn config(short: usize, long: usize) -> CrossoverConfig {
        CrossoverConfig {
            short_window: short,
            long_window: long,
            ..CrossoverConfig::new(
                "TEST",
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            )
        }
    }

    #[test]
    fn empty_fetch_is_data_unavailable() {
        let err = run_pipeline(&FixedPort(vec![]), &config(2, 5)).unwrap_err();
        assert!(matches!(err, CrossoverError::DataUnavailable { ticker, .. } if ticker == "TEST"));
    }

    #[test]
    fn invalid_config_rejected_before_fetch() {
        let err = run_pipeline(&FixedPort(vec![]), &config(5, 2)).unwrap_err();
        assert!(matches!(err, CrossoverError::InvalidRange { .. }));
    }

    fn january_closes() -> Vec<DailyClose> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        start
            .iter_days()
            .take(31)
            .map(|d| DailyClose::new(d, 10.0))
            .collect()
    }

    #[test]
    fn range_of_exactly_long_window_days_warns() {
        // January 2024 has 23 business days; the shifted series leaves 22 priced
        let run = run_pipeline(&FixedPort(january_closes()), &config(5, 23)).unwrap();
        assert!(run.signals.long_ma.first_valid().is_none());
        assert_eq!(run.warnings.len(), 1);

        let run = run_pipeline(&FixedPort(january_closes()), &config(5, 22)).unwrap();
        assert_eq!(run.signals.long_ma.first_valid(), Some(22));
        assert!(run.warnings.is_empty());
    }

    #[test]
    fn short_range_warns_but_completes() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let raw: Vec<DailyClose> = start
            .iter_days()
            .take(31)
            .map(|d| DailyClose::new(d, 10.0))
            .collect();
        let run = run_pipeline(&FixedPort(raw), &config(5, 200)).unwrap();

        assert_eq!(run.prices.len(), 23);
        assert_eq!(
            run.warnings,
            vec![RunWarning::InsufficientHistory {
                business_days: 23,
                long_window: 200,
            }]
        );
        assert!(run.signals.points.iter().all(|p| p.signal == 0.0));
        assert!(run.portfolio.points.iter().all(|p| p.total == 100_000.0));
    }
}
