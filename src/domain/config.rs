//! Run configuration shared by every pipeline stage.

use chrono::NaiveDate;

use super::backtest::BacktestConfig;

pub const DEFAULT_SHORT_WINDOW: usize = 50;
pub const DEFAULT_LONG_WINDOW: usize = 200;
pub const DEFAULT_CAPITAL: f64 = 100_000.0;
pub const DEFAULT_SHARES_PER_TRADE: u64 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct CrossoverConfig {
    pub ticker: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub short_window: usize,
    pub long_window: usize,
    pub capital: f64,
    pub shares_per_trade: u64,
}

impl CrossoverConfig {
    /// Config with the default windows, capital and lot size.
    pub fn new(ticker: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        CrossoverConfig {
            ticker: ticker.into(),
            start_date,
            end_date,
            short_window: DEFAULT_SHORT_WINDOW,
            long_window: DEFAULT_LONG_WINDOW,
            capital: DEFAULT_CAPITAL,
            shares_per_trade: DEFAULT_SHARES_PER_TRADE,
        }
    }

    pub fn backtest(&self) -> BacktestConfig {
        BacktestConfig {
            initial_capital: self.capital,
            shares_per_trade: self.shares_per_trade,
        }
    }
}
