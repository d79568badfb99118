//! Fixed-lot backtester.
//!
//! Holds `shares_per_trade × signal` shares each day, trading at that day's
//! close (unshifted prices). Cash starts at the initial capital and absorbs
//! every change in position; there is no margin check, so cash may go negative.

use super::portfolio::{pct_change, Portfolio, PortfolioPoint};
use super::price_series::PriceSeries;
use super::signal::SignalSeries;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    pub shares_per_trade: u64,
}

pub fn run_backtest(
    signals: &SignalSeries,
    prices: &PriceSeries,
    config: &BacktestConfig,
) -> Portfolio {
    let mut portfolio = Portfolio::new(config.initial_capital);
    let lot = config.shares_per_trade as f64;

    let mut prev_position = 0.0_f64;
    let mut prev_total: Option<f64> = None;
    let mut cumulative_cashflow = 0.0_f64;

    for (i, point) in prices.points.iter().enumerate() {
        let position = lot * signals.signal_at(i);
        // An undefined price contributes nothing to value or trade flow.
        let price = point.price;
        let holdings = price.map_or(0.0, |p| position * p);
        cumulative_cashflow += price.map_or(0.0, |p| (position - prev_position) * p);

        let cash = config.initial_capital - cumulative_cashflow;
        let total = cash + holdings;
        let returns = prev_total.and_then(|prev| pct_change(prev, total));

        portfolio.points.push(PortfolioPoint {
            date: point.date,
            price,
            position,
            holdings,
            cash,
            total,
            returns,
        });

        prev_position = position;
        prev_total = Some(total);
    }

    portfolio
}
