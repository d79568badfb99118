//! End-of-run summary figures.

use chrono::NaiveDate;

use super::portfolio::Portfolio;
use super::signal::{PositionEvent, SignalSeries};

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub initial_capital: f64,
    pub final_total: f64,
    /// Final total minus starting capital.
    pub absolute_return: f64,
    /// Absolute return as a fraction of starting capital.
    pub total_return: f64,
    pub buys: usize,
    pub sells: usize,
    pub business_days: usize,
    pub last_date: Option<NaiveDate>,
}

impl Summary {
    pub fn compute(portfolio: &Portfolio, signals: &SignalSeries) -> Self {
        let initial_capital = portfolio.initial_capital;
        let final_total = portfolio.final_total();
        let absolute_return = portfolio.absolute_return();
        let total_return = if initial_capital > 0.0 {
            absolute_return / initial_capital
        } else {
            0.0
        };

        Summary {
            initial_capital,
            final_total,
            absolute_return,
            total_return,
            buys: signals.count(PositionEvent::Buy),
            sells: signals.count(PositionEvent::Sell),
            business_days: portfolio.len(),
            last_date: portfolio.last().map(|p| p.date),
        }
    }
}
