//! Portfolio value series produced by the backtester.

use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortfolioPoint {
    pub date: NaiveDate,
    /// Closing price used for valuation; `None` before the first observation.
    pub price: Option<f64>,
    /// Shares held at the close.
    pub position: f64,
    pub holdings: f64,
    pub cash: f64,
    pub total: f64,
    /// Percentage change of `total` from the prior row.
    pub returns: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub initial_capital: f64,
    pub points: Vec<PortfolioPoint>,
}

impl Portfolio {
    pub fn new(initial_capital: f64) -> Self {
        Portfolio {
            initial_capital,
            points: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&PortfolioPoint> {
        self.points.last()
    }

    /// Total value on the last row, or the starting capital for an empty run.
    pub fn final_total(&self) -> f64 {
        self.last().map_or(self.initial_capital, |p| p.total)
    }

    pub fn absolute_return(&self) -> f64 {
        self.final_total() - self.initial_capital
    }

    /// The last `n` rows (fewer if the series is shorter).
    pub fn tail(&self, n: usize) -> &[PortfolioPoint] {
        let start = self.points.len().saturating_sub(n);
        &self.points[start..]
    }
}

/// Percentage change from `prev` to `curr`, undefined when it cannot be computed.
pub fn pct_change(prev: f64, curr: f64) -> Option<f64> {
    if prev == 0.0 {
        return None;
    }
    let r = (curr - prev) / prev;
    r.is_finite().then_some(r)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(day: u32, total: f64) -> PortfolioPoint {
        PortfolioPoint {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            price: Some(10.0),
            position: 0.0,
            holdings: 0.0,
            cash: total,
            total,
            returns: None,
        }
    }

    #[test]
    fn empty_portfolio_reports_capital() {
        let portfolio = Portfolio::new(100_000.0);
        assert!(portfolio.is_empty());
        assert_eq!(portfolio.final_total(), 100_000.0);
        assert_eq!(portfolio.absolute_return(), 0.0);
        assert!(portfolio.tail(5).is_empty());
    }

    #[test]
    fn final_total_and_return() {
        let mut portfolio = Portfolio::new(1_000.0);
        portfolio.points.push(point(1, 1_000.0));
        portfolio.points.push(point(2, 1_250.0));
        assert_eq!(portfolio.final_total(), 1_250.0);
        assert_eq!(portfolio.absolute_return(), 250.0);
    }

    #[test]
    fn tail_takes_last_rows() {
        let mut portfolio = Portfolio::new(1.0);
        for day in 1..=7 {
            portfolio.points.push(point(day, day as f64));
        }
        let tail = portfolio.tail(5);
        assert_eq!(tail.len(), 5);
        assert_eq!(tail[0].total, 3.0);
        assert_eq!(portfolio.tail(50).len(), 7);
    }

    #[test]
    fn pct_change_handles_zero_base() {
        assert_eq!(pct_change(100.0, 110.0), Some(0.1));
        assert_eq!(pct_change(0.0, 10.0), None);
        assert_eq!(pct_change(f64::NAN, 10.0), None);
    }
}
