//! Simple Moving Average indicator.
//!
//! O(n) sliding window. SMA(n)[i] = (P[i-n+1] + ... + P[i]) / n
//! Warmup: first (n-1) points are undefined, as is any window that contains
//! an undefined price.
//!
//! The window sum is Neumaier-compensated, and a window holding one repeated
//! price yields exactly that price, so averages of a flat series compare equal
//! whatever the period.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::price_series::PriceSeries;

pub fn calculate_sma(prices: &PriceSeries, period: usize) -> IndicatorSeries {
    if period == 0 || prices.is_empty() {
        return IndicatorSeries {
            indicator_type: IndicatorType::Sma(period),
            values: Vec::new(),
        };
    }

    let points = &prices.points;
    let mut values = Vec::with_capacity(points.len());
    let mut window = CompensatedSum::default();
    let mut defined = 0usize;
    // Length of the run of identical defined prices ending at `i`.
    let mut run = 0usize;

    for (i, point) in points.iter().enumerate() {
        if let Some(p) = point.price {
            window.add(p);
            defined += 1;
            let repeats = i > 0 && points[i - 1].price == Some(p);
            run = if repeats { run + 1 } else { 1 };
        } else {
            run = 0;
        }
        if i >= period {
            if let Some(old) = points[i - period].price {
                window.add(-old);
                defined -= 1;
            }
        }

        let value = (defined == period).then(|| match point.price {
            Some(p) if run >= period => p,
            _ => window.total() / period as f64,
        });
        values.push(IndicatorPoint {
            date: point.date,
            value,
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values,
    }
}

/// Neumaier running sum.
#[derive(Debug, Default, Clone, Copy)]
struct CompensatedSum {
    sum: f64,
    compensation: f64,
}

impl CompensatedSum {
    fn add(&mut self, x: f64) {
        let t = self.sum + x;
        if self.sum.abs() >= x.abs() {
            self.compensation += (self.sum - t) + x;
        } else {
            self.compensation += (x - t) + self.sum;
        }
        self.sum = t;
    }

    fn total(&self) -> f64 {
        self.sum + self.compensation
    }
}
