//! Crossover signal generation.
//!
//! The signal on day `i` is decided from moving averages of the price series
//! shifted one day later, so each decision only sees closes up to `i - 1`.
//! Signal is 1.0 (long) when the short average is strictly above the long
//! average and 0.0 otherwise. An undefined average never compares greater,
//! and every index below `short_window` is forced flat.

use chrono::NaiveDate;
use std::fmt;

use super::indicator::IndicatorSeries;
use super::indicator::sma::calculate_sma;
use super::price_series::PriceSeries;

pub const LONG: f64 = 1.0;
pub const FLAT: f64 = 0.0;

/// Day-over-day change of the signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionEvent {
    Buy,
    Sell,
    Hold,
}

impl PositionEvent {
    pub fn from_diff(diff: f64) -> Self {
        if diff > 0.0 {
            PositionEvent::Buy
        } else if diff < 0.0 {
            PositionEvent::Sell
        } else {
            PositionEvent::Hold
        }
    }

    pub fn value(self) -> f64 {
        match self {
            PositionEvent::Buy => 1.0,
            PositionEvent::Sell => -1.0,
            PositionEvent::Hold => 0.0,
        }
    }
}

impl fmt::Display for PositionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionEvent::Buy => write!(f, "BUY"),
            PositionEvent::Sell => write!(f, "SELL"),
            PositionEvent::Hold => write!(f, "HOLD"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalPoint {
    pub date: NaiveDate,
    pub signal: f64,
    /// `None` on the first row, where there is nothing to diff against.
    pub event: Option<PositionEvent>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalSeries {
    pub short_window: usize,
    pub long_window: usize,
    pub points: Vec<SignalPoint>,
    /// Short average of the shifted prices.
    pub short_ma: IndicatorSeries,
    /// Long average of the shifted prices.
    pub long_ma: IndicatorSeries,
}

impl SignalSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn signal_at(&self, index: usize) -> f64 {
        self.points.get(index).map_or(FLAT, |p| p.signal)
    }

    /// Indices and dates of every Buy/Sell transition.
    pub fn transitions(&self) -> impl Iterator<Item = (usize, &SignalPoint)> + '_ {
        self.points
            .iter()
            .enumerate()
            .filter(|(_, p)| matches!(p.event, Some(PositionEvent::Buy | PositionEvent::Sell)))
    }

    pub fn count(&self, event: PositionEvent) -> usize {
        self.points.iter().filter(|p| p.event == Some(event)).count()
    }
}

/// Long when `short > long`; undefined on either side is treated as not greater.
pub fn crossover_signal(short: Option<f64>, long: Option<f64>) -> f64 {
    match (short, long) {
        (Some(s), Some(l)) if s > l => LONG,
        _ => FLAT,
    }
}

pub fn generate_signals(
    prices: &PriceSeries,
    short_window: usize,
    long_window: usize,
) -> SignalSeries {
    let shifted = prices.shifted(1);
    let short_ma = calculate_sma(&shifted, short_window);
    let long_ma = calculate_sma(&shifted, long_window);

    let mut points: Vec<SignalPoint> = Vec::with_capacity(prices.len());
    for (i, point) in prices.points.iter().enumerate() {
        let signal = if i < short_window {
            FLAT
        } else {
            crossover_signal(short_ma.value_at(i), long_ma.value_at(i))
        };
        let event = points
            .last()
            .map(|prev| PositionEvent::from_diff(signal - prev.signal));
        points.push(SignalPoint {
            date: point.date,
            signal,
            event,
        });
    }

    SignalSeries {
        short_window,
        long_window,
        points,
        short_ma,
        long_ma,
    }
}

/// Short and long averages of the unshifted prices, as drawn on charts.
pub fn moving_averages(
    prices: &PriceSeries,
    short_window: usize,
    long_window: usize,
) -> (IndicatorSeries, IndicatorSeries) {
    (
        calculate_sma(prices, short_window),
        calculate_sma(prices, long_window),
    )
}
