//! Business-day price series and calendar normalization.
//!
//! Raw closes arrive irregularly (holidays, exchange outages, weekend rows).
//! [`normalize_calendar`] reindexes them onto every Monday–Friday date of the
//! requested range and forward-fills the gaps. Leading dates before the first
//! observation stay undefined.

use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeMap;

use super::quote::DailyClose;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PriceSeries {
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|p| p.date)
    }

    pub fn prices(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.points.iter().map(|p| p.price)
    }

    pub fn price_at(&self, index: usize) -> Option<f64> {
        self.points.get(index).and_then(|p| p.price)
    }

    /// Move every price `periods` rows later, keeping dates in place. The
    /// first `periods` rows become undefined.
    pub fn shifted(&self, periods: usize) -> PriceSeries {
        let points = self
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| PricePoint {
                date: p.date,
                price: if i >= periods {
                    self.points[i - periods].price
                } else {
                    None
                },
            })
            .collect();
        PriceSeries { points }
    }

    /// Number of leading rows without a price.
    pub fn leading_gap(&self) -> usize {
        self.points.iter().take_while(|p| p.price.is_none()).count()
    }
}

pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Every Monday–Friday date in `[start, end]`. Empty if `end < start`.
pub fn business_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| is_business_day(*d))
        .collect()
}

pub fn normalize_calendar(raw: &[DailyClose], start: NaiveDate, end: NaiveDate) -> PriceSeries {
    // Later rows for the same date overwrite earlier ones.
    let observed: BTreeMap<NaiveDate, f64> = raw
        .iter()
        .filter(|c| c.date >= start && c.date <= end && c.close.is_finite())
        .map(|c| (c.date, c.close))
        .collect();

    let mut last: Option<f64> = None;
    let points = business_days(start, end)
        .into_iter()
        .map(|date| {
            if let Some(&price) = observed.get(&date) {
                last = Some(price);
            }
            PricePoint { date, price: last }
        })
        .collect();

    PriceSeries { points }
}
