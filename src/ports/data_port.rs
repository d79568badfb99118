//! Price data access port trait.

use crate::domain::error::CrossoverError;
use crate::domain::quote::DailyClose;
use chrono::NaiveDate;

pub trait DataPort {
    /// Daily closes for `ticker` within `[start_date, end_date]`, in date order.
    /// Missing trading days are simply absent.
    fn fetch_daily_closes(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<DailyClose>, CrossoverError>;
}
