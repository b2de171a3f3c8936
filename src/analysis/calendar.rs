//! Calendar arithmetic for date-based grouping.
//!
//! Polars stores `Date` columns as days since the Unix epoch; the pipeline
//! needs to move between that representation and `NaiveDate`, and to anchor
//! monthly periods at their month-end date.

use chrono::{Duration, NaiveDate};
use polars::prelude::*;

/// The Unix epoch, day zero of a polars `Date` column.
fn epoch() -> NaiveDate {
    NaiveDate::default()
}

/// Converts a polars date (days since the epoch) to a calendar date.
pub fn from_epoch_days(days: i32) -> NaiveDate {
    epoch() + Duration::days(days as i64)
}

/// Converts a calendar date to days since the epoch.
pub fn to_epoch_days(date: NaiveDate) -> i32 {
    (date - epoch()).num_days() as i32
}

/// The last day of the given calendar month, or `None` when the month is
/// out of range.
pub fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let first_of_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;
    Some(first_of_next - Duration::days(1))
}

/// Builds a polars `Date` column from optional calendar dates.
pub fn date_column(name: &str, dates: &[Option<NaiveDate>]) -> PolarsResult<Column> {
    let days: Vec<Option<i32>> = dates.iter().map(|d| d.map(to_epoch_days)).collect();
    Column::new(name.into(), days).cast(&DataType::Date)
}
