//! Estimated delivery window.

use chrono::{Days, NaiveDate};
use serde::Serialize;

/// First and last expected delivery day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeliveryRange {
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
}

/// Delivery window starting from `today`.
///
/// Negative day counts are treated as zero and swapped bounds are normalized
/// so that `min_date <= max_date` always holds.
pub fn delivery_date_range(today: NaiveDate, min_days: i32, max_days: i32) -> DeliveryRange {
    let low = min_days.max(0).min(max_days.max(0));
    let high = min_days.max(0).max(max_days.max(0));

    DeliveryRange {
        min_date: add_days(today, low),
        max_date: add_days(today, high),
    }
}

fn add_days(date: NaiveDate, days: i32) -> NaiveDate {
    date.checked_add_days(Days::new(days.unsigned_abs() as u64))
        .unwrap_or(NaiveDate::MAX)
}
