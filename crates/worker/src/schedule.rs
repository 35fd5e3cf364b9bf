//! Calendar arithmetic for the monthly reset.

use std::time::Duration;

use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// Midnight UTC on the first day of the month after `now`.
pub fn next_month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let (year, month) = if now.month() == 12 {
        (now.year() + 1, 1)
    } else {
        (now.year(), now.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or(now)
}

/// Time left until [`next_month_start`].
pub fn until_next_month(now: DateTime<Utc>) -> Duration {
    (next_month_start(now) - now).to_std().unwrap_or_default()
}
