//! Monthly due-date recurrence
//!
//! Advancing by a month keeps the day of month where it exists and clamps it
//! to the last day of the target month where it does not (Jan 31 → Feb 28, or
//! Feb 29 in a leap year). Each step clamps on its own, so repeated advances
//! drift towards the shorter day: Jan 31 → Feb 28 → Mar 28.

use chrono::{Datelike, NaiveDate};

/// The due date one calendar month after `date`
///
/// Total over every representable date; the very last month of chrono's
/// calendar saturates at [`NaiveDate::MAX`].
pub fn advance_one_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };

    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MAX)
}

/// Number of days in `month` (1-12) of `year`
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}
