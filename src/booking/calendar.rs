//! Date arithmetic behind the date rules.

use chrono::{Datelike, NaiveDate, TimeDelta};

/// Complete a possibly partial calendar date against `today`.
///
/// Omitted fields come from `today`. If the result lies in the past, the
/// smallest omitted field is advanced: first the month (December wraps to
/// January), then the year. Returns `None` for a day that does not exist in
/// the resulting month.
#[must_use]
pub fn roll_forward(
    today: NaiveDate,
    year: Option<i32>,
    month: Option<u32>,
    day: u32,
) -> Option<NaiveDate> {
    let year0 = year.unwrap_or_else(|| today.year());
    let month0 = month.unwrap_or_else(|| today.month());
    let mut date = NaiveDate::from_ymd_opt(year0, month0, day)?;

    if date < today && month.is_none() {
        date = if month0 < 12 {
            date.with_month(month0 + 1)?
        } else {
            NaiveDate::from_ymd_opt(year0, 1, day)?
        };
    }
    if date < today && year.is_none() {
        date = date.with_year(year0 + 1)?;
    }
    Some(date)
}

/// Monday of the week containing `date`.
#[must_use]
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - TimeDelta::days(i64::from(date.weekday().num_days_from_monday()))
}

/// The first Monday strictly after `date`.
#[must_use]
pub fn next_monday(date: NaiveDate) -> NaiveDate {
    date + TimeDelta::days(7 - i64::from(date.weekday().num_days_from_monday()))
}

/// The first day on or after `from` that falls on `weekday` (0 = Monday).
#[must_use]
pub fn first_weekday_from(from: NaiveDate, weekday: u32) -> NaiveDate {
    let current = from.weekday().num_days_from_monday();
    let offset = (weekday + 7 - current) % 7;
    from + TimeDelta::days(i64::from(offset))
}
