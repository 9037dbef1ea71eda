//! Calendar arithmetic on time-zone-agnostic dates.
//!
//! Two month-adding rules live here and must not be merged:
//!
//! | start      | months | [`add_months_rollover`] | [`add_months_clamped`] |
//! |------------|--------|-------------------------|------------------------|
//! | 2023-01-31 | 1      | 2023-03-03              | 2023-02-28             |
//! | 2024-01-31 | 1      | 2024-03-02              | 2024-02-29             |
//! | 2023-03-31 | 1      | 2023-05-01              | 2023-04-30             |
//! | 2024-02-29 | 12     | 2025-03-01              | 2025-02-28             |
//!
//! Rollover drives interest accrual, the clamp drives installment dates.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime};
use hourglass_rs::SafeTimeProvider;

use crate::errors::{Result, ScheduleError};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// parse a date, keeping the calendar date exactly as written
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date);
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(datetime.date());
        }
    }

    // the offset is ignored so a timestamp never shifts to a neighbouring day
    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(datetime.date_naive());
    }

    Err(ScheduleError::InvalidDate {
        input: input.to_string(),
    })
}

/// parse a date, falling back to the clock's current date when unparseable
pub fn normalize(input: &str, clock: &SafeTimeProvider) -> NaiveDate {
    match parse_date(input) {
        Ok(date) => date,
        Err(_) => {
            let today = clock.now().date_naive();
            log::warn!("unparseable date {:?}, falling back to {}", input, today);
            today
        }
    }
}

/// whole days from `start` to `end`, zero when `end` precedes `start`
pub fn days_between(start: NaiveDate, end: NaiveDate) -> u32 {
    let days = (end - start).num_days();
    if days <= 0 {
        0
    } else {
        u32::try_from(days).unwrap_or(u32::MAX)
    }
}

/// advance by `months`, keeping the day and rolling an overflowing day forward
/// into the following month. `None` only past chrono's representable range.
pub fn add_months_rollover(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    let (year, month) = shift_month(date.year(), date.month(), months)?;
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    first.checked_add_days(Days::new(u64::from(date.day() - 1)))
}

/// advance by `months`, keeping the day but clamping it to the last day of the
/// target month when that month is shorter.
pub fn add_months_clamped(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    let (year, month) = shift_month(date.year(), date.month(), months)?;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
}

fn shift_month(year: i32, month: u32, months: u32) -> Option<(i32, u32)> {
    let index = i64::from(year) * 12 + i64::from(month - 1) + i64::from(months);
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    let month = u32::try_from(index.rem_euclid(12)).ok()? + 1;
    Some((year, month))
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use hourglass_rs::TimeSource;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_formats() {
        assert_eq!(parse_date("2024-03-15").unwrap(), d(2024, 3, 15));
        assert_eq!(parse_date(" 2024/03/15 ").unwrap(), d(2024, 3, 15));
        assert_eq!(parse_date("2024-03-15T10:30:00").unwrap(), d(2024, 3, 15));
        assert_eq!(parse_date("2024-03-15 23:59:59.250").unwrap(), d(2024, 3, 15));
    }

    #[test]
    fn test_parse_rfc3339_keeps_written_date() {
        // late evening west of UTC is already the next day in UTC
        assert_eq!(parse_date("2024-03-15T23:30:00-05:00").unwrap(), d(2024, 3, 15));
        assert_eq!(parse_date("2024-03-15T00:30:00+09:00").unwrap(), d(2024, 3, 15));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_date("not a date").is_err());
        assert!(parse_date("2023-02-30").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_normalize_falls_back_to_clock() {
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
        ));

        assert_eq!(normalize("2024-01-31", &time), d(2024, 1, 31));
        assert_eq!(normalize("31st of never", &time), d(2024, 6, 1));
    }

    #[test]
    fn test_days_between() {
        assert_eq!(days_between(d(2024, 1, 1), d(2024, 2, 1)), 31);
        assert_eq!(days_between(d(2024, 2, 1), d(2024, 3, 1)), 29);
        assert_eq!(days_between(d(2023, 2, 1), d(2023, 3, 1)), 28);
        assert_eq!(days_between(d(2024, 3, 1), d(2024, 3, 1)), 0);
        // reversed order clamps to zero
        assert_eq!(days_between(d(2024, 3, 1), d(2024, 2, 1)), 0);
    }

    #[test]
    fn test_rollover_month_end_table() {
        let cases = [
            (d(2023, 1, 31), 1, d(2023, 3, 3)),
            (d(2024, 1, 31), 1, d(2024, 3, 2)),
            (d(2024, 1, 30), 1, d(2024, 3, 1)),
            (d(2024, 1, 29), 1, d(2024, 2, 29)),
            (d(2023, 1, 29), 1, d(2023, 3, 1)),
            (d(2023, 1, 28), 1, d(2023, 2, 28)),
            (d(2023, 3, 31), 1, d(2023, 5, 1)),
            (d(2023, 8, 31), 1, d(2023, 10, 1)),
            (d(2023, 7, 31), 1, d(2023, 8, 31)),
            (d(2023, 12, 31), 2, d(2024, 3, 2)),
            (d(2024, 2, 29), 12, d(2025, 3, 1)),
            (d(2023, 1, 15), 12, d(2024, 1, 15)),
            (d(2024, 1, 31), 0, d(2024, 1, 31)),
        ];

        for (start, months, expected) in cases {
            assert_eq!(
                add_months_rollover(start, months),
                Some(expected),
                "{} + {}",
                start,
                months
            );
        }
    }

    #[test]
    fn test_clamped_month_end_table() {
        let cases = [
            (d(2023, 1, 31), 1, d(2023, 2, 28)),
            (d(2024, 1, 31), 1, d(2024, 2, 29)),
            (d(2023, 1, 31), 2, d(2023, 3, 31)),
            (d(2023, 1, 31), 3, d(2023, 4, 30)),
            (d(2023, 11, 30), 3, d(2024, 2, 29)),
            (d(2024, 2, 29), 12, d(2025, 2, 28)),
            (d(2023, 8, 31), 1, d(2023, 9, 30)),
            (d(2023, 12, 31), 0, d(2023, 12, 31)),
            (d(2023, 5, 15), 20, d(2025, 1, 15)),
        ];

        for (start, months, expected) in cases {
            assert_eq!(add_months_clamped(start, months), Some(expected), "{} + {}", start, months);
        }
    }

    #[test]
    fn test_rules_agree_when_day_exists() {
        for months in 0..36 {
            let start = d(2023, 1, 28);
            assert_eq!(add_months_rollover(start, months), add_months_clamped(start, months));
        }
    }

    #[test]
    fn test_leap_year() {
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(2023));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2023, 4), 30);
        assert_eq!(days_in_month(2023, 12), 31);
    }
}
