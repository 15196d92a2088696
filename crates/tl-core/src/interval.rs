//! Civil timestamp parsing and interval arithmetic.
//!
//! All timestamps are civil local times with no offset attached. Arithmetic is
//! plain calendar arithmetic: no time zone or DST adjustments are applied.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::ParseError;

/// Format of entry timestamps (`2024-01-05 23:00:00`).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format of day keys and filter dates (`2024-01-05`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD HH:MM:SS` timestamp.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, ParseError> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).map_err(|source| {
        ParseError::InvalidTimestamp {
            value: s.to_string(),
            source,
        }
    })
}

/// Parses a `YYYY-MM-DD` civil date.
pub fn parse_date(s: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|source| ParseError::InvalidDate {
        value: s.to_string(),
        source,
    })
}

/// Minutes elapsed from `start` to `end`, at millisecond resolution.
///
/// Negative when `end` is before `start`.
#[allow(clippy::cast_precision_loss)]
pub fn duration_minutes(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    (end - start).num_milliseconds() as f64 / 60_000.0
}

/// Formats the civil date of `dt` as a `YYYY-MM-DD` day key.
pub fn day_key(dt: &NaiveDateTime) -> String {
    dt.format(DATE_FORMAT).to_string()
}

/// `00:00:00.000` on `date`.
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// `00:00:00.000` on the day after `date`.
pub fn start_of_next_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + Duration::days(1)
}

/// The end-of-day anchor `23:59:59.999` on `date`.
///
/// Day splitting credits the first day of a crossing entry up to this instant,
/// so each crossed midnight drops one millisecond.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_next_day(date) - Duration::milliseconds(1)
}

/// The last whole second of `date` (`23:59:59`), the inclusive upper bound of
/// a date-range filter.
pub fn last_second_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_next_day(date) - Duration::seconds(1)
}
