//! Inclusive civil date-range filtering.

use std::borrow::Cow;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::entry::TimelineEntry;
use crate::error::ParseError;
use crate::interval::{last_second_of_day, parse_date, start_of_day};

/// An optional, inclusive civil date range.
///
/// A missing bound leaves that side unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// The unbounded range.
    pub const ALL: Self = Self {
        start: None,
        end: None,
    };

    /// Builds a range from optional `YYYY-MM-DD` strings.
    ///
    /// Absent or blank strings are treated as unbounded.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, ParseError> {
        Ok(Self {
            start: parse_bound(start)?,
            end: parse_bound(end)?,
        })
    }

    /// Returns true if neither bound is set.
    pub const fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Tests a start timestamp against `start 00:00:00 ..= end 23:59:59`.
    pub fn contains(&self, dt: NaiveDateTime) -> bool {
        if self.start.is_some_and(|start| dt < start_of_day(start)) {
            return false;
        }
        if self.end.is_some_and(|end| dt > last_second_of_day(end)) {
            return false;
        }
        true
    }
}

fn parse_bound(value: Option<&str>) -> Result<Option<NaiveDate>, ParseError> {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => parse_date(value).map(Some),
        _ => Ok(None),
    }
}

/// Selects the entries whose start timestamp falls within `range`.
///
/// Only the start is tested: an entry starting inside the range is kept whole
/// even if it ends after it. With an unbounded range the input slice is
/// returned as-is without parsing anything.
pub fn filter_by_range<'a>(
    entries: &'a [TimelineEntry],
    range: &DateRange,
) -> Result<Cow<'a, [TimelineEntry]>, ParseError> {
    if range.is_unbounded() {
        return Ok(Cow::Borrowed(entries));
    }

    let mut kept = Vec::new();
    for entry in entries {
        if range.contains(entry.start()?) {
            kept.push(entry.clone());
        }
    }
    tracing::trace!(total = entries.len(), kept = kept.len(), "filtered entries");
    Ok(Cow::Owned(kept))
}
