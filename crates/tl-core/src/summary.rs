//! Scalar rollups over a list of entries.

use std::collections::HashSet;

use serde::Serialize;

use crate::entry::TimelineEntry;
use crate::error::ParseError;

/// Totals for a (possibly filtered) list of entries.
///
/// Values are unrounded; use [`round_tenth`] for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AggregateSummary {
    pub total_duration_hours: f64,
    pub total_entry_count: usize,
    pub unique_content_label_count: usize,
    /// Mean hours per entry, `0` for an empty list.
    pub average_duration_hours: f64,
}

/// Computes totals directly from the entries.
///
/// Distinct labels use the same splitting rule as the content statistics.
#[allow(clippy::cast_precision_loss)]
pub fn summarize(entries: &[TimelineEntry]) -> Result<AggregateSummary, ParseError> {
    let mut total_minutes = 0.0;
    let mut labels = HashSet::new();

    for entry in entries {
        total_minutes += entry.duration_minutes()?;
        labels.extend(entry.labels());
    }

    let total_entry_count = entries.len();
    let average_duration_hours = if total_entry_count > 0 {
        total_minutes / total_entry_count as f64 / 60.0
    } else {
        0.0
    };

    Ok(AggregateSummary {
        total_duration_hours: total_minutes / 60.0,
        total_entry_count,
        unique_content_label_count: labels.len(),
        average_duration_hours,
    })
}

/// Rounds to one decimal place for display.
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
