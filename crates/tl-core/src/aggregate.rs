//! Aggregation of timeline entries into content, daily and hourly statistics.
//!
//! # Algorithm Summary
//!
//! Each entry is folded into three maps independently:
//!
//! 1. Hourly: the full duration goes to the hour of the entry's start.
//! 2. Content: the full duration goes to every label of the entry's content.
//! 3. Daily: the duration is split across every civil day the entry touches.
//!    Every day but the last is credited up to its `23:59:59.999` anchor, the
//!    last day from midnight to the entry's end. Each touched day counts the
//!    entry once, so `count` means "entries active that day".
//!
//! The fold is pure: every call builds fresh maps and nothing is cached.

use std::collections::BTreeMap;

use chrono::{NaiveDateTime, Timelike};
use rayon::prelude::*;
use serde::Serialize;

use crate::entry::TimelineEntry;
use crate::error::ParseError;
use crate::interval::{day_key, duration_minutes, end_of_day, start_of_next_day};

/// Accumulated duration and occurrence count for one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Stat {
    /// Total minutes credited to this bucket.
    pub duration_minutes: f64,
    /// Number of entries that touched this bucket.
    pub count: u32,
}

impl Stat {
    /// Credits `minutes` from one entry.
    fn record(&mut self, minutes: f64) {
        self.duration_minutes += minutes;
        self.count += 1;
    }

    /// Adds another accumulator into this one.
    pub fn merge(&mut self, other: Self) {
        self.duration_minutes += other.duration_minutes;
        self.count += other.count;
    }

    /// Total duration in hours.
    pub fn hours(&self) -> f64 {
        self.duration_minutes / 60.0
    }
}

/// Label → statistics.
pub type ContentStats = BTreeMap<String, Stat>;

/// `YYYY-MM-DD` day key → statistics.
pub type DailyStats = BTreeMap<String, Stat>;

/// Start hour (0–23) → statistics.
pub type HourlyStats = BTreeMap<u32, Stat>;

/// The three statistics tables produced by one aggregation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aggregates {
    pub content: ContentStats,
    pub daily: DailyStats,
    pub hourly: HourlyStats,
}

impl Aggregates {
    /// Folds one entry into the tables.
    fn with_entry(mut self, entry: &TimelineEntry) -> Result<Self, ParseError> {
        let start = entry.start()?;
        let end = entry.end()?;
        let duration = duration_minutes(start, end);

        self.hourly
            .entry(start.hour())
            .or_default()
            .record(duration);

        for label in entry.labels() {
            self.content
                .entry(label.to_string())
                .or_default()
                .record(duration);
        }

        credit_days(&mut self.daily, start, end, duration);
        Ok(self)
    }

    /// Combines two partial results key by key.
    ///
    /// Addition is commutative and associative, so partitions may be merged in
    /// any order.
    pub fn merge(mut self, other: Self) -> Self {
        merge_into(&mut self.content, other.content);
        merge_into(&mut self.daily, other.daily);
        merge_into(&mut self.hourly, other.hourly);
        self
    }
}

fn merge_into<K: Ord>(target: &mut BTreeMap<K, Stat>, source: BTreeMap<K, Stat>) {
    for (key, stat) in source {
        target.entry(key).or_default().merge(stat);
    }
}

/// Splits one entry's duration across the civil days it touches.
fn credit_days(daily: &mut DailyStats, start: NaiveDateTime, end: NaiveDateTime, duration: f64) {
    let end_date = end.date();

    // Same day, or an entry that ends before it starts.
    if end_date <= start.date() {
        daily.entry(day_key(&start)).or_default().record(duration);
        return;
    }

    let mut segment_start = start;
    while segment_start.date() < end_date {
        let date = segment_start.date();
        daily
            .entry(day_key(&segment_start))
            .or_default()
            .record(duration_minutes(segment_start, end_of_day(date)));
        segment_start = start_of_next_day(date);
    }

    daily
        .entry(day_key(&end))
        .or_default()
        .record(duration_minutes(segment_start, end));
}

/// Aggregates entries into content, daily and hourly statistics.
///
/// Fails on the first entry with a malformed timestamp. Zero and negative
/// durations are accumulated as-is.
pub fn aggregate(entries: &[TimelineEntry]) -> Result<Aggregates, ParseError> {
    entries
        .iter()
        .try_fold(Aggregates::default(), |acc, entry| acc.with_entry(entry))
}

/// Parallel variant of [`aggregate`].
///
/// Entries are partitioned across the rayon pool, folded independently and
/// merged. Durations match [`aggregate`] up to floating-point summation order.
pub fn aggregate_par(entries: &[TimelineEntry]) -> Result<Aggregates, ParseError> {
    entries
        .par_iter()
        .try_fold(Aggregates::default, |acc, entry| acc.with_entry(entry))
        .try_reduce(Aggregates::default, |a, b| Ok(a.merge(b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 0.001;

    fn entry(start: &str, end: &str, content: Option<&str>) -> TimelineEntry {
        TimelineEntry::new(start, end, content)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= TOLERANCE,
            "expected {expected}, got {actual}"
        );
    }

    fn assert_stat(stat: Option<&Stat>, minutes: f64, count: u32) {
        let stat = stat.expect("bucket should exist");
        assert_close(stat.duration_minutes, minutes);
        assert_eq!(stat.count, count);
    }

    #[test]
    fn midnight_crossing_scenario() {
        let entries = vec![entry(
            "2024-01-05 23:00:00",
            "2024-01-06 01:00:00",
            Some("闲聊"),
        )];
        let result = aggregate(&entries).unwrap();

        assert_stat(result.daily.get("2024-01-05"), 60.0, 1);
        assert_stat(result.daily.get("2024-01-06"), 60.0, 1);
        assert_stat(result.hourly.get(&23), 120.0, 1);
        assert_stat(result.content.get("闲聊"), 120.0, 1);
        assert_eq!(result.daily.len(), 2);
        assert_eq!(result.hourly.len(), 1);
    }

    #[test]
    fn same_day_entry_credits_one_bucket() {
        let entries = vec![entry("2024-01-05 10:15:00", "2024-01-05 12:45:00", Some("A"))];
        let result = aggregate(&entries).unwrap();

        assert_eq!(result.daily.len(), 1);
        assert_stat(result.daily.get("2024-01-05"), 150.0, 1);
        assert_stat(result.hourly.get(&10), 150.0, 1);
    }

    #[test]
    fn first_day_stops_at_end_of_day_anchor() {
        let entries = vec![entry("2024-01-05 23:00:00", "2024-01-06 01:00:00", None)];
        let result = aggregate(&entries).unwrap();

        let first = result.daily["2024-01-05"].duration_minutes;
        let second = result.daily["2024-01-06"].duration_minutes;
        // One millisecond short of a full hour.
        assert!((first - (60.0 - 1.0 / 60_000.0)).abs() < 1e-9);
        assert!((second - 60.0).abs() < 1e-9);
    }

    #[test]
    fn crossing_entry_conserves_duration() {
        let entries = vec![
            entry("2024-01-05 22:17:31", "2024-01-06 03:02:09", None),
            entry("2024-02-28 18:00:00", "2024-02-29 00:30:00", None),
            entry("2024-12-31 23:59:59", "2025-01-01 00:00:01", None),
        ];
        for e in &entries {
            let result = aggregate(std::slice::from_ref(e)).unwrap();
            let split: f64 = result.daily.values().map(|s| s.duration_minutes).sum();
            assert_close(split, e.duration_minutes().unwrap());
            assert!(result.daily.values().all(|s| s.count == 1));
        }
    }

    #[test]
    fn crossing_entry_counts_in_both_days_but_once_elsewhere() {
        let entries = vec![entry(
            "2024-01-05 20:00:00",
            "2024-01-06 02:00:00",
            Some("游戏 / 聊天"),
        )];
        let result = aggregate(&entries).unwrap();

        let daily_count: u32 = result.daily.values().map(|s| s.count).sum();
        let hourly_count: u32 = result.hourly.values().map(|s| s.count).sum();
        assert_eq!(daily_count, 2);
        assert_eq!(hourly_count, 1);
        assert_stat(result.content.get("游戏"), 360.0, 1);
        assert_stat(result.content.get("聊天"), 360.0, 1);
    }

    #[test]
    fn entry_ending_at_midnight_touches_next_day_with_zero() {
        let entries = vec![entry("2024-01-05 23:00:00", "2024-01-06 00:00:00", None)];
        let result = aggregate(&entries).unwrap();

        assert_stat(result.daily.get("2024-01-05"), 60.0, 1);
        assert_stat(result.daily.get("2024-01-06"), 0.0, 1);
    }

    #[test]
    fn multi_day_span_splits_across_every_day() {
        let entries = vec![entry("2024-01-05 12:00:00", "2024-01-08 06:00:00", None)];
        let result = aggregate(&entries).unwrap();

        let days: Vec<&str> = result.daily.keys().map(String::as_str).collect();
        assert_eq!(
            days,
            vec!["2024-01-05", "2024-01-06", "2024-01-07", "2024-01-08"]
        );
        assert_stat(result.daily.get("2024-01-05"), 720.0, 1);
        assert_stat(result.daily.get("2024-01-06"), 1440.0, 1);
        assert_stat(result.daily.get("2024-01-07"), 1440.0, 1);
        assert_stat(result.daily.get("2024-01-08"), 360.0, 1);

        let split: f64 = result.daily.values().map(|s| s.duration_minutes).sum();
        assert_close(split, entries[0].duration_minutes().unwrap());
    }

    #[test]
    fn hourly_uses_start_hour_only() {
        let entries = vec![
            entry("2024-01-05 09:59:00", "2024-01-05 13:00:00", None),
            entry("2024-01-06 09:00:00", "2024-01-06 09:30:00", None),
        ];
        let result = aggregate(&entries).unwrap();

        assert_eq!(result.hourly.len(), 1);
        assert_stat(result.hourly.get(&9), 181.0 + 30.0, 2);
    }

    #[test]
    fn duplicate_labels_within_entry_count_twice() {
        let entries = vec![entry("2024-01-05 10:00:00", "2024-01-05 11:00:00", Some("A / A"))];
        let result = aggregate(&entries).unwrap();

        assert_stat(result.content.get("A"), 120.0, 2);
    }

    #[test]
    fn entries_without_content_skip_content_stats() {
        let entries = vec![
            entry("2024-01-05 10:00:00", "2024-01-05 11:00:00", None),
            entry("2024-01-05 12:00:00", "2024-01-05 13:00:00", Some(" / ")),
        ];
        let result = aggregate(&entries).unwrap();

        assert!(result.content.is_empty());
        assert_stat(result.daily.get("2024-01-05"), 120.0, 2);
    }

    #[test]
    fn zero_and_negative_durations_are_accumulated() {
        let entries = vec![
            entry("2024-01-05 10:00:00", "2024-01-05 10:00:00", Some("A")),
            entry("2024-01-05 11:00:00", "2024-01-05 10:30:00", Some("A")),
        ];
        let result = aggregate(&entries).unwrap();

        assert_stat(result.content.get("A"), -30.0, 2);
        assert_stat(result.daily.get("2024-01-05"), -30.0, 2);
    }

    #[test]
    fn negative_entry_across_midnight_stays_on_start_day() {
        let entries = vec![entry("2024-01-06 01:00:00", "2024-01-05 23:00:00", None)];
        let result = aggregate(&entries).unwrap();

        assert_eq!(result.daily.len(), 1);
        assert_stat(result.daily.get("2024-01-06"), -120.0, 1);
    }

    #[test]
    fn malformed_timestamp_aborts_pass() {
        let entries = vec![
            entry("2024-01-05 10:00:00", "2024-01-05 11:00:00", None),
            entry("2024-01-05 12:00", "2024-01-05 13:00:00", None),
        ];
        let err = aggregate(&entries).unwrap_err();
        assert!(matches!(err, ParseError::InvalidTimestamp { ref value, .. } if value == "2024-01-05 12:00"));
    }

    #[test]
    fn empty_input_yields_empty_tables() {
        assert_eq!(aggregate(&[]).unwrap(), Aggregates::default());
        assert_eq!(aggregate_par(&[]).unwrap(), Aggregates::default());
    }

    #[test]
    fn input_order_does_not_change_result() {
        let mut entries = vec![
            entry("2024-01-05 23:00:00", "2024-01-06 01:00:00", Some("A / B")),
            entry("2024-01-06 08:00:00", "2024-01-06 09:00:00", Some("B")),
            entry("2024-01-04 08:00:00", "2024-01-04 09:30:00", Some("C")),
        ];
        let forward = aggregate(&entries).unwrap();
        entries.reverse();
        let backward = aggregate(&entries).unwrap();

        assert_eq!(forward.content, backward.content);
        assert_eq!(forward.hourly, backward.hourly);
        assert_eq!(forward.daily.keys().collect::<Vec<_>>(), backward.daily.keys().collect::<Vec<_>>());
    }

    #[test]
    fn parallel_matches_sequential() {
        let entries: Vec<TimelineEntry> = (0..500)
            .map(|i| {
                let day = 1 + i % 28;
                let hour = (i * 7) % 24;
                let start = format!("2024-03-{day:02} {hour:02}:00:00");
                let end = format!("2024-03-{:02} {:02}:30:00", day + 1, (hour + 3) % 24);
                let content = format!("L{} / L{}", i % 5, i % 3);
                TimelineEntry::new(start, end, Some(&content))
            })
            .collect();

        let sequential = aggregate(&entries).unwrap();
        let parallel = aggregate_par(&entries).unwrap();

        assert_eq!(sequential.content.len(), parallel.content.len());
        assert_eq!(sequential.daily.len(), parallel.daily.len());
        assert_eq!(sequential.hourly.len(), parallel.hourly.len());
        for (key, stat) in &sequential.daily {
            let other = parallel.daily[key];
            assert_eq!(stat.count, other.count);
            assert_close(stat.duration_minutes, other.duration_minutes);
        }
        for (key, stat) in &sequential.content {
            let other = parallel.content[key];
            assert_eq!(stat.count, other.count);
            assert_close(stat.duration_minutes, other.duration_minutes);
        }
    }

    #[test]
    fn parallel_propagates_parse_error() {
        let entries = vec![
            entry("2024-01-05 10:00:00", "2024-01-05 11:00:00", None),
            entry("bad", "2024-01-05 11:00:00", None),
        ];
        assert!(aggregate_par(&entries).is_err());
    }

    #[test]
    fn merge_adds_overlapping_keys() {
        let a = aggregate(&[entry("2024-01-05 10:00:00", "2024-01-05 11:00:00", Some("A"))]).unwrap();
        let b = aggregate(&[entry("2024-01-05 10:30:00", "2024-01-05 11:00:00", Some("A / B"))]).unwrap();
        let merged = a.merge(b);

        assert_stat(merged.content.get("A"), 90.0, 2);
        assert_stat(merged.content.get("B"), 30.0, 1);
        assert_stat(merged.hourly.get(&10), 90.0, 2);
        assert_stat(merged.daily.get("2024-01-05"), 90.0, 2);
    }
}
