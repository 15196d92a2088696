//! Stats command for content, daily and hourly statistics.
//!
//! This module implements `tl stats` with an optional date range (`--from`,
//! `--to`) and output formats (human-readable, JSON). The JSON output carries
//! chart-ready series: top labels by count, every day in order, and all 24
//! hours with empty hours zero-filled.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;
use serde::Serialize;
use tl_core::interval::TIMESTAMP_FORMAT;
use tl_core::{
    AggregateSummary, Aggregates, ContentStats, DateRange, HourlyStats, Stat, TimelineEntry,
    aggregate, aggregate_par, filter_by_range, round_tenth, summarize, validate_entries,
};

use crate::Config;
use crate::source::load_timeline;

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// First day to include (YYYY-MM-DD).
    #[arg(long, value_name = "DATE")]
    pub from: Option<String>,

    /// Last day to include (YYYY-MM-DD).
    #[arg(long, value_name = "DATE")]
    pub to: Option<String>,

    /// Number of content labels to show. Defaults to `top_content` from config.
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Statistics computed for one date range.
#[derive(Debug)]
pub struct StatsData {
    pub range: DateRange,
    pub summary: AggregateSummary,
    pub aggregates: Aggregates,
}

// ========== Computation ==========

/// Filters entries to `range` and computes aggregates and summary.
///
/// Aggregation moves to the rayon pool once the filtered list reaches
/// `parallel_threshold` entries.
pub fn compute_stats(
    entries: &[TimelineEntry],
    range: DateRange,
    parallel_threshold: usize,
) -> Result<StatsData> {
    let filtered = filter_by_range(entries, &range)?;
    tracing::debug!(
        total = entries.len(),
        in_range = filtered.len(),
        "applied date range"
    );

    let aggregates = if filtered.len() >= parallel_threshold {
        tracing::debug!(threshold = parallel_threshold, "aggregating in parallel");
        aggregate_par(&filtered)?
    } else {
        aggregate(&filtered)?
    };
    let summary = summarize(&filtered)?;

    Ok(StatsData {
        range,
        summary,
        aggregates,
    })
}

/// Labels sorted by count descending, ties by label, cut to `limit`.
pub fn top_content(content: &ContentStats, limit: usize) -> Vec<(&str, Stat)> {
    let mut sorted: Vec<_> = content
        .iter()
        .map(|(label, stat)| (label.as_str(), *stat))
        .collect();
    sorted.sort_by_key(|(_, stat)| std::cmp::Reverse(stat.count));
    sorted.truncate(limit);
    sorted
}

/// All 24 hours of the day, with empty hours zero-filled.
pub fn hourly_series(hourly: &HourlyStats) -> Vec<(u32, Stat)> {
    (0..24)
        .map(|hour| (hour, hourly.get(&hour).copied().unwrap_or_default()))
        .collect()
}

// ========== Formatting Helpers ==========

/// Formats minutes as "Xh Ym" if >= 1 hour, "Xm" otherwise.
/// Rounds to the nearest minute; non-positive durations are "0m".
#[allow(clippy::cast_possible_truncation)]
pub fn format_duration(minutes: f64) -> String {
    if minutes <= 0.0 {
        return "0m".to_string();
    }
    let total_minutes = minutes.round() as i64;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours >= 1 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Generates a 10-character progress bar.
/// Values <5% of max get a single block for visibility.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn progress_bar(value: f64, max: f64) -> String {
    if max <= 0.0 {
        return "░░░░░░░░░░".to_string();
    }

    let ratio = value / max;
    let filled = if ratio < 0.05 && value > 0.0 {
        1
    } else {
        (ratio * 10.0).round().clamp(0.0, 10.0) as usize
    };

    let empty = 10 - filled;
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

/// Rounds hours to two decimals, the precision the charts plot.
fn round_hundredth(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn describe_range(range: &DateRange) -> String {
    match (range.start, range.end) {
        (None, None) => "all dates".to_string(),
        (Some(start), Some(end)) => format!("{start} to {end}"),
        (Some(start), None) => format!("from {start}"),
        (None, Some(end)) => format!("through {end}"),
    }
}

// ========== Human-Readable Output ==========

/// Writes the human-readable report.
pub fn write_stats<W: Write>(writer: &mut W, data: &StatsData, top: usize) -> Result<()> {
    writeln!(writer, "TIMELINE STATS: {}", describe_range(&data.range))?;

    let summary = &data.summary;
    if summary.total_entry_count == 0 {
        writeln!(writer)?;
        writeln!(writer, "No entries recorded in this range.")?;
        return Ok(());
    }

    writeln!(writer)?;
    writeln!(writer, "SUMMARY")?;
    writeln!(writer, "───────")?;
    writeln!(
        writer,
        "Total hours:     {:.1}",
        round_tenth(summary.total_duration_hours)
    )?;
    writeln!(writer, "Entries:         {}", summary.total_entry_count)?;
    writeln!(
        writer,
        "Distinct labels: {}",
        summary.unique_content_label_count
    )?;
    writeln!(
        writer,
        "Average hours:   {:.1}",
        round_tenth(summary.average_duration_hours)
    )?;

    writeln!(writer)?;
    writeln!(writer, "TOP CONTENT")?;
    writeln!(writer, "───────────")?;
    let content = &data.aggregates.content;
    if content.is_empty() {
        writeln!(writer, "(no labelled entries)")?;
    }
    for (label, stat) in top_content(content, top) {
        let duration = format_duration(stat.duration_minutes);
        writeln!(writer, "{:>4}x  {duration:>8}  {label}", stat.count)?;
    }
    let remaining = content.len().saturating_sub(top);
    if remaining > 0 {
        writeln!(writer, "  ... and {remaining} more")?;
    }

    writeln!(writer)?;
    writeln!(writer, "BY DAY")?;
    writeln!(writer, "──────")?;
    let max_day = data
        .aggregates
        .daily
        .values()
        .map(|stat| stat.duration_minutes)
        .fold(0.0, f64::max);
    for (day, stat) in &data.aggregates.daily {
        let duration = format_duration(stat.duration_minutes);
        let bar = progress_bar(stat.duration_minutes, max_day);
        writeln!(writer, "{day}  {:>4}x  {duration:>8}  {bar}", stat.count)?;
    }

    writeln!(writer)?;
    writeln!(writer, "BY HOUR")?;
    writeln!(writer, "───────")?;
    for (hour, stat) in hourly_series(&data.aggregates.hourly) {
        let duration = format_duration(stat.duration_minutes);
        writeln!(writer, "{hour:>2}:00  {:>4}x  {duration:>8}", stat.count)?;
    }

    Ok(())
}

// ========== JSON Output ==========

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonStats {
    pub generated_at: String,
    pub range: DateRange,
    pub summary: JsonSummary,
    pub content: Vec<JsonLabel>,
    pub daily: Vec<JsonDay>,
    pub hourly: Vec<JsonHour>,
}

#[derive(Debug, Serialize)]
pub struct JsonSummary {
    pub total_hours: f64,
    pub entry_count: usize,
    pub unique_label_count: usize,
    pub average_hours: f64,
}

#[derive(Debug, Serialize)]
pub struct JsonLabel {
    pub label: String,
    pub count: u32,
    pub hours: f64,
}

#[derive(Debug, Serialize)]
pub struct JsonDay {
    pub date: String,
    pub count: u32,
    pub hours: f64,
}

#[derive(Debug, Serialize)]
pub struct JsonHour {
    pub hour: u32,
    pub count: u32,
    pub hours: f64,
}

/// Builds the JSON report structure.
pub fn json_stats(data: &StatsData, top: usize, generated_at: String) -> JsonStats {
    let summary = &data.summary;
    JsonStats {
        generated_at,
        range: data.range,
        summary: JsonSummary {
            total_hours: round_tenth(summary.total_duration_hours),
            entry_count: summary.total_entry_count,
            unique_label_count: summary.unique_content_label_count,
            average_hours: round_tenth(summary.average_duration_hours),
        },
        content: top_content(&data.aggregates.content, top)
            .into_iter()
            .map(|(label, stat)| JsonLabel {
                label: label.to_string(),
                count: stat.count,
                hours: round_hundredth(stat.hours()),
            })
            .collect(),
        daily: data
            .aggregates
            .daily
            .iter()
            .map(|(date, stat)| JsonDay {
                date: date.clone(),
                count: stat.count,
                hours: round_hundredth(stat.hours()),
            })
            .collect(),
        hourly: hourly_series(&data.aggregates.hourly)
            .into_iter()
            .map(|(hour, stat)| JsonHour {
                hour,
                count: stat.count,
                hours: round_hundredth(stat.hours()),
            })
            .collect(),
    }
}

// ========== Public Interface ==========

/// Runs the stats command.
pub fn run<W: Write>(writer: &mut W, args: &StatsArgs, config: &Config) -> Result<()> {
    let range = DateRange::parse(args.from.as_deref(), args.to.as_deref())
        .context("invalid date range")?;

    let entries = load_timeline(&config.data_path)?;
    validate_entries(&entries)
        .with_context(|| format!("invalid timeline in {}", config.data_path.display()))?;

    let data = compute_stats(&entries, range, config.parallel_threshold)?;
    let top = args.top.unwrap_or(config.top_content);

    if args.json {
        let generated_at = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let report = json_stats(&data, top, generated_at);
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        write_stats(writer, &data, top)?;
    }

    Ok(())
}
