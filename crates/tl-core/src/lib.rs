//! Core domain logic for timeline statistics.
//!
//! This crate contains the fundamental types and logic for:
//! - Interval math: parsing civil timestamps and measuring durations
//! - Label splitting: breaking composite content strings into labels
//! - Filtering: selecting entries by an inclusive civil date range
//! - Aggregation: per-content, per-day and per-hour statistics
//! - Summary: scalar rollups over a list of entries

mod aggregate;
pub mod entry;
pub mod error;
pub mod filter;
pub mod interval;
pub mod label;
mod summary;

pub use aggregate::{
    Aggregates, ContentStats, DailyStats, HourlyStats, Stat, aggregate, aggregate_par,
};
pub use entry::{Timeline, TimelineEntry, validate_entries};
pub use error::{ParseError, ValidationError};
pub use filter::{DateRange, filter_by_range};
pub use label::{split_display_labels, split_labels};
pub use summary::{AggregateSummary, round_tenth, summarize};
