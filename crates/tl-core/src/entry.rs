//! Timeline entries as supplied by the data source.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{ParseError, ValidationError};
use crate::interval::{duration_minutes, parse_timestamp};
use crate::label::split_labels;

/// One timed activity record.
///
/// Timestamps are kept as the raw strings supplied by the source and parsed
/// on demand, so a malformed record only fails the pass that reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    /// Start time, `YYYY-MM-DD HH:MM:SS`.
    #[serde(default)]
    pub start_time: String,
    /// End time, `YYYY-MM-DD HH:MM:SS`.
    #[serde(default)]
    pub end_time: String,
    /// Composite content labels separated by `/`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Free-form remarks. Not used by aggregation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

impl TimelineEntry {
    /// Creates an entry without remarks.
    pub fn new(
        start_time: impl Into<String>,
        end_time: impl Into<String>,
        content: Option<&str>,
    ) -> Self {
        Self {
            start_time: start_time.into(),
            end_time: end_time.into(),
            content: content.map(str::to_string),
            remarks: None,
        }
    }

    /// Parsed start timestamp.
    pub fn start(&self) -> Result<NaiveDateTime, ParseError> {
        parse_timestamp(&self.start_time)
    }

    /// Parsed end timestamp.
    pub fn end(&self) -> Result<NaiveDateTime, ParseError> {
        parse_timestamp(&self.end_time)
    }

    /// Elapsed minutes between start and end. May be negative.
    pub fn duration_minutes(&self) -> Result<f64, ParseError> {
        Ok(duration_minutes(self.start()?, self.end()?))
    }

    /// Labels of this entry's content, see [`split_labels`].
    pub fn labels(&self) -> Vec<&str> {
        split_labels(self.content.as_deref())
    }

    /// Checks that both timestamps parse and the entry does not end before it starts.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.end()? < self.start()? {
            return Err(ValidationError::NegativeDuration {
                start: self.start_time.clone(),
                end: self.end_time.clone(),
            });
        }
        Ok(())
    }
}

/// Validates every entry, reporting the first failure with its position.
pub fn validate_entries(entries: &[TimelineEntry]) -> Result<(), ValidationError> {
    for (index, entry) in entries.iter().enumerate() {
        entry
            .validate()
            .map_err(|source| ValidationError::InvalidEntry {
                index,
                source: Box::new(source),
            })?;
    }
    Ok(())
}

/// The document shape of a timeline data file: `{ "timeline": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    #[serde(default)]
    pub timeline: Vec<TimelineEntry>,
}

impl Timeline {
    /// Parses a timeline document from JSON text.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
