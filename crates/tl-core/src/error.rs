//! Error types for timeline parsing and validation.

use thiserror::Error;

/// A timestamp or date string did not match the expected civil format.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The value is not a `YYYY-MM-DD HH:MM:SS` timestamp.
    #[error("invalid timestamp {value:?}: expected YYYY-MM-DD HH:MM:SS")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// The value is not a `YYYY-MM-DD` date.
    #[error("invalid date {value:?}: expected YYYY-MM-DD")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Validation errors for timeline entries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The entry ends before it starts.
    #[error("entry ends before it starts: {start} > {end}")]
    NegativeDuration { start: String, end: String },

    /// An entry in a list failed validation.
    #[error("entry {index} is invalid")]
    InvalidEntry {
        index: usize,
        #[source]
        source: Box<Self>,
    },

    /// A timestamp could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;
    use crate::interval::parse_timestamp;

    #[test]
    fn invalid_timestamp_message_names_value() {
        let err = parse_timestamp("yesterday").unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"invalid timestamp "yesterday": expected YYYY-MM-DD HH:MM:SS"#
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn invalid_entry_chains_source() {
        let inner = ValidationError::NegativeDuration {
            start: "2024-01-05 10:00:00".to_string(),
            end: "2024-01-05 09:00:00".to_string(),
        };
        let err = ValidationError::InvalidEntry {
            index: 3,
            source: Box::new(inner),
        };
        assert_eq!(err.to_string(), "entry 3 is invalid");
        assert_eq!(
            err.source().unwrap().to_string(),
            "entry ends before it starts: 2024-01-05 10:00:00 > 2024-01-05 09:00:00"
        );
    }
}
