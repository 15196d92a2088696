//! Loading timeline documents from disk.

use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use tl_core::{Timeline, TimelineEntry};

/// Reads the timeline entries from a JSON document.
///
/// A missing file yields an empty timeline so reports still render; any other
/// read failure or malformed JSON is an error.
pub fn load_timeline(path: &Path) -> Result<Vec<TimelineEntry>> {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "timeline file not found, using empty timeline");
            return Ok(Vec::new());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read {}", path.display()));
        }
    };

    let document = Timeline::from_json(&json)
        .with_context(|| format!("invalid timeline JSON in {}", path.display()))?;
    tracing::debug!(
        entries = document.timeline.len(),
        path = %path.display(),
        "loaded timeline"
    );
    Ok(document.timeline)
}
