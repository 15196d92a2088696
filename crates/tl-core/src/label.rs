//! Content label splitting.
//!
//! Content strings hold one or more labels. Analysis splits loosely on `/`,
//! while the Markdown document keeps the original `" / "` segments verbatim.

/// Delimiter used when analysing content labels.
pub const LABEL_DELIMITER: char = '/';

/// Delimiter used when rendering content labels into a document.
pub const DISPLAY_DELIMITER: &str = " / ";

/// Splits `content` into trimmed, non-empty labels.
///
/// Order is preserved and duplicates are kept.
pub fn split_labels(content: Option<&str>) -> Vec<&str> {
    content
        .unwrap_or_default()
        .split(LABEL_DELIMITER)
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .collect()
}

/// Splits `content` on the exact `" / "` delimiter without trimming.
pub fn split_display_labels(content: Option<&str>) -> Vec<&str> {
    match content {
        Some(content) if !content.is_empty() => content.split(DISPLAY_DELIMITER).collect(),
        _ => Vec::new(),
    }
}
