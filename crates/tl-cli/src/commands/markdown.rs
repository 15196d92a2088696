//! Markdown command for rendering the raw timeline as a table.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tl_core::{TimelineEntry, split_display_labels};

use crate::Config;
use crate::source::load_timeline;

const HEADERS: [&str; 4] = ["Start Time", "End Time", "Content", "Remarks"];

#[derive(Debug, Args)]
pub struct MarkdownArgs {
    /// Output file. Defaults to `markdown_path` from config.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Renders entries as a Markdown table, one row per entry in input order.
///
/// Each content label goes on its own line as a list item. Missing fields
/// render as empty cells.
pub fn render_markdown(entries: &[TimelineEntry]) -> String {
    let mut output = table_row(HEADERS.iter().map(|h| (*h).to_string()));
    output.push_str(&table_row(HEADERS.iter().map(|_| "---".to_string())));

    for entry in entries {
        output.push_str(&table_row(
            [
                escape_cell(&entry.start_time),
                escape_cell(&entry.end_time),
                format_content(entry.content.as_deref()),
                escape_cell(entry.remarks.as_deref().unwrap_or_default()),
            ]
            .into_iter(),
        ));
    }

    output
}

fn table_row(cells: impl Iterator<Item = String>) -> String {
    let cells: Vec<String> = cells.collect();
    format!("| {} |\n", cells.join(" | "))
}

fn format_content(content: Option<&str>) -> String {
    split_display_labels(content)
        .into_iter()
        .map(|label| format!("- {}", escape_cell(label)))
        .collect::<Vec<_>>()
        .join("<br>")
}

/// Escapes pipes and folds line breaks so a value stays in one cell.
fn escape_cell(value: &str) -> String {
    value
        .replace('|', "\\|")
        .replace("\r\n", "<br>")
        .replace('\n', "<br>")
}

/// Runs the markdown command.
pub fn run<W: Write>(writer: &mut W, args: &MarkdownArgs, config: &Config) -> Result<()> {
    let entries = load_timeline(&config.data_path)?;
    let path = args.output.as_ref().unwrap_or(&config.markdown_path);

    tracing::debug!(entries = entries.len(), path = %path.display(), "rendering markdown");
    let markdown = render_markdown(&entries);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, markdown).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "markdown written");

    writeln!(
        writer,
        "Wrote {} entries to {}",
        entries.len(),
        path.display()
    )?;
    Ok(())
}
