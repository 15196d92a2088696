//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::markdown::MarkdownArgs;
use crate::commands::stats::StatsArgs;

/// Timeline statistics.
///
/// Aggregates a log of timed activity records by content label, calendar day
/// and hour of day, and renders the raw log as a Markdown table.
#[derive(Debug, Parser)]
#[command(name = "tl", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show content, daily and hourly statistics.
    Stats(StatsArgs),

    /// Render the timeline as a Markdown table.
    Markdown(MarkdownArgs),
}
