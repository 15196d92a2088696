//! CLI subcommand implementations.

pub mod markdown;
pub mod stats;
