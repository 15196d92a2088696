//! Timeline statistics CLI library.
//!
//! This crate provides the CLI interface for the timeline statistics tool.

mod cli;
pub mod commands;
mod config;
pub mod source;

pub use cli::{Cli, Commands};
pub use config::Config;
