//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Timeline JSON document (`{ "timeline": [...] }`).
    pub data_path: PathBuf,

    /// Where `tl markdown` writes the rendered table.
    pub markdown_path: PathBuf,

    /// Number of labels shown in the content table.
    pub top_content: usize,

    /// Entry count at which aggregation runs on the rayon pool.
    pub parallel_threshold: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data.json"),
            markdown_path: PathBuf::from("data.md"),
            top_content: 15,
            parallel_threshold: 10_000,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (TL_*)
        figment = figment.merge(Env::prefixed("TL_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for tl.
///
/// On Linux: `~/.config/tl`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tl"))
}
