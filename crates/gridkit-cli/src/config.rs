//! Configuration file handling.
//! The default location is ~/.gridkit/config.toml.

use anyhow::{anyhow, Context, Result};
use gridkit_algo::KrylovConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GridkitConfig {
    /// Iterative solver settings for the sparse pseudo-inverse
    #[serde(default)]
    pub solver: KrylovConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl LoggingConfig {
    /// The configured level, or INFO when it does not parse.
    pub fn tracing_level(&self) -> tracing::Level {
        self.level.parse().unwrap_or(tracing::Level::INFO)
    }
}

/// Location: ~/.gridkit/config.toml
pub fn default_config_path() -> Result<PathBuf> {
    dirs::home_dir()
        .ok_or_else(|| anyhow!("Cannot determine home directory"))
        .map(|home| home.join(".gridkit").join("config.toml"))
}

/// Load the configuration.
///
/// An explicit path must exist; a missing file at the default location
/// yields the defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<GridkitConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Ok(path) if path.exists() => path,
            _ => return Ok(GridkitConfig::default()),
        },
    };
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("parsing config {}", path.display()))
}

pub fn save_config(path: &Path, config: &GridkitConfig) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating config directory {}", dir.display()))?;
    }
    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents).with_context(|| format!("writing config {}", path.display()))
}
