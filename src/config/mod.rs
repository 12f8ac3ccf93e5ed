mod schema;
mod validation;

pub use schema::{AnalysisConfig, Config, FetchConfig, DEFAULT_DELAY, DEFAULT_LIMIT, DEFAULT_TIMEOUT};
pub use validation::validate_config;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.config/pr-pulse/)
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("pr-pulse"))
}

/// Get the default config file path (~/.config/pr-pulse/config.yaml)
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path (~/.config/pr-pulse/config.yaml)
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
///
/// A missing default file is not an error; defaults are used instead.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found at {}", path.display());
            }
            read_config(&path)
        }
        None => match get_config_path() {
            Some(path) if path.exists() => read_config(&path),
            _ => {
                log::debug!("No config file found, using defaults");
                Ok(Config::default())
            }
        },
    }
}

fn read_config(path: &Path) -> Result<Config> {
    log::debug!("Loading config from {}", path.display());

    let config_content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;

    if config_content.trim().is_empty() {
        return Ok(Config::default());
    }

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", path.display()))?;

    Ok(config)
}
