mod init;
mod schema;
mod validation;

pub use init::{render_config, run_init_wizard, run_init_wizard_with, save_config};
pub use schema::{Config, LogConfig, DEFAULT_HISTORY};
pub use validation::{validate_config, MAX_HISTORY};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "nhl-live-predictor";

/// Get the config directory path (~/.config/nhl-live-predictor/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join(APP_DIR))
}

/// Get the default config file path (~/.config/nhl-live-predictor/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path and
///   falls back to built-in defaults when that file does not exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found at {}", path.display());
            }
            read_config(&path)
        }
        None => {
            let path = match get_config_path() {
                Ok(path) => path,
                Err(e) => {
                    tracing::debug!(error = %e, "no default config location, using defaults");
                    return Ok(Config::default());
                }
            };
            if !path.exists() {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Config::default());
            }
            read_config(&path)
        }
    }
}

fn read_config(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;

    if content.trim().is_empty() {
        return Ok(Config::default());
    }

    let config: Config = serde_saphyr::from_str(&content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", path.display()))?;

    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}
