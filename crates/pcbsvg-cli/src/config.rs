//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML render options
//! from various locations (explicit path, local directory, system directory).

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use pcbsvg::{PcbSvgError, config::RenderOptions};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ConfigError> for PcbSvgError {
    fn from(err: ConfigError) -> Self {
        PcbSvgError::Config(err.to_string())
    }
}

/// Find and load render options from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (pcbsvg/config.toml)
/// 3. Platform-specific config directory
/// 4. Default options if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed or fails validation
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<RenderOptions, PcbSvgError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("pcbsvg/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "pcbsvg", "pcbsvg") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(RenderOptions::default())
}

/// Load render options from a TOML file
///
/// # Errors
///
/// Returns error if:
/// - File doesn't exist
/// - File cannot be read
/// - TOML parsing fails
/// - The background color is not a valid color
fn load_config_file(path: impl AsRef<Path>) -> Result<RenderOptions, PcbSvgError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let options: RenderOptions =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    options
        .background_color()
        .map_err(|e| ConfigError::Validation(e.to_string()))?;

    Ok(options)
}
