//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory)
//! and layering command-line values and the environment on top.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;

use mdditaa::{MdditaaError, config::PreprocessConfig};

use crate::Args;

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),
}

impl From<ConfigError> for MdditaaError {
    fn from(err: ConfigError) -> Self {
        MdditaaError::Config(err.to_string())
    }
}

/// Root of the TOML configuration file.
///
/// ```toml
/// [preprocess]
/// render_command = "ditaa {infile} {outfile} --overwrite"
/// image_dir = "img"
/// extra_copy_dir = "site/img"
/// ```
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    preprocess: PreprocessConfig,
}

/// Build the effective preprocessor configuration for a run
///
/// Sources, lowest precedence first:
/// 1. Built-in defaults
/// 2. Configuration file (see [`load_config`])
/// 3. Command-line flags
/// 4. `DITAA_CMD` and `DITAA_IMAGE_DIR` environment variables
///
/// Environment values come from `lookup`, which receives a variable name.
///
/// # Errors
///
/// Returns error if the configuration file cannot be found or parsed.
pub fn resolve_config<F>(args: &Args, lookup: F) -> Result<PreprocessConfig, MdditaaError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = load_config(args.config.as_ref())?;

    if let Some(command) = &args.command {
        config = config.with_render_command(command.as_str());
    }
    if let Some(dir) = &args.image_dir {
        config = config.with_image_dir(dir);
    }
    if let Some(dir) = &args.extra_copy_dir {
        config = config.with_extra_copy_dir(dir);
    }

    let config = config.with_env_overrides(lookup);
    debug!(config:?; "Resolved configuration");
    Ok(config)
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (mdditaa/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Arguments
///
/// * `explicit_path` - Optional explicit path to config file
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
pub fn load_config(
    explicit_path: Option<impl AsRef<Path>>,
) -> Result<PreprocessConfig, MdditaaError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("mdditaa/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "mdditaa", "mdditaa") {
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
    Ok(PreprocessConfig::default())
}

/// Load configuration from a TOML file
///
/// # Errors
///
/// Returns error if the file doesn't exist, cannot be read, or is not
/// valid TOML.
fn load_config_file(path: impl AsRef<Path>) -> Result<PreprocessConfig, MdditaaError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse the TOML configuration text
fn parse_config(content: &str) -> Result<PreprocessConfig, MdditaaError> {
    let config: FileConfig =
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    Ok(config.preprocess)
}
