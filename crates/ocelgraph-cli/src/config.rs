//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory)
//! and applying command-line overrides on top of them.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use ocelgraph::{
    OcelGraphError,
    config::{AppConfig, LayoutEngine, RankDirection},
};

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

impl From<ConfigError> for OcelGraphError {
    fn from(err: ConfigError) -> Self {
        OcelGraphError::Config(err.to_string())
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (ocelgraph/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed or holds unusable layout settings
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, OcelGraphError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("ocelgraph/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("org", "ocelgraph", "ocelgraph") {
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
    Ok(AppConfig::default())
}

/// Applies command-line layout overrides to a loaded configuration.
pub fn apply_overrides(
    config: AppConfig,
    engine: Option<LayoutEngine>,
    rank_direction: Option<RankDirection>,
) -> AppConfig {
    if engine.is_none() && rank_direction.is_none() {
        return config;
    }

    let mut layout = config.layout().clone();
    if let Some(engine) = engine {
        debug!(engine:?; "Overriding layout engine");
        layout = layout.with_engine(engine);
    }
    if let Some(rank_direction) = rank_direction {
        debug!(rank_direction:?; "Overriding rank direction");
        layout = layout.with_rank_direction(rank_direction);
    }

    AppConfig::new(layout, config.style().clone(), config.input().clone())
}

/// Load configuration from a TOML file
///
/// # Errors
///
/// Returns error if:
/// - File doesn't exist
/// - File cannot be read
/// - TOML parsing fails
/// - The layout section fails validation
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, OcelGraphError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;

    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    config.layout().validate().map_err(ConfigError::Validation)?;

    Ok(config)
}
