// src/config/loader.rs

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::ConfigFile;
use crate::config::validate::validate_config;
use crate::errors::Result;

pub const CONFIG_ENV_VAR: &str = "WHITEBOX_RUNNER_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "WhiteboxRunner.toml";

/// Load a configuration file from a given path.
///
/// This only performs TOML deserialization; use [`load_and_validate`] to also
/// check the values.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    let config: ConfigFile = toml::from_str(&contents)?;
    Ok(config)
}

/// Load a configuration file from path and run validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let config = load_from_path(path)?;
    validate_config(&config)?;
    Ok(config)
}

/// `$WHITEBOX_RUNNER_CONFIG` if set, else `WhiteboxRunner.toml` in the
/// current working directory.
pub fn default_config_path() -> PathBuf {
    config_path_from(std::env::var_os(CONFIG_ENV_VAR))
}

fn config_path_from(env_value: Option<OsString>) -> PathBuf {
    env_value
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}
