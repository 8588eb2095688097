// src/config/mod.rs

//! Configuration loading and validation for the runner.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate basic invariants (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{
    CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE, default_config_path, load_and_validate, load_from_path,
};
pub use model::{ConfigFile, LoggingSection, RunnerSection};
pub use validate::validate_config;
