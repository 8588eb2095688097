// src/logging.rs

//! `tracing` subscriber installation for host programs.
//!
//! The library only emits events. A host without its own subscriber calls
//! [`init_from_config`] (or [`init_logging`]) once at startup. The level is
//! taken from `[logging].level`, then `WHITEBOX_RUNNER_LOG`, then `info`.
//! Output goes to stderr so tool lines echoed on stdout stay clean.

use std::str::FromStr;

use serde::Deserialize;
use tracing::Level;
use tracing_subscriber::fmt;

use crate::config::ConfigFile;
use crate::errors::{Result, RunnerError};

pub const LOG_ENV_VAR: &str = "WHITEBOX_RUNNER_LOG";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    #[serde(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
}

impl FromStr for LogLevel {
    type Err = RunnerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            other => Err(RunnerError::ConfigError(format!(
                "unknown log level '{other}'"
            ))),
        }
    }
}

impl From<LogLevel> for Level {
    fn from(lvl: LogLevel) -> Self {
        match lvl {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

/// Install the subscriber at the level named in `cfg.logging`.
pub fn init_from_config(cfg: &ConfigFile) -> Result<()> {
    init_logging(cfg.logging.level)
}

/// Install a global fmt subscriber on stderr.
///
/// Returns [`RunnerError::ConfigError`] when a global subscriber is already
/// set, including one installed by an earlier call.
pub fn init_logging(level: Option<LogLevel>) -> Result<()> {
    let level = effective_level(level, std::env::var(LOG_ENV_VAR).ok().as_deref());

    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| RunnerError::ConfigError(format!("failed to install logger: {e}")))
}

/// An unparseable env value falls back to `info` rather than failing startup.
fn effective_level(explicit: Option<LogLevel>, env_value: Option<&str>) -> Level {
    explicit
        .or_else(|| env_value.and_then(|s| s.parse().ok()))
        .map(Level::from)
        .unwrap_or(Level::INFO)
}
