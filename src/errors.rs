// src/errors.rs

//! Crate-wide error type and `Result` alias.
//!
//! Every failure the runner can report is a [`RunnerError`]. Callers that
//! only care about the category can match on [`RunnerError::kind`].

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("no whitebox_tools directory found (tried: {})", display_paths(.tried))]
    Configuration { tried: Vec<PathBuf> },

    #[error("failed to spawn '{}': {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Failure category of a [`RunnerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No usable executable directory.
    Configuration,
    /// The child process could not be created.
    Spawn,
    /// Reading output from, or waiting on, the child failed.
    Io,
    /// The TOML config file is malformed or invalid.
    Config,
}

impl RunnerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RunnerError::Configuration { .. } => ErrorKind::Configuration,
            RunnerError::Spawn { .. } => ErrorKind::Spawn,
            RunnerError::Io(_) => ErrorKind::Io,
            RunnerError::ConfigError(_) | RunnerError::TomlError(_) => ErrorKind::Config,
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "<none>".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, RunnerError>;
