// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::logging::LogLevel;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [runner]
/// exe_dir = "/opt/whitebox/target/release"
/// working_dir = "/data/dem"
/// verbose = false
///
/// [logging]
/// level = "debug"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub runner: RunnerSection,

    #[serde(default)]
    pub logging: LoggingSection,
}

/// `[runner]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunnerSection {
    /// Directory holding the `whitebox_tools` executable.
    ///
    /// If `None` (or missing on disk), resolution falls back to
    /// `WHITEBOX_TOOLS_BUILD` and then `target/release`.
    #[serde(default)]
    pub exe_dir: Option<PathBuf>,

    /// Override for the executable file stem (platform suffix is appended).
    #[serde(default)]
    pub exe_name: Option<String>,

    /// Passed to tools as `--wd="..."`; empty means no override.
    #[serde(default)]
    pub working_dir: String,

    /// Append `-v` to every tool invocation.
    #[serde(default = "default_verbose")]
    pub verbose: bool,
}

fn default_verbose() -> bool {
    true
}

impl Default for RunnerSection {
    fn default() -> Self {
        Self {
            exe_dir: None,
            exe_name: None,
            working_dir: String::new(),
            verbose: default_verbose(),
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    /// If `None`, `WHITEBOX_RUNNER_LOG` or `info` is used.
    #[serde(default)]
    pub level: Option<LogLevel>,
}
