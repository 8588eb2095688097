// src/exec/args.rs

//! Argument lists passed to `whitebox_tools`.
//!
//! The flag spellings must match what the executable parses exactly,
//! including the literal double quotes around `--run` and `--wd` values.
//! No shell is involved, so nothing else is escaped.

use std::fmt;
use std::path::{Path, PathBuf};

/// Program plus arguments for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl CommandLine {
    /// Command line that runs `tool_name`.
    ///
    /// Layout: `--run="<tool>"`, then `--wd="<dir>"` when `working_dir` is
    /// not blank, then `extra_args` verbatim, then `-v` when `verbose`.
    pub fn run_tool<S: AsRef<str>>(
        program: &Path,
        tool_name: &str,
        working_dir: &str,
        extra_args: &[S],
        verbose: bool,
    ) -> Self {
        let mut args = Vec::with_capacity(extra_args.len() + 3);
        args.push(format!("--run=\"{tool_name}\""));

        if !working_dir.trim().is_empty() {
            args.push(format!("--wd=\"{working_dir}\""));
        }

        args.extend(extra_args.iter().map(|a| a.as_ref().to_string()));

        if verbose {
            args.push("-v".to_string());
        }

        Self {
            program: program.to_path_buf(),
            args,
        }
    }

    /// Command line for one of the standalone informational flags.
    pub fn info(program: &Path, flag: &InfoFlag) -> Self {
        Self {
            program: program.to_path_buf(),
            args: vec![flag.to_string()],
        }
    }

    /// Full argv, program first.
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 1);
        argv.push(self.program.display().to_string());
        argv.extend(self.args.iter().cloned());
        argv
    }
}

/// Informational flags that take no tool run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InfoFlag {
    Help,
    License,
    Version,
    ListTools,
    ToolHelp(String),
}

impl fmt::Display for InfoFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InfoFlag::Help => f.write_str("-h"),
            InfoFlag::License => f.write_str("--license"),
            InfoFlag::Version => f.write_str("--version"),
            InfoFlag::ListTools => f.write_str("--listtools"),
            InfoFlag::ToolHelp(tool) => write!(f, "--toolhelp={tool}"),
        }
    }
}
