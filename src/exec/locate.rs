// src/exec/locate.rs

//! Locating the `whitebox_tools` executable.
//!
//! Candidates are tried in order:
//! 1. an explicit directory given by the caller,
//! 2. the `WHITEBOX_TOOLS_BUILD` environment variable,
//! 3. `target/release` under the host program's install directory.
//!
//! The first candidate that exists on disk wins. Resolution is eager: a
//! missing directory is reported here, not at spawn time.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{Result, RunnerError};

/// Environment variable naming the directory that holds the executable.
pub const BUILD_DIR_ENV_VAR: &str = "WHITEBOX_TOOLS_BUILD";

/// File stem of the external executable.
pub const EXE_STEM: &str = "whitebox_tools";

/// Platform file name for `stem` (`.exe` appended on Windows).
pub fn executable_file_name(stem: &str) -> String {
    format!("{stem}{}", std::env::consts::EXE_SUFFIX)
}

/// Resolve the executable directory from the process environment.
pub fn resolve_exe_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    let env_value = std::env::var_os(BUILD_DIR_ENV_VAR);
    let install_dir = install_dir();
    resolve_exe_dir_from(explicit, env_value, install_dir.as_deref())
}

/// Resolution with every input passed in, so it can be exercised without
/// touching the real environment.
pub fn resolve_exe_dir_from(
    explicit: Option<&Path>,
    env_value: Option<OsString>,
    install_dir: Option<&Path>,
) -> Result<PathBuf> {
    let mut tried = Vec::new();

    let candidates = [
        explicit.map(Path::to_path_buf),
        env_value.filter(|v| !v.is_empty()).map(PathBuf::from),
        install_dir.map(conventional_build_dir),
    ];

    for candidate in candidates.into_iter().flatten() {
        if candidate.as_os_str().is_empty() {
            continue;
        }
        if candidate.is_dir() {
            debug!(dir = %candidate.display(), "resolved whitebox_tools directory");
            return Ok(candidate);
        }
        debug!(dir = %candidate.display(), "candidate directory does not exist");
        tried.push(candidate);
    }

    Err(RunnerError::Configuration { tried })
}

/// `<install_dir>/target/release`.
pub fn conventional_build_dir(install_dir: &Path) -> PathBuf {
    install_dir.join("target").join("release")
}

/// Directory of the running executable, if it can be determined.
fn install_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}
