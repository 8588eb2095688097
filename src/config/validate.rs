// src/config/validate.rs

use std::path::MAIN_SEPARATOR;

use crate::config::model::ConfigFile;
use crate::errors::{Result, RunnerError};

/// Check the semantic invariants serde cannot express.
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    validate_exe_dir(cfg)?;
    validate_exe_name(cfg)?;
    Ok(())
}

fn validate_exe_dir(cfg: &ConfigFile) -> Result<()> {
    if let Some(dir) = &cfg.runner.exe_dir {
        if dir.as_os_str().to_string_lossy().trim().is_empty() {
            return Err(RunnerError::ConfigError(
                "[runner].exe_dir must not be blank; omit it to use the default lookup"
                    .to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_exe_name(cfg: &ConfigFile) -> Result<()> {
    let Some(name) = &cfg.runner.exe_name else {
        return Ok(());
    };

    if name.trim().is_empty() {
        return Err(RunnerError::ConfigError(
            "[runner].exe_name must not be blank".to_string(),
        ));
    }
    if name.contains('/') || name.contains(MAIN_SEPARATOR) {
        return Err(RunnerError::ConfigError(format!(
            "[runner].exe_name '{name}' must be a file name, not a path; use exe_dir for the directory"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::RunnerSection;
    use std::path::PathBuf;

    fn with_runner(runner: RunnerSection) -> ConfigFile {
        ConfigFile {
            runner,
            ..ConfigFile::default()
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&ConfigFile::default()).is_ok());
    }

    #[test]
    fn blank_exe_dir_is_rejected() {
        let cfg = with_runner(RunnerSection {
            exe_dir: Some(PathBuf::from("  ")),
            ..RunnerSection::default()
        });
        match validate_config(&cfg) {
            Err(RunnerError::ConfigError(msg)) => assert!(msg.contains("exe_dir")),
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn exe_name_with_separator_is_rejected() {
        let cfg = with_runner(RunnerSection {
            exe_name: Some("bin/whitebox_tools".to_string()),
            ..RunnerSection::default()
        });
        match validate_config(&cfg) {
            Err(RunnerError::ConfigError(msg)) => assert!(msg.contains("not a path")),
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }
}
