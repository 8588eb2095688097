//! Kept in its own test binary: it installs the global subscriber.

use std::io::Write;

use tempfile::NamedTempFile;
use whitebox_runner::RunnerError;
use whitebox_runner::config::load_and_validate;
use whitebox_runner::logging::{LogLevel, init_from_config, init_logging};

#[test]
fn config_level_installs_subscriber_once() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[logging]\nlevel = \"warning\"\n").unwrap();
    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.logging.level, Some(LogLevel::Warn));

    init_from_config(&cfg).unwrap();
    tracing::warn!("subscriber installed from config");

    let second = init_logging(Some(LogLevel::Debug));
    assert!(matches!(second, Err(RunnerError::ConfigError(msg)) if msg.contains("logger")));
}
