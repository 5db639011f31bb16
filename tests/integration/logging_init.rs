//! Installing the global subscriber. Everything runs in one test because the
//! subscriber can only be installed once per process.

use seam::error::EngineError;
use seam::logging::{init_logging, LoggingConfig};
use std::fs;
use tempfile::TempDir;

use crate::integration::with_isolated_env;

#[test]
fn test_file_logging_installs_once() {
    let xdg_dir = TempDir::new().unwrap();
    let log_dir = TempDir::new().unwrap();
    let log_file = log_dir.path().join("nested").join("seam.log");

    let config = LoggingConfig {
        level: "info".to_string(),
        format: "text".to_string(),
        output: "file".to_string(),
        file: log_file.clone(),
        ..LoggingConfig::default()
    };
    assert!(config.validate().is_ok());

    with_isolated_env(&xdg_dir, || init_logging(Some(&config))).unwrap();
    assert!(log_file.is_file());

    tracing::info!(target: "seam_file_check", provider = "standard", "registered provider");
    tracing::debug!(target: "seam_file_check", "below configured level");

    let contents = fs::read_to_string(&log_file).unwrap();
    assert!(contents.contains("registered provider"), "log was: {}", contents);
    assert!(contents.contains("provider=\"standard\""), "log was: {}", contents);
    assert!(!contents.contains("below configured level"));
    assert!(!contents.contains("\u{1b}["), "file output must not carry ANSI codes");

    let second = with_isolated_env(&xdg_dir, || init_logging(Some(&config)));
    match second {
        Err(EngineError::ConfigError(msg)) => {
            assert!(msg.starts_with("Failed to install logger"), "got {}", msg)
        }
        other => panic!("expected ConfigError, got {:?}", other),
    }
}
