use dezire_common::logging::{self, LogConfig};
use tempfile::TempDir;

// The logger is process-wide, so this binary holds a single test

#[test]
fn test_log_file_failure_is_sticky() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let unreachable = temp_dir.path().join("missing").join("dezire.log");
    let config = LogConfig {
        log_file: Some(unreachable.display().to_string()),
        ..LogConfig::default()
    };

    let err = logging::init(&config).unwrap_err();
    assert!(err.contains("Failed to open log file"));

    // A later call with a usable configuration reports the same failure
    let fallback = LogConfig {
        console_logging: false,
        ..LogConfig::default()
    };
    assert_eq!(logging::init(&fallback), Err(err));
    assert!(!unreachable.exists());
}
