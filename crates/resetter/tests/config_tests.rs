//! Integration tests for configuration parsing
//!
//! Tests resetter configuration loading, including:
//! - Minimal and full documents
//! - Load/save through the filesystem
//! - Invalid configuration handling
//!
//! Run with: `cargo test -p resetter --test config_tests`

use resetter::{FailurePolicy, ResetterConfig};
use tempfile::tempdir;

const FULL_CONFIG: &str = r#"
[scan]
manufacturer = "Raspberry Pi"
label = "Pico"
on_failure = "propagate"

[logging]
level = "debug"
"#;

const PARTIAL_CONFIG: &str = r#"
[scan]
on_failure = "propagate"
"#;

#[test]
fn test_parse_full_config() {
    let config = ResetterConfig::from_toml_str(FULL_CONFIG).unwrap();

    assert_eq!(config.scan.manufacturer, "Raspberry Pi");
    assert_eq!(config.scan.label, "Pico");
    assert_eq!(config.scan.on_failure, FailurePolicy::Propagate);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_partial_config_keeps_defaults() {
    let config = ResetterConfig::from_toml_str(PARTIAL_CONFIG).unwrap();

    assert_eq!(config.scan.manufacturer, "STMicroelectronics");
    assert_eq!(config.scan.label, "STM");
    assert_eq!(config.scan.on_failure, FailurePolicy::Propagate);
    assert_eq!(config.logging.level, "warn");
}

#[test]
fn test_unknown_policy_rejected() {
    let result = ResetterConfig::from_toml_str("[scan]\non_failure = \"retry\"\n");
    assert!(result.is_err());
}

#[test]
fn test_invalid_log_level_rejected() {
    let result = ResetterConfig::from_toml_str("[logging]\nlevel = \"verbose\"\n");
    let err = result.unwrap_err();
    assert!(format!("{:#}", err).contains("Invalid log level"));
}

#[test]
fn test_empty_manufacturer_rejected() {
    let result = ResetterConfig::from_toml_str("[scan]\nmanufacturer = \"\"\n");
    assert!(result.is_err());
}

#[test]
fn test_malformed_toml_rejected() {
    assert!(ResetterConfig::from_toml_str("[scan\nmanufacturer = ").is_err());
}

#[test]
fn test_save_and_load_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = ResetterConfig::default();
    config.scan.on_failure = FailurePolicy::Propagate;
    config.logging.level = "info".to_string();
    config.save(&path).unwrap();

    assert!(path.exists());
    let loaded = ResetterConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_load_missing_file_errors() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.toml");

    let err = ResetterConfig::load(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
fn test_load_invalid_file_names_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[logging]\nlevel = 3\n").unwrap();

    let err = ResetterConfig::load(&path).unwrap_err();
    assert!(err.to_string().contains(&path.display().to_string()));
}
