//! Config file tests.
//!
//! Tests for loading `latch.toml` from disk: defaults for missing sections,
//! validation of actuator names, unknown field rejection.

use latch_common::config::{ConfigError, ConfigLoader, LatchConfig, LogLevel};
use latch_common::consts::{DEFAULT_MOTOR_NAME, DEFAULT_SERVO_NAME};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("latch.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn full_config_loads() {
    let tmp = TempDir::new().unwrap();
    let path = write_config(
        tmp.path(),
        r#"
[shared]
log_level = "trace"
service_name = "lander-latch-01"

[actuators]
motor = "lander_motor"
servo = "latch_servo"
"#,
    );

    let config = LatchConfig::load(&path).unwrap();
    config.validate().unwrap();
    assert_eq!(config.shared.log_level, LogLevel::Trace);
    assert_eq!(config.shared.service_name, "lander-latch-01");
    assert_eq!(config.actuators.motor, "lander_motor");
    assert_eq!(config.actuators.servo, "latch_servo");
}

#[test]
fn empty_file_uses_defaults() {
    let tmp = TempDir::new().unwrap();
    let path = write_config(tmp.path(), "");

    let config = LatchConfig::load(&path).unwrap();
    config.validate().unwrap();
    assert_eq!(config.actuators.motor, DEFAULT_MOTOR_NAME);
    assert_eq!(config.actuators.servo, DEFAULT_SERVO_NAME);
    assert_eq!(config.shared.log_level, LogLevel::Info);
}

#[test]
fn partial_actuator_section_fills_defaults() {
    let tmp = TempDir::new().unwrap();
    let path = write_config(tmp.path(), "[actuators]\nservo = \"latch\"\n");

    let config = LatchConfig::load(&path).unwrap();
    assert_eq!(config.actuators.motor, DEFAULT_MOTOR_NAME);
    assert_eq!(config.actuators.servo, "latch");
}

#[test]
fn duplicate_names_fail_validation() {
    let tmp = TempDir::new().unwrap();
    let path = write_config(tmp.path(), "[actuators]\nmotor = \"x\"\nservo = \"x\"\n");

    let config = LatchConfig::load(&path).unwrap();
    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError(_)));
    assert!(err.to_string().contains("'x'"));
}

#[test]
fn blank_service_name_fails_validation() {
    let tmp = TempDir::new().unwrap();
    let path = write_config(tmp.path(), "[shared]\nservice_name = \"\"\n");

    let config = LatchConfig::load(&path).unwrap();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValidationError(_))
    ));
}

#[test]
fn unknown_section_rejected() {
    let tmp = TempDir::new().unwrap();
    let path = write_config(tmp.path(), "[timing]\nunlock_timeout_ms = 200\n");

    assert!(matches!(
        LatchConfig::load(&path),
        Err(ConfigError::ParseError(_))
    ));
}

#[test]
fn unknown_actuator_field_rejected() {
    let tmp = TempDir::new().unwrap();
    let path = write_config(tmp.path(), "[actuators]\nmotor = \"lm\"\nwinch = \"w\"\n");

    let err = LatchConfig::load(&path).unwrap_err();
    assert!(err.to_string().contains("winch"));
}

#[test]
fn missing_file_reported() {
    let tmp = TempDir::new().unwrap();
    assert!(matches!(
        LatchConfig::load(&tmp.path().join("absent.toml")),
        Err(ConfigError::FileNotFound)
    ));
}
