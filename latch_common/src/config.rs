//! Configuration loading traits and types.
//!
//! This module provides a standardized way to load the sequencer's TOML
//! configuration file. Only construction-time wiring lives here (service
//! identity, log level and the hardware names of the two actuators); power
//! levels and timing gates are compile-time constants in [`crate::consts`].
//!
//! # Usage
//!
//! ```rust,no_run
//! use latch_common::config::{ConfigError, ConfigLoader, LatchConfig};
//! use std::path::Path;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = LatchConfig::load(Path::new("latch.toml"))?;
//!     config.validate()?;
//!     println!("Motor: {}", config.actuators.motor);
//!     Ok(())
//! }
//! ```

use crate::consts::{CONTROL_THREAD_NAME, DEFAULT_MOTOR_NAME, DEFAULT_SERVO_NAME};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Error type for configuration loading operations.
///
/// This enum represents all possible errors that can occur when loading
/// configuration files.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Log level for application logging.
///
/// Uses lowercase serde values for TOML compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose, per-cycle actuation.
    Trace,
    /// Mode transitions and cycle statistics.
    Debug,
    /// Lifecycle events.
    #[default]
    Info,
    /// Warning messages for potentially problematic situations.
    Warn,
    /// Error messages for serious problems.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Common configuration fields.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "lander-latch-01"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Application instance identifier.
    pub service_name: String,
}

impl SharedConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if `service_name` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            service_name: CONTROL_THREAD_NAME.to_string(),
        }
    }
}

fn default_motor_name() -> String {
    DEFAULT_MOTOR_NAME.to_string()
}

fn default_servo_name() -> String {
    DEFAULT_SERVO_NAME.to_string()
}

/// Hardware-map names of the two actuators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActuatorNames {
    /// Lander motor.
    #[serde(default = "default_motor_name")]
    pub motor: String,

    /// Latch-lock servo.
    #[serde(default = "default_servo_name")]
    pub servo: String,
}

impl Default for ActuatorNames {
    fn default() -> Self {
        Self {
            motor: default_motor_name(),
            servo: default_servo_name(),
        }
    }
}

impl ActuatorNames {
    /// Validate the names.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if a name is empty or both
    /// actuators share one name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.motor.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "actuators.motor cannot be empty".to_string(),
            ));
        }
        if self.servo.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "actuators.servo cannot be empty".to_string(),
            ));
        }
        if self.motor == self.servo {
            return Err(ConfigError::ValidationError(format!(
                "motor and servo cannot share the name '{}'",
                self.motor
            )));
        }
        Ok(())
    }
}

/// Top-level sequencer configuration (`latch.toml`).
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// service_name = "lander-latch-01"
///
/// [actuators]
/// motor = "lm"
/// servo = "ll"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LatchConfig {
    /// Service identity and log level.
    #[serde(default)]
    pub shared: SharedConfig,

    /// Actuator names resolved from the hardware map.
    #[serde(default)]
    pub actuators: ActuatorNames,
}

impl LatchConfig {
    /// Validate all sections.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.actuators.validate()
    }
}

/// Trait for loading configuration from TOML files.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Blanket implementation for all types that implement DeserializeOwned.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}
