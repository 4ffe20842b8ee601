//! Actuator sink trait and error types.
//!
//! This module defines:
//! - `PowerSink` trait - Interface for a single continuous power output
//! - `HalError` enum - Error types for hardware lookups

use crate::hal::types::{ActuatorKind, ZeroPowerBehavior};
use thiserror::Error;

/// Error types for HAL operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HalError {
    /// No device registered under the requested name
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// Device exists but is of another kind
    #[error("Device '{name}' is a {actual}, expected {expected}")]
    KindMismatch {
        /// Requested device name
        name: String,
        /// Kind the caller asked for
        expected: ActuatorKind,
        /// Kind the device was registered with
        actual: ActuatorKind,
    },

    /// A device with the same name is already registered
    #[error("Duplicate device name: {0}")]
    DuplicateDevice(String),
}

/// A continuous power output (motor or continuous-rotation servo).
///
/// The sequencer writes one value per actuator every cycle, whether or not
/// it changed since the previous cycle.
///
/// # Contract
///
/// | Operation | Blocking | Notes |
/// |-----------|----------|-------|
/// | `set_power()` | never | value is already clamped to −1.0..=1.0 and polarity-corrected |
/// | `set_zero_power_behavior()` | never | called once during construction |
pub trait PowerSink: Send {
    /// Hardware name of the device (e.g., "lm", "ll").
    fn name(&self) -> &str;

    /// Drive the device at the given normalized power.
    fn set_power(&mut self, power: f64);

    /// Select what the device does when commanded to zero power.
    ///
    /// Default implementation does nothing (servos have no brake).
    fn set_zero_power_behavior(&mut self, _behavior: ZeroPowerBehavior) {
        // Default: no-op
    }
}
