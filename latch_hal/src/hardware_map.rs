//! Named actuator registry for HAL devices.
//!
//! The host populates a `HardwareMap` with the devices it owns; the
//! sequencer then resolves its two actuators by name and kind at
//! construction. This uses constructor-injection rather than global state.

use latch_common::hal::driver::{HalError, PowerSink};
use latch_common::hal::types::ActuatorKind;
use std::collections::HashMap;
use tracing::debug;

struct Device {
    kind: ActuatorKind,
    sink: Box<dyn PowerSink>,
}

/// Registry of available actuators, keyed by hardware name.
///
/// Constructed at startup, populated via `register()`, and drained by
/// `take()`. A taken device is owned by the caller from then on.
#[derive(Default)]
pub struct HardwareMap {
    devices: HashMap<String, Device>,
}

impl HardwareMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a device under `name`.
    ///
    /// # Errors
    /// Returns `HalError::DuplicateDevice` if the name is already taken.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        kind: ActuatorKind,
        sink: Box<dyn PowerSink>,
    ) -> Result<(), HalError> {
        let name = name.into();
        if self.devices.contains_key(&name) {
            return Err(HalError::DuplicateDevice(name));
        }
        debug!("Registered {kind} '{name}'");
        self.devices.insert(name, Device { kind, sink });
        Ok(())
    }

    /// Remove and return the device registered under `name`.
    ///
    /// A kind mismatch leaves the device in the map.
    ///
    /// # Errors
    /// - `HalError::DeviceNotFound` if nothing is registered under `name`
    /// - `HalError::KindMismatch` if the device is of another kind
    pub fn take(&mut self, name: &str, kind: ActuatorKind) -> Result<Box<dyn PowerSink>, HalError> {
        let actual = self
            .devices
            .get(name)
            .map(|device| device.kind)
            .ok_or_else(|| HalError::DeviceNotFound(name.to_string()))?;

        if actual != kind {
            return Err(HalError::KindMismatch {
                name: name.to_string(),
                expected: kind,
                actual,
            });
        }

        self.devices
            .remove(name)
            .map(|device| device.sink)
            .ok_or_else(|| HalError::DeviceNotFound(name.to_string()))
    }

    /// Whether a device is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.devices.contains_key(name)
    }

    /// List all registered device names.
    pub fn names(&self) -> Vec<&str> {
        self.devices.keys().map(String::as_str).collect()
    }

    /// Number of devices still in the map.
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Whether the map holds no devices.
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
