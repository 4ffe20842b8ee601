//! Actuator wrapper applying clamping, polarity and zero-power behavior.
//!
//! Callers command *logical* power; the wrapper clamps it into the
//! normalized range, applies the mounting [`Direction`] and forwards the
//! result to the underlying [`PowerSink`].

use crate::hardware_map::HardwareMap;
use latch_common::hal::driver::{HalError, PowerSink};
use latch_common::hal::types::{ActuatorKind, Direction, ZeroPowerBehavior, clamp_power};
use tracing::trace;

/// An actuator resolved from the hardware map.
pub struct Actuator {
    sink: Box<dyn PowerSink>,
    kind: ActuatorKind,
    direction: Direction,
    zero_power: ZeroPowerBehavior,
    last_power: f64,
    command_count: u64,
}

impl Actuator {
    /// Wrap an already-resolved sink.
    pub fn new(sink: Box<dyn PowerSink>, kind: ActuatorKind, direction: Direction) -> Self {
        Self {
            sink,
            kind,
            direction,
            zero_power: ZeroPowerBehavior::default(),
            last_power: 0.0,
            command_count: 0,
        }
    }

    /// Resolve `name` from the hardware map and wrap it.
    ///
    /// # Errors
    /// Propagates `DeviceNotFound` / `KindMismatch` from the map.
    pub fn from_map(
        map: &mut HardwareMap,
        name: &str,
        kind: ActuatorKind,
        direction: Direction,
    ) -> Result<Self, HalError> {
        let sink = map.take(name, kind)?;
        Ok(Self::new(sink, kind, direction))
    }

    /// Configure what the device does at zero power.
    pub fn with_zero_power_behavior(mut self, behavior: ZeroPowerBehavior) -> Self {
        self.sink.set_zero_power_behavior(behavior);
        self.zero_power = behavior;
        self
    }

    /// Command a logical power level.
    #[inline]
    pub fn set_power(&mut self, power: f64) {
        let logical = clamp_power(power);
        self.last_power = logical;
        self.command_count += 1;
        let output = self.direction.apply(logical);
        trace!(device = self.sink.name(), logical, output, "set_power");
        self.sink.set_power(output);
    }

    /// Hardware name of the device.
    pub fn name(&self) -> &str {
        self.sink.name()
    }

    pub fn kind(&self) -> ActuatorKind {
        self.kind
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn zero_power_behavior(&self) -> ZeroPowerBehavior {
        self.zero_power
    }

    /// Last logical (pre-polarity) power commanded.
    pub fn last_power(&self) -> f64 {
        self.last_power
    }

    /// Number of `set_power` calls since construction.
    pub fn command_count(&self) -> u64 {
        self.command_count
    }
}

impl std::fmt::Debug for Actuator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Actuator")
            .field("name", &self.sink.name())
            .field("kind", &self.kind)
            .field("direction", &self.direction)
            .field("zero_power", &self.zero_power)
            .field("last_power", &self.last_power)
            .field("command_count", &self.command_count)
            .finish()
    }
}
