//! # Latch HAL Library
//!
//! Hardware abstraction for the lander/latch sequencer.
//!
//! Devices implement the `PowerSink` trait defined in
//! `latch_common::hal::driver`; the host registers them in a
//! [`HardwareMap`] and the sequencer resolves its actuators by name.
//!
//! # Module Structure
//!
//! - [`hardware_map`] - Named actuator registry
//! - [`actuator`] - Clamping/polarity wrapper around a sink
//! - [`drivers`] - Sink implementations
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────┐   take(name, kind)   ┌──────────────────┐
//! │  HardwareMap   │ ───────────────────► │  Actuator        │
//! │  (host-owned)  │                      │  clamp+polarity  │
//! └───────▲────────┘                      └────────┬─────────┘
//!         │ register()                             │ set_power()
//! ┌───────┴────────┐                      ┌────────▼─────────┐
//! │  drivers::*    │                      │  PowerSink       │ (trait object)
//! └────────────────┘                      └──────────────────┘
//! ```

pub mod actuator;
pub mod drivers;
pub mod hardware_map;

// Re-export key types for convenience
pub use crate::actuator::Actuator;
pub use crate::drivers::simulation::{ActuatorProbe, SimulatedActuator, SimulationRig};
pub use crate::hardware_map::HardwareMap;
