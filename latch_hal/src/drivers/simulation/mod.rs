//! Simulation driver module.
//!
//! This module provides software actuators for development and testing
//! without physical hardware. Every applied power is recorded into a shared
//! [`ActuatorProbe`] so tests and the CLI can observe what the sequencer
//! commanded.

mod driver;
mod probe;

pub use driver::{SimulatedActuator, SimulationRig};
pub use probe::{ActuatorLog, ActuatorProbe, HISTORY_CAPACITY};
