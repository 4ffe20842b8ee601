//! HAL driver implementations.
//!
//! - [`simulation`] - Software actuators for development and testing
//!
//! # Adding New Drivers
//!
//! 1. Create a new submodule under `drivers/`
//! 2. Implement the `PowerSink` trait from `latch_common::hal::driver`
//! 3. Register the devices with a [`HardwareMap`](crate::HardwareMap) at startup

pub mod simulation;
