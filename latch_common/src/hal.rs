//! Actuator interface shared between the HAL and the sequencer.
//!
//! This module contains the power-sink trait implemented by actuator
//! drivers and the polarity/brake types applied at construction time.

pub mod driver;
pub mod types;
