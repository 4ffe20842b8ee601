//! Actuator kinds, polarity and zero-power behavior.

use crate::consts::{MAX_POWER, MIN_POWER};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Device class used for typed hardware lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActuatorKind {
    /// DC motor with encoder-less power control.
    Motor,
    /// Continuous-rotation servo.
    ContinuousServo,
}

impl fmt::Display for ActuatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActuatorKind::Motor => f.write_str("motor"),
            ActuatorKind::ContinuousServo => f.write_str("continuous servo"),
        }
    }
}

/// Polarity applied between the logical command and the hardware output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Logical power is written unchanged.
    #[default]
    Forward,
    /// Logical power is negated.
    Reverse,
}

impl Direction {
    /// Map a logical power onto the hardware output.
    #[inline]
    pub fn apply(self, power: f64) -> f64 {
        match self {
            Direction::Forward => power,
            Direction::Reverse => -power,
        }
    }
}

/// What a device does when commanded to zero power.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroPowerBehavior {
    /// Coast freely.
    #[default]
    Float,
    /// Short the windings and resist motion.
    Brake,
}

/// Clamp a power value into the normalized range. NaN maps to zero.
#[inline]
pub fn clamp_power(power: f64) -> f64 {
    if power.is_nan() {
        0.0
    } else {
        power.clamp(MIN_POWER, MAX_POWER)
    }
}
