//! Operating modes of the lander/latch sequencer.
//!
//! Exactly one [`Mode`] is active at any instant. The enum uses
//! `#[repr(u8)]` so a mode can be carried through compact status records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mutually exclusive operating mode of the sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Mode {
    /// Lander motor driving forward, latch held open.
    Raising = 0,
    /// Lander motor driving in reverse, latch locking.
    Lowering = 1,
    /// Motor idle, servo driving the latch open.
    Unlocking = 2,
    /// Motor idle, latch locking then holding.
    #[default]
    Standby = 3,
}

impl Mode {
    /// All modes, in declaration order.
    pub const ALL: [Mode; 4] = [Mode::Raising, Mode::Lowering, Mode::Unlocking, Mode::Standby];

    /// Convert from raw `u8`. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Raising),
            1 => Some(Self::Lowering),
            2 => Some(Self::Unlocking),
            3 => Some(Self::Standby),
            _ => None,
        }
    }

    /// Whether this mode runs the time-gated lock routine on the servo.
    #[inline]
    pub const fn locks_latch(self) -> bool {
        matches!(self, Mode::Lowering | Mode::Standby)
    }

    /// Lowercase name used in logs and status output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Mode::Raising => "raising",
            Mode::Lowering => "lowering",
            Mode::Unlocking => "unlocking",
            Mode::Standby => "standby",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
