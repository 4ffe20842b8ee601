//! Per-cycle dispatch: (mode, elapsed times) → (motor, servo, next mode).
//!
//! | Mode | Motor | Servo | Next |
//! |---|---|---|---|
//! | Raising | `+DEPLOY_POWER` | `UNLOCKED_POWER` | — |
//! | Lowering | `-DEPLOY_POWER` | lock routine | — |
//! | Unlocking | `0.0` | `UNLOCKING_POWER` | `Raising` once unlock timer > `UNLOCK_TIMEOUT` |
//! | Standby | `0.0` | lock routine | — |
//!
//! The lock routine drives the servo at `LOCKING_POWER` for the first
//! `LOCK_SETTLE_TIME` after a mode change, then drops to `LOCKED_POWER`.
//! This is an open-loop timing assumption, not a position reading.
//!
//! All functions here are pure; the control loop supplies the timer
//! readings it took under the appropriate guard.

use latch_common::consts::{
    DEPLOY_POWER, LOCK_SETTLE_TIME, LOCKED_POWER, LOCKING_POWER, UNLOCK_TIMEOUT, UNLOCKED_POWER,
    UNLOCKING_POWER,
};
use latch_common::sequencer::Mode;
use std::time::Duration;

/// Logical actuator powers for one cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Actuation {
    /// Lander motor power.
    pub motor: f64,
    /// Latch servo power.
    pub servo: f64,
}

/// Full outcome of one cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CyclePlan {
    /// Lander motor power.
    pub motor: f64,
    /// Latch servo power.
    pub servo: f64,
    /// Automatic transition to apply after actuating, if any.
    pub next: Option<Mode>,
}

/// Servo power of the time-gated lock routine.
#[inline]
pub fn lock_routine_power(lock_elapsed: Duration) -> f64 {
    if lock_elapsed < LOCK_SETTLE_TIME {
        LOCKING_POWER
    } else {
        LOCKED_POWER
    }
}

/// Actuator powers for `mode`.
///
/// `lock_elapsed` is only consulted by the modes that lock the latch.
#[inline]
pub fn actuation(mode: Mode, lock_elapsed: Duration) -> Actuation {
    match mode {
        Mode::Raising => Actuation {
            motor: DEPLOY_POWER,
            servo: UNLOCKED_POWER,
        },
        Mode::Lowering => Actuation {
            motor: -DEPLOY_POWER,
            servo: lock_routine_power(lock_elapsed),
        },
        Mode::Unlocking => Actuation {
            motor: 0.0,
            servo: UNLOCKING_POWER,
        },
        Mode::Standby => Actuation {
            motor: 0.0,
            servo: lock_routine_power(lock_elapsed),
        },
    }
}

/// Automatic transition out of `mode`, if its timing gate has elapsed.
///
/// Only `Unlocking` advances on its own.
#[inline]
pub fn automatic_transition(mode: Mode, unlock_elapsed: Duration) -> Option<Mode> {
    match mode {
        Mode::Unlocking if unlock_elapsed > UNLOCK_TIMEOUT => Some(Mode::Raising),
        _ => None,
    }
}

/// Combine [`actuation`] and [`automatic_transition`] for one cycle.
pub fn plan_cycle(mode: Mode, lock_elapsed: Duration, unlock_elapsed: Duration) -> CyclePlan {
    let Actuation { motor, servo } = actuation(mode, lock_elapsed);
    CyclePlan {
        motor,
        servo,
        next: automatic_transition(mode, unlock_elapsed),
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
