//! Sequencer-wide constants for the latch workspace.
//!
//! Single source of truth for actuator power levels, timing gates and
//! default hardware names. These are compile-time tunables and are never
//! exposed through runtime configuration.
//!
//! One time unit is one millisecond.

use crate::hal::types::{Direction, ZeroPowerBehavior};
use std::time::Duration;

// ─── Power Levels ───────────────────────────────────────────────────

/// Lander motor power while raising (negated while lowering).
pub const DEPLOY_POWER: f64 = 0.4;

/// Servo power that drives the latch open.
pub const UNLOCKING_POWER: f64 = 0.5;

/// Servo power once the latch has seated ("locked, holding").
pub const LOCKED_POWER: f64 = 0.0;

/// Servo power that drives the latch closed.
pub const LOCKING_POWER: f64 = -0.5;

/// Servo power that keeps the latch open while the lander is raising.
pub const UNLOCKED_POWER: f64 = 0.25;

/// Lower bound of the normalized power range.
pub const MIN_POWER: f64 = -1.0;

/// Upper bound of the normalized power range.
pub const MAX_POWER: f64 = 1.0;

// ─── Timing ─────────────────────────────────────────────────────────

/// How long the servo is driven at [`LOCKING_POWER`] after a mode change
/// before the latch is considered seated.
pub const LOCK_SETTLE_TIME: Duration = Duration::from_millis(500);

/// Time spent in `Unlocking` before advancing to `Raising`.
pub const UNLOCK_TIMEOUT: Duration = Duration::from_millis(500);

/// Delay between successive control-loop cycles.
pub const CYCLE_PERIOD: Duration = Duration::from_millis(15);

// ─── Hardware Names ─────────────────────────────────────────────────

/// Default hardware-map name of the lander motor.
pub const DEFAULT_MOTOR_NAME: &str = "lm";

/// Default hardware-map name of the latch-lock servo.
pub const DEFAULT_SERVO_NAME: &str = "ll";

// ─── Wiring ─────────────────────────────────────────────────────────

/// Mounting polarity of the lander motor.
pub const MOTOR_DIRECTION: Direction = Direction::Reverse;

/// Mounting polarity of the latch-lock servo.
pub const SERVO_DIRECTION: Direction = Direction::Forward;

/// The lander motor brakes at zero power so the lander holds position.
pub const MOTOR_ZERO_POWER: ZeroPowerBehavior = ZeroPowerBehavior::Brake;

/// Name of the dedicated control-loop thread.
pub const CONTROL_THREAD_NAME: &str = "latch-sequencer";
