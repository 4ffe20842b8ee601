//! Prelude module for common re-exports.
//!
//! This module provides convenient re-exports of commonly used types
//! so that consumers can do `use latch_common::prelude::*;` and get
//! the most important types without listing individual paths.
//!
//! # Usage
//!
//! ```rust
//! use latch_common::prelude::*;
//! ```

// ─── Modes ──────────────────────────────────────────────────────────
pub use crate::sequencer::Mode;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{
    ActuatorNames, ConfigError, ConfigLoader, LatchConfig, LogLevel, SharedConfig,
};

// ─── Hardware ───────────────────────────────────────────────────────
pub use crate::hal::driver::{HalError, PowerSink};
pub use crate::hal::types::{ActuatorKind, Direction, ZeroPowerBehavior};

// ─── Constants ──────────────────────────────────────────────────────
pub use crate::consts::{
    CYCLE_PERIOD, DEPLOY_POWER, LOCK_SETTLE_TIME, LOCKED_POWER, LOCKING_POWER, UNLOCK_TIMEOUT,
    UNLOCKED_POWER, UNLOCKING_POWER,
};
