//! # Latch Sequencer Library
//!
//! Open-loop, time-based sequencer for a lander motor and a latch-lock
//! servo. A dedicated control thread drives both actuators every
//! `CYCLE_PERIOD` according to the current [`Mode`](latch_common::sequencer::Mode);
//! any number of other threads issue commands through [`LatchCommands`].
//!
//! ## Modes
//!
//! | From | `raise()` | `lower()` | `stop()` | automatic |
//! |---|---|---|---|---|
//! | Standby | Unlocking | Lowering | Standby | — |
//! | Lowering | Unlocking | Lowering | Standby | — |
//! | Unlocking | — | Lowering | Standby | Raising after `UNLOCK_TIMEOUT` |
//! | Raising | — | Lowering | Standby | — |
//!
//! Initial mode is `Standby`. There is no terminal mode; `shutdown()` stops
//! the control loop without touching the mode.
//!
//! ## Shared State
//!
//! Mode + lock timer and the unlock timer are two independently locked
//! cells (see [`shared`]). Shutdown is cooperative: the running flag is
//! checked once per cycle.

pub mod clock;
pub mod command;
pub mod cycle;
pub mod error;
pub mod rt;
pub mod shared;
pub mod state;

pub use crate::clock::{Clock, ManualClock, SystemClock, Timer};
pub use crate::command::{Command, LatchCommands};
pub use crate::cycle::{CycleStats, LatchSequencer, SequencerHandle};
pub use crate::error::SequencerError;
pub use crate::shared::{LatchState, Snapshot};
