//! Command entry points callable from any thread.
//!
//! Every command is total: it is either a guarded no-op or an
//! unconditional transition. None of them block beyond the short critical
//! sections in [`LatchState`].

use crate::clock::{Clock, SystemClock};
use crate::shared::{LatchState, Snapshot};
use latch_common::sequencer::Mode;
use static_assertions::assert_impl_all;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Cheap, cloneable handle issuing commands to a sequencer.
pub struct LatchCommands<C: Clock = SystemClock> {
    state: Arc<LatchState<C>>,
}

assert_impl_all!(LatchCommands<SystemClock>: Send, Sync, Clone);

impl<C: Clock> Clone for LatchCommands<C> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<C: Clock> LatchCommands<C> {
    pub(crate) fn new(state: Arc<LatchState<C>>) -> Self {
        Self { state }
    }

    /// Begin unlocking the latch, from `Standby` or `Lowering` only.
    ///
    /// The two precondition checks are separate locked reads, so another
    /// caller may change the mode between them (and between the check and
    /// the transition). The unlock timer is reset after the transition,
    /// under its own guard, so a cycle running in between can see
    /// `Unlocking` with the previous timer value.
    pub fn raise(&self) {
        if self.state.mode() == Mode::Standby || self.state.mode() == Mode::Lowering {
            self.state.set_mode(Mode::Unlocking);
            self.state.reset_unlock_timer();
        } else {
            debug!(mode = %self.state.mode(), "raise ignored");
        }
    }

    /// Drive the lander down. Valid from every mode.
    pub fn lower(&self) {
        self.state.set_mode(Mode::Lowering);
    }

    /// Stop the lander and lock the latch. Valid from every mode.
    pub fn stop(&self) {
        self.state.set_mode(Mode::Standby);
    }

    /// Stop the control loop at its next cycle boundary.
    ///
    /// Idempotent and irreversible; the current mode is left untouched.
    pub fn shutdown(&self) {
        self.state.request_shutdown();
    }

    /// Apply a parsed [`Command`].
    pub fn apply(&self, command: Command) {
        match command {
            Command::Raise => self.raise(),
            Command::Lower => self.lower(),
            Command::Stop => self.stop(),
            Command::Shutdown => self.shutdown(),
        }
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.state.mode()
    }

    /// Whether the control loop is still running.
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Point-in-time view of the sequencer.
    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    /// Underlying shared state.
    pub fn state(&self) -> &Arc<LatchState<C>> {
        &self.state
    }
}

impl<C: Clock> fmt::Debug for LatchCommands<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LatchCommands").field(&self.state).finish()
    }
}

/// Textual command, as read from an operator console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Raise,
    Lower,
    Stop,
    Shutdown,
}

/// Unrecognized command text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown command '{0}' (expected raise, lower, stop or shutdown)")]
pub struct ParseCommandError(pub String);

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raise" | "r" => Ok(Command::Raise),
            "lower" | "l" => Ok(Command::Lower),
            "stop" | "s" => Ok(Command::Stop),
            "shutdown" | "quit" | "q" => Ok(Command::Shutdown),
            _ => Err(ParseCommandError(s.trim().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::time::Duration;

    fn commands() -> (LatchCommands<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let state = Arc::new(LatchState::new(clock.clone()));
        (LatchCommands::new(state), clock)
    }

    #[test]
    fn raise_from_standby_unlocks_and_resets_timer() {
        let (cmd, clock) = commands();
        clock.advance_ms(2_000);
        cmd.raise();
        assert_eq!(cmd.mode(), Mode::Unlocking);
        assert_eq!(cmd.state().unlock_elapsed(), Duration::ZERO);
        assert_eq!(cmd.state().lock_elapsed(), Duration::ZERO);
    }

    #[test]
    fn raise_from_lowering_unlocks() {
        let (cmd, _) = commands();
        cmd.lower();
        cmd.raise();
        assert_eq!(cmd.mode(), Mode::Unlocking);
    }

    #[test]
    fn raise_is_noop_while_raising_or_unlocking() {
        let (cmd, clock) = commands();
        cmd.raise();
        clock.advance_ms(200);
        let transitions = cmd.state().transitions();

        cmd.raise();
        assert_eq!(cmd.mode(), Mode::Unlocking);
        assert_eq!(cmd.state().unlock_elapsed(), Duration::from_millis(200));
        assert_eq!(cmd.state().transitions(), transitions);

        cmd.state().set_mode(Mode::Raising);
        cmd.raise();
        assert_eq!(cmd.mode(), Mode::Raising);
    }

    #[test]
    fn lower_and_stop_are_unconditional() {
        let (cmd, _) = commands();
        for from in Mode::ALL {
            cmd.state().set_mode(from);
            cmd.lower();
            assert_eq!(cmd.mode(), Mode::Lowering, "lower from {from}");

            cmd.state().set_mode(from);
            cmd.stop();
            assert_eq!(cmd.mode(), Mode::Standby, "stop from {from}");
        }
    }

    #[test]
    fn shutdown_is_idempotent_and_keeps_mode() {
        let (cmd, _) = commands();
        cmd.lower();
        cmd.shutdown();
        cmd.shutdown();
        assert!(!cmd.is_running());
        assert_eq!(cmd.mode(), Mode::Lowering);
    }

    #[test]
    fn clones_share_state() {
        let (cmd, _) = commands();
        let other = cmd.clone();
        other.lower();
        assert_eq!(cmd.mode(), Mode::Lowering);
    }

    #[test]
    fn parse_commands() {
        assert_eq!("raise".parse::<Command>(), Ok(Command::Raise));
        assert_eq!(" LOWER \n".parse::<Command>(), Ok(Command::Lower));
        assert_eq!("s".parse::<Command>(), Ok(Command::Stop));
        assert_eq!("quit".parse::<Command>(), Ok(Command::Shutdown));
        assert!(matches!("jump".parse::<Command>(), Err(ParseCommandError(t)) if t == "jump"));
    }

    #[test]
    fn apply_dispatches() {
        let (cmd, _) = commands();
        cmd.apply(Command::Raise);
        assert_eq!(cmd.mode(), Mode::Unlocking);
        cmd.apply(Command::Stop);
        assert_eq!(cmd.mode(), Mode::Standby);
        cmd.apply(Command::Shutdown);
        assert!(!cmd.is_running());
    }
}
