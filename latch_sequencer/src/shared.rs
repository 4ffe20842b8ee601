//! Guarded state shared between the control loop and command callers.
//!
//! Two independently locked cells:
//!
//! 1. **Mode region**: current [`Mode`] plus the lock timer. Every
//!    transition resets the lock timer under the same guard, so no reader
//!    ever sees a new mode paired with a stale timer.
//! 2. **Unlock region**: the unlock timer alone, reset by `raise()` and
//!    checked by the control loop while in `Unlocking`.
//!
//! No code path holds both guards in the order mode → unlock, so the two
//! regions cannot deadlock. Across regions there is no ordering guarantee,
//! which leaves three known windows:
//!
//! - `raise()` checks `Standby`/`Lowering` with two separate mode reads, so
//!   the mode can change between the checks and the transition.
//! - `raise()` sets `Unlocking` before it resets the unlock timer. A cycle
//!   landing in between sees `Unlocking` with a stale timer and may advance
//!   to `Raising` at once.
//! - The control loop gates `Unlocking` on the mode read at the top of the
//!   cycle. A `stop()` or `lower()` landing between that read and the gate
//!   check is overwritten by the transition to `Raising`.
//!
//! The running flag is a separate `AtomicBool` that goes `true → false`
//! exactly once.

use crate::clock::{Clock, SystemClock, Timer};
use latch_common::sequencer::Mode;
use parking_lot::Mutex;
use serde::Serialize;
use static_assertions::assert_impl_all;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::Thread;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug)]
struct ModeRegion {
    mode: Mode,
    lock_timer: Timer,
}

/// Point-in-time view of the sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Snapshot {
    /// Current mode.
    pub mode: Mode,
    /// Time since the last transition [ms].
    pub lock_elapsed_ms: f64,
    /// Time since `raise()` last entered `Unlocking` [ms].
    pub unlock_elapsed_ms: f64,
    /// Whether the control loop is still allowed to run.
    pub running: bool,
    /// Transitions applied since construction.
    pub transitions: u64,
}

/// State owned by the sequencer and shared with every command handle.
pub struct LatchState<C: Clock = SystemClock> {
    clock: C,
    mode: Mutex<ModeRegion>,
    unlock_timer: Mutex<Timer>,
    running: AtomicBool,
    transitions: AtomicU64,
    control_thread: OnceLock<Thread>,
}

assert_impl_all!(LatchState<SystemClock>: Send, Sync);

impl<C: Clock> LatchState<C> {
    /// Fresh state: `Standby`, both timers reset, running.
    pub fn new(clock: C) -> Self {
        let now = clock.now();
        Self {
            clock,
            mode: Mutex::new(ModeRegion {
                mode: Mode::Standby,
                lock_timer: Timer::started_at(now),
            }),
            unlock_timer: Mutex::new(Timer::started_at(now)),
            running: AtomicBool::new(true),
            transitions: AtomicU64::new(0),
            control_thread: OnceLock::new(),
        }
    }

    /// The time source shared with the control loop.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    // ─── Mode region ────────────────────────────────────────────────

    /// Current mode.
    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode.lock().mode
    }

    /// Transition to `mode` and reset the lock timer. Returns the previous mode.
    ///
    /// Setting the current mode again still counts as a transition and
    /// restarts the lock routine.
    pub fn set_mode(&self, mode: Mode) -> Mode {
        let previous = {
            let mut region = self.mode.lock();
            region.lock_timer.reset(self.clock.now());
            std::mem::replace(&mut region.mode, mode)
        };
        self.transitions.fetch_add(1, Ordering::Relaxed);
        debug!(from = %previous, to = %mode, "mode transition");
        previous
    }

    /// Time since the last transition, read under the mode guard.
    #[inline]
    pub fn lock_elapsed(&self) -> Duration {
        let region = self.mode.lock();
        region.lock_timer.elapsed(self.clock.now())
    }

    // ─── Unlock region ──────────────────────────────────────────────

    /// Restart the unlock timer.
    pub fn reset_unlock_timer(&self) {
        self.unlock_timer.lock().reset(self.clock.now());
    }

    /// Time since the unlock timer was last reset.
    pub fn unlock_elapsed(&self) -> Duration {
        self.unlock_timer.lock().elapsed(self.clock.now())
    }

    /// Run `f` with the unlock elapsed time while holding the unlock guard.
    ///
    /// `raise()` cannot reset the timer until `f` returns.
    pub fn with_unlock_timer<R>(&self, f: impl FnOnce(Duration) -> R) -> R {
        let timer = self.unlock_timer.lock();
        f(timer.elapsed(self.clock.now()))
    }

    // ─── Lifecycle ──────────────────────────────────────────────────

    /// Whether the control loop should keep cycling.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Clear the running flag and wake the control thread if it is sleeping.
    ///
    /// Returns `true` only for the call that actually cleared the flag.
    pub fn request_shutdown(&self) -> bool {
        let was_running = self.running.swap(false, Ordering::SeqCst);
        if was_running {
            info!("Shutdown requested");
        }
        if let Some(thread) = self.control_thread.get() {
            thread.unpark();
        }
        was_running
    }

    /// Record the thread running the control loop so shutdown can wake it.
    pub(crate) fn attach_control_thread(&self, thread: Thread) {
        let _ = self.control_thread.set(thread);
    }

    /// Number of transitions applied since construction.
    pub fn transitions(&self) -> u64 {
        self.transitions.load(Ordering::Relaxed)
    }

    /// Mode and lock timer read together; unlock timer read separately.
    pub fn snapshot(&self) -> Snapshot {
        let (mode, lock_elapsed) = {
            let region = self.mode.lock();
            (region.mode, region.lock_timer.elapsed(self.clock.now()))
        };
        Snapshot {
            mode,
            lock_elapsed_ms: lock_elapsed.as_secs_f64() * 1000.0,
            unlock_elapsed_ms: self.unlock_elapsed().as_secs_f64() * 1000.0,
            running: self.is_running(),
            transitions: self.transitions(),
        }
    }
}

impl<C: Clock> std::fmt::Debug for LatchState<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LatchState")
            .field("mode", &self.mode())
            .field("running", &self.is_running())
            .field("transitions", &self.transitions())
            .finish_non_exhaustive()
    }
}
