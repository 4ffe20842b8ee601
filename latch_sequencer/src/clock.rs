//! Monotonic time sources and elapsed-time timers.
//!
//! The sequencer never reads wall-clock time directly. Everything goes
//! through a [`Clock`] so the control loop can run against real time
//! ([`SystemClock`]) or against simulated milliseconds ([`ManualClock`]).

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Monotonic time source used by the sequencer.
pub trait Clock: Send + Sync + 'static {
    /// Time since the clock's origin. Never decreases.
    fn now(&self) -> Duration;

    /// Block the calling thread for up to `duration`.
    ///
    /// Returning early (an interrupted sleep) is allowed; the caller treats
    /// it as "continue immediately".
    fn sleep(&self, duration: Duration);
}

/// Real monotonic time.
///
/// `sleep` parks the thread, so an `unpark` (e.g. from
/// `LatchCommands::shutdown`) or a spurious wake-up ends it early.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        thread::park_timeout(duration);
    }
}

/// Simulated time, advanced explicitly.
///
/// Clones share the same time base. `sleep` advances simulated time by the
/// requested amount and yields, so a control loop running against this
/// clock moves through simulated time as fast as the host allows.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock reading zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move simulated time forward.
    pub fn advance(&self, by: Duration) {
        self.nanos.fetch_add(saturating_nanos(by), Ordering::SeqCst);
    }

    /// Move simulated time forward by whole milliseconds.
    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
        thread::yield_now();
    }
}

fn saturating_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

/// Elapsed-time timer measured against a [`Clock`] reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    started_at: Duration,
}

impl Timer {
    /// A timer whose zero point is `now`.
    #[inline]
    pub const fn started_at(now: Duration) -> Self {
        Self { started_at: now }
    }

    /// Move the zero point to `now`.
    #[inline]
    pub fn reset(&mut self, now: Duration) {
        self.started_at = now;
    }

    /// Time since the last reset. Saturates at zero.
    #[inline]
    pub fn elapsed(&self, now: Duration) -> Duration {
        now.saturating_sub(self.started_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances_and_shares() {
        let clock = ManualClock::new();
        let other = clock.clone();
        assert_eq!(clock.now(), Duration::ZERO);

        other.advance_ms(15);
        assert_eq!(clock.now(), Duration::from_millis(15));

        clock.sleep(Duration::from_millis(5));
        assert_eq!(other.now(), Duration::from_millis(20));
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn system_clock_sleep_returns() {
        let clock = SystemClock::new();
        let before = clock.now();
        clock.sleep(Duration::from_millis(1));
        // park_timeout may wake early; only monotonicity is guaranteed.
        assert!(clock.now() >= before);
    }

    #[test]
    fn timer_never_negative() {
        let timer = Timer::started_at(Duration::from_millis(100));
        assert_eq!(timer.elapsed(Duration::from_millis(50)), Duration::ZERO);
        assert_eq!(timer.elapsed(Duration::from_millis(130)), Duration::from_millis(30));
    }

    #[test]
    fn timer_reset_moves_zero_point() {
        let mut timer = Timer::started_at(Duration::ZERO);
        timer.reset(Duration::from_millis(400));
        assert_eq!(timer.elapsed(Duration::from_millis(400)), Duration::ZERO);
        assert_eq!(timer.elapsed(Duration::from_millis(900)), Duration::from_millis(500));
    }
}
