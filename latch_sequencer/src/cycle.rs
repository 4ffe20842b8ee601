//! Control loop: read mode → actuate → gate check → sleep.
//!
//! [`LatchSequencer`] owns both actuators and drives them every cycle
//! according to the current mode. It runs until the shared running flag is
//! cleared, checking the flag once at the top of every cycle; a cycle that
//! has started always completes.
//!
//! ## Cycle Body
//! 1. Read the mode (mode guard).
//! 2. For `Lowering`/`Standby`, read the lock timer (mode guard).
//! 3. Plan the cycle with [`plan_cycle`] and command motor and servo.
//! 4. For `Unlocking`, steps 3 and 4 run under the unlock guard: after
//!    actuating, advance to `Raising` if `UNLOCK_TIMEOUT` has elapsed.
//!
//! ## Pacing
//! A fixed `CYCLE_PERIOD` sleep follows every cycle. An interrupted sleep
//! simply starts the next cycle early.

use crate::clock::{Clock, SystemClock};
use crate::command::LatchCommands;
use crate::error::SequencerError;
use crate::rt::{RtOptions, is_realtime, rt_available, rt_setup};
use crate::shared::LatchState;
use crate::state::machine::{CyclePlan, plan_cycle};
use latch_common::config::ActuatorNames;
use latch_common::consts::{
    CONTROL_THREAD_NAME, CYCLE_PERIOD, MOTOR_DIRECTION, MOTOR_ZERO_POWER, SERVO_DIRECTION,
};
use latch_common::hal::types::ActuatorKind;
use latch_common::sequencer::Mode;
use latch_hal::{Actuator, HardwareMap};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Cycles between periodic debug summaries (~15 s at the nominal period).
const STATS_LOG_INTERVAL: u64 = 1000;

// ─── Cycle Statistics ───────────────────────────────────────────────

/// O(1) per-cycle timing statistics.
///
/// Durations cover the cycle body only, not the inter-cycle sleep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleStats {
    /// Total cycles executed.
    pub cycle_count: u64,
    /// Last cycle body duration [ns].
    pub last_cycle_ns: u64,
    /// Minimum cycle body duration [ns].
    pub min_cycle_ns: u64,
    /// Maximum cycle body duration [ns].
    pub max_cycle_ns: u64,
    /// Running sum for average computation.
    pub sum_cycle_ns: u128,
    /// Cycles whose body alone exceeded `CYCLE_PERIOD`.
    pub overruns: u64,
}

impl CycleStats {
    /// Create a new zeroed stats instance.
    pub const fn new() -> Self {
        Self {
            cycle_count: 0,
            last_cycle_ns: 0,
            min_cycle_ns: u64::MAX,
            max_cycle_ns: 0,
            sum_cycle_ns: 0,
            overruns: 0,
        }
    }

    /// Record a cycle body duration. Returns `true` on overrun.
    #[inline]
    pub fn record(&mut self, duration: Duration) -> bool {
        let ns = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        self.cycle_count += 1;
        self.last_cycle_ns = ns;
        self.min_cycle_ns = self.min_cycle_ns.min(ns);
        self.max_cycle_ns = self.max_cycle_ns.max(ns);
        self.sum_cycle_ns += u128::from(ns);
        let overrun = duration > CYCLE_PERIOD;
        if overrun {
            self.overruns += 1;
        }
        overrun
    }

    /// Average cycle body duration [ns] (returns 0 if no cycles).
    #[inline]
    pub fn avg_cycle_ns(&self) -> u64 {
        if self.cycle_count == 0 {
            0
        } else {
            (self.sum_cycle_ns / u128::from(self.cycle_count)) as u64
        }
    }
}

impl Default for CycleStats {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Sequencer ──────────────────────────────────────────────────────

/// The latch sequencer: actuators, shared state and loop statistics.
pub struct LatchSequencer<C: Clock = SystemClock> {
    motor: Actuator,
    servo: Actuator,
    state: Arc<LatchState<C>>,
    stats: CycleStats,
}

impl<C: Clock> LatchSequencer<C> {
    /// Resolve both actuators from the hardware map and start in `Standby`.
    ///
    /// The motor is mounted reversed and brakes at zero power; the servo
    /// runs forward. Both are fixed wiring, not configuration.
    ///
    /// # Errors
    /// - `SequencerError::Config` if the names are invalid
    /// - `SequencerError::Hal` if either device is missing or of the wrong kind
    pub fn new(
        hardware: &mut HardwareMap,
        names: &ActuatorNames,
        clock: C,
    ) -> Result<Self, SequencerError> {
        names.validate()?;

        let motor =
            Actuator::from_map(hardware, &names.motor, ActuatorKind::Motor, MOTOR_DIRECTION)?
                .with_zero_power_behavior(MOTOR_ZERO_POWER);
        let servo = Actuator::from_map(
            hardware,
            &names.servo,
            ActuatorKind::ContinuousServo,
            SERVO_DIRECTION,
        )?;

        info!(
            "Sequencer created (motor='{}' {:?}, servo='{}' {:?})",
            motor.name(),
            motor.direction(),
            servo.name(),
            servo.direction()
        );

        Ok(Self::from_actuators(motor, servo, clock))
    }

    /// Build from already-configured actuators.
    pub fn from_actuators(motor: Actuator, servo: Actuator, clock: C) -> Self {
        Self {
            motor,
            servo,
            state: Arc::new(LatchState::new(clock)),
            stats: CycleStats::new(),
        }
    }

    /// A command handle sharing this sequencer's state.
    pub fn commands(&self) -> LatchCommands<C> {
        LatchCommands::new(Arc::clone(&self.state))
    }

    pub fn state(&self) -> &Arc<LatchState<C>> {
        &self.state
    }

    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    pub fn motor(&self) -> &Actuator {
        &self.motor
    }

    pub fn servo(&self) -> &Actuator {
        &self.servo
    }

    /// Execute one cycle body. Returns the mode the cycle ran in.
    ///
    /// An `Unlocking` cycle is planned, actuated and gated while holding the
    /// unlock guard; every other mode has no automatic transition and never
    /// touches the unlock timer.
    pub fn cycle_once(&mut self) -> Mode {
        let Self {
            motor,
            servo,
            state,
            ..
        } = self;
        let state: &LatchState<C> = state;

        let mode = state.mode();
        let lock_elapsed = if mode.locks_latch() {
            state.lock_elapsed()
        } else {
            Duration::ZERO
        };

        if mode == Mode::Unlocking {
            state.with_unlock_timer(|unlock_elapsed| {
                let plan = plan_cycle(mode, lock_elapsed, unlock_elapsed);
                actuate(motor, servo, &plan);
                if let Some(next) = plan.next {
                    state.set_mode(next);
                }
            });
        } else {
            let plan = plan_cycle(mode, lock_elapsed, Duration::ZERO);
            actuate(motor, servo, &plan);
        }

        mode
    }

    /// Run cycles until shutdown is requested. Returns the final statistics.
    pub fn run(&mut self) -> CycleStats {
        info!(
            "Entering control loop (period={}ms, rt={})",
            CYCLE_PERIOD.as_millis(),
            is_realtime()
        );

        let state = Arc::clone(&self.state);
        let clock = state.clock();

        while state.is_running() {
            let cycle_start = clock.now();

            self.cycle_once();

            let elapsed = clock.now().saturating_sub(cycle_start);
            if self.stats.record(elapsed) {
                let overruns = self.stats.overruns;
                if overruns <= 10 || overruns % 1000 == 0 {
                    warn!(
                        "Cycle overrun #{}: body took {}us (period {}ms)",
                        overruns,
                        elapsed.as_micros(),
                        CYCLE_PERIOD.as_millis()
                    );
                }
            }

            if self.stats.cycle_count % STATS_LOG_INTERVAL == 0 {
                debug!(
                    "Control loop: {} cycles, avg={}ns, max={}ns, overruns={}, mode={}",
                    self.stats.cycle_count,
                    self.stats.avg_cycle_ns(),
                    self.stats.max_cycle_ns,
                    self.stats.overruns,
                    state.mode()
                );
            }

            clock.sleep(CYCLE_PERIOD);
        }

        info!(
            "Control loop stopped after {} cycles (overruns: {})",
            self.stats.cycle_count, self.stats.overruns
        );
        self.stats.clone()
    }

    /// Run the loop on a dedicated thread.
    pub fn spawn(self) -> Result<SequencerHandle<C>, SequencerError> {
        self.spawn_with(None)
    }

    /// Run the loop on a dedicated thread, optionally with RT scheduling.
    ///
    /// If RT setup fails the loop never starts, the running flag is cleared
    /// and the error is returned from [`SequencerHandle::join`].
    pub fn spawn_with(
        mut self,
        rt: Option<RtOptions>,
    ) -> Result<SequencerHandle<C>, SequencerError> {
        let commands = self.commands();
        let state = Arc::clone(&self.state);

        let thread = thread::Builder::new()
            .name(CONTROL_THREAD_NAME.to_string())
            .spawn(move || -> Result<CycleStats, SequencerError> {
                match rt {
                    Some(_) if !rt_available() => {
                        warn!("RT scheduling requested but the rt feature is disabled");
                    }
                    Some(options) => {
                        if let Err(e) = rt_setup(options) {
                            self.state.request_shutdown();
                            return Err(e);
                        }
                        info!(
                            "RT setup complete (cpu_core={}, priority={})",
                            options.cpu_core, options.priority
                        );
                    }
                    None => {}
                }
                Ok(self.run())
            })
            .map_err(SequencerError::Spawn)?;

        state.attach_control_thread(thread.thread().clone());

        Ok(SequencerHandle { commands, thread })
    }
}

/// Write one cycle's powers: motor first, then servo.
#[inline]
fn actuate(motor: &mut Actuator, servo: &mut Actuator, plan: &CyclePlan) {
    motor.set_power(plan.motor);
    servo.set_power(plan.servo);
}

impl<C: Clock> std::fmt::Debug for LatchSequencer<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LatchSequencer")
            .field("motor", &self.motor)
            .field("servo", &self.servo)
            .field("state", &self.state)
            .field("stats", &self.stats)
            .finish()
    }
}

// ─── Handle ─────────────────────────────────────────────────────────

/// A sequencer running on its own thread.
pub struct SequencerHandle<C: Clock = SystemClock> {
    commands: LatchCommands<C>,
    thread: JoinHandle<Result<CycleStats, SequencerError>>,
}

impl<C: Clock> SequencerHandle<C> {
    /// Command handle for the running sequencer.
    pub fn commands(&self) -> &LatchCommands<C> {
        &self.commands
    }

    /// Whether the control thread has returned.
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait for the control thread to return.
    pub fn join(self) -> Result<CycleStats, SequencerError> {
        self.thread
            .join()
            .map_err(|_| SequencerError::ControlThreadPanicked)?
    }

    /// Request shutdown, then wait for the control thread.
    pub fn shutdown_and_join(self) -> Result<CycleStats, SequencerError> {
        self.commands.shutdown();
        self.join()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
