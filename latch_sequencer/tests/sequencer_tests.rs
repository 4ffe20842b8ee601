//! Integration tests for the latch sequencer.
//!
//! Drives the sequencer cycle by cycle against simulated actuators and a
//! manual clock, checking mode transitions, timing gates and the outputs
//! the hardware actually receives.

use latch_common::config::ActuatorNames;
use latch_common::consts::{
    CYCLE_PERIOD, DEPLOY_POWER, LOCK_SETTLE_TIME, LOCKED_POWER, LOCKING_POWER, UNLOCK_TIMEOUT,
    UNLOCKED_POWER, UNLOCKING_POWER,
};
use latch_common::sequencer::Mode;
use latch_hal::{HardwareMap, SimulationRig};
use latch_sequencer::{Clock, LatchSequencer, ManualClock, SystemClock};
use std::time::{Duration, Instant};

// ── Helpers ─────────────────────────────────────────────────────────

fn rig_with<C: Clock>(clock: C) -> (LatchSequencer<C>, SimulationRig) {
    let mut map = HardwareMap::new();
    let names = ActuatorNames::default();
    let rig = SimulationRig::install(&mut map, &names).expect("install rig");
    let seq = LatchSequencer::new(&mut map, &names, clock).expect("build sequencer");
    (seq, rig)
}

/// Run cycles the way the control loop does: cycle, then one period of sleep.
fn run_cycles(seq: &mut LatchSequencer<ManualClock>, clock: &ManualClock, n: usize) {
    for _ in 0..n {
        seq.cycle_once();
        clock.advance(CYCLE_PERIOD);
    }
}

fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    cond()
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn initial_state_is_standby_with_latch_locking() {
    let clock = ManualClock::new();
    let (mut seq, rig) = rig_with(clock.clone());

    assert_eq!(seq.state().mode(), Mode::Standby);
    seq.cycle_once();
    assert_eq!(rig.motor.last_power(), 0.0);
    assert_eq!(rig.servo.last_power(), LOCKING_POWER);
    assert!(rig.motor.is_braking());
}

#[test]
fn full_raise_sequence() {
    let clock = ManualClock::new();
    let (mut seq, rig) = rig_with(clock.clone());
    let commands = seq.commands();

    commands.raise();
    assert_eq!(commands.mode(), Mode::Unlocking);

    // Unlocking: motor idle, servo opening, until the unlock timeout passes.
    let mut cycles = 0;
    while seq.state().mode() == Mode::Unlocking {
        seq.cycle_once();
        assert_eq!(rig.motor.last_power().abs(), 0.0);
        assert_eq!(rig.servo.last_power(), UNLOCKING_POWER);
        clock.advance(CYCLE_PERIOD);
        cycles += 1;
        assert!(cycles < 100, "unlocking never advanced");
    }

    assert_eq!(seq.state().mode(), Mode::Raising);
    let unlocked_for = CYCLE_PERIOD * (cycles - 1);
    assert!(unlocked_for > UNLOCK_TIMEOUT, "advanced after {unlocked_for:?}");
    assert!(unlocked_for <= UNLOCK_TIMEOUT + CYCLE_PERIOD);

    // Raising: motor forward (reversed at the hardware), latch held open.
    seq.cycle_once();
    assert_eq!(seq.motor().last_power(), DEPLOY_POWER);
    assert_eq!(rig.motor.last_power(), -DEPLOY_POWER);
    assert_eq!(rig.servo.last_power(), UNLOCKED_POWER);
}

#[test]
fn lowering_locks_for_settle_time_then_holds() {
    let clock = ManualClock::new();
    let (mut seq, rig) = rig_with(clock.clone());
    seq.state().set_mode(Mode::Raising);
    run_cycles(&mut seq, &clock, 3);

    seq.commands().lower();
    let entered = clock.now();

    loop {
        let elapsed = clock.now() - entered;
        seq.cycle_once();
        assert_eq!(seq.motor().last_power(), -DEPLOY_POWER);
        if elapsed < LOCK_SETTLE_TIME {
            assert_eq!(rig.servo.last_power(), LOCKING_POWER, "at {elapsed:?}");
        } else {
            assert_eq!(rig.servo.last_power(), LOCKED_POWER, "at {elapsed:?}");
            break;
        }
        clock.advance(CYCLE_PERIOD);
    }
}

#[test]
fn lock_boundary_is_exact() {
    let clock = ManualClock::new();
    let (mut seq, rig) = rig_with(clock.clone());
    seq.commands().stop();

    clock.advance(LOCK_SETTLE_TIME - Duration::from_millis(1));
    seq.cycle_once();
    assert_eq!(rig.servo.last_power(), LOCKING_POWER);

    clock.advance_ms(1);
    seq.cycle_once();
    assert_eq!(rig.servo.last_power(), LOCKED_POWER);
}

#[test]
fn every_transition_restarts_lock_routine() {
    let clock = ManualClock::new();
    let (mut seq, rig) = rig_with(clock.clone());

    clock.advance_ms(1_000);
    seq.cycle_once();
    assert_eq!(rig.servo.last_power(), LOCKED_POWER);

    seq.commands().lower();
    seq.cycle_once();
    assert_eq!(rig.servo.last_power(), LOCKING_POWER);

    clock.advance_ms(600);
    seq.cycle_once();
    assert_eq!(rig.servo.last_power(), LOCKED_POWER);

    seq.commands().stop();
    seq.cycle_once();
    assert_eq!(rig.servo.last_power(), LOCKING_POWER);
}

#[test]
fn stop_interrupts_unlocking() {
    let clock = ManualClock::new();
    let (mut seq, rig) = rig_with(clock.clone());
    let commands = seq.commands();

    commands.raise();
    run_cycles(&mut seq, &clock, 10);
    commands.stop();

    // Well past the unlock timeout: must stay in standby.
    run_cycles(&mut seq, &clock, 60);
    assert_eq!(commands.mode(), Mode::Standby);
    assert_eq!(rig.servo.last_power(), LOCKED_POWER);
}

#[test]
fn lower_interrupts_raising_and_raise_resumes() {
    let clock = ManualClock::new();
    let (mut seq, _rig) = rig_with(clock.clone());
    let commands = seq.commands();

    commands.raise();
    run_cycles(&mut seq, &clock, 40);
    assert_eq!(commands.mode(), Mode::Raising);

    commands.lower();
    assert_eq!(commands.mode(), Mode::Lowering);
    run_cycles(&mut seq, &clock, 5);

    commands.raise();
    assert_eq!(commands.mode(), Mode::Unlocking);
    assert_eq!(seq.state().unlock_elapsed(), Duration::ZERO);
}

#[test]
fn raise_while_unlocking_does_not_restart_timeout() {
    let clock = ManualClock::new();
    let (mut seq, _rig) = rig_with(clock.clone());
    let commands = seq.commands();

    commands.raise();
    run_cycles(&mut seq, &clock, 20); // 300 ms
    commands.raise();
    run_cycles(&mut seq, &clock, 15); // 525 ms total
    assert_eq!(commands.mode(), Mode::Raising);
}

#[test]
fn spawned_loop_advances_through_unlocking() {
    let clock = ManualClock::new();
    let (seq, rig) = rig_with(clock.clone());
    let handle = seq.spawn().expect("spawn");

    let raised_at = clock.now();
    handle.commands().raise();

    assert!(wait_until(Duration::from_secs(5), || {
        handle.commands().mode() == Mode::Raising
    }));
    assert!(clock.now() - raised_at > UNLOCK_TIMEOUT);

    assert!(wait_until(Duration::from_secs(5), || {
        rig.servo.last_power() == UNLOCKED_POWER
    }));
    handle.shutdown_and_join().expect("join");
}

#[test]
fn shutdown_stops_actuation_promptly() {
    let (seq, rig) = rig_with(SystemClock::new());
    let handle = seq.spawn().expect("spawn");

    assert!(wait_until(Duration::from_secs(2), || rig.motor.command_count() >= 3));

    let requested = Instant::now();
    handle.commands().shutdown();
    handle.commands().shutdown();
    let stats = handle.join().expect("join");
    let latency = requested.elapsed();

    // One in-flight cycle may finish; the sleep is cut short by the unpark.
    assert!(latency < Duration::from_millis(250), "shutdown took {latency:?}");

    let after = rig.motor.command_count();
    assert_eq!(after, stats.cycle_count);
    std::thread::sleep(CYCLE_PERIOD * 3);
    assert_eq!(rig.motor.command_count(), after);
    assert_eq!(rig.servo.command_count(), after);
}

#[test]
fn shutdown_leaves_mode_untouched() {
    let (seq, _rig) = rig_with(SystemClock::new());
    let commands = seq.commands();
    let handle = seq.spawn().expect("spawn");

    commands.lower();
    handle.shutdown_and_join().expect("join");
    assert_eq!(commands.mode(), Mode::Lowering);
    assert!(!commands.is_running());
}
