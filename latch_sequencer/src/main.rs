//! # Latch Sequencer
//!
//! Runs the lander/latch sequencer against simulated actuators and accepts
//! operator commands on stdin, one per line:
//!
//! | Input | Effect |
//! |---|---|
//! | `raise` / `r` | unlock, then raise |
//! | `lower` / `l` | lower and lock |
//! | `stop` / `s` | stop and lock |
//! | `status` | print a JSON status line |
//! | `quit` / `q` / EOF | shut down |
//!
//! Ctrl-C also shuts down.

use clap::Parser;
use latch_common::config::{ConfigLoader, LatchConfig, LogLevel};
use latch_hal::{ActuatorProbe, HardwareMap, SimulationRig};
use latch_sequencer::command::Command;
use latch_sequencer::rt::RtOptions;
use latch_sequencer::{LatchCommands, LatchSequencer, Snapshot, SystemClock};
use serde::Serialize;
use std::io::BufRead;
use std::path::PathBuf;
use std::process;
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Latch Sequencer: lander motor and latch servo control loop
#[derive(Parser, Debug)]
#[command(name = "latch_sequencer")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Time-gated lander motor and latch servo sequencer")]
struct Args {
    /// Path to latch.toml. Defaults are used when omitted.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Apply RT scheduling to the control thread (requires the `rt` feature).
    #[arg(long)]
    realtime: bool,

    /// CPU core to pin the control thread to (default: 1).
    #[arg(long, default_value_t = 1)]
    cpu_core: usize,

    /// SCHED_FIFO priority (default: 80).
    #[arg(long, default_value_t = 80)]
    rt_priority: i32,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

/// One `status` line.
#[derive(Debug, Serialize)]
struct StatusReport {
    #[serde(flatten)]
    snapshot: Snapshot,
    motor_output: f64,
    servo_output: f64,
    motor_braking: bool,
}

fn main() {
    let args = Args::parse();
    let config = match args.config.as_deref() {
        Some(path) => LatchConfig::load(path).and_then(|c| c.validate().map(|()| c)),
        None => Ok(LatchConfig::default()),
    };

    let log_level = config
        .as_ref()
        .map(|c| c.shared.log_level)
        .unwrap_or_default();
    setup_tracing(&args, log_level);

    info!("Latch Sequencer v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("FATAL: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = run(&args, &config) {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("Latch Sequencer shutdown complete");
}

fn run(args: &Args, config: &LatchConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        "Config OK: service={}, motor='{}', servo='{}'",
        config.shared.service_name, config.actuators.motor, config.actuators.servo
    );

    let mut hardware = HardwareMap::new();
    let rig = SimulationRig::install(&mut hardware, &config.actuators)?;

    let sequencer = LatchSequencer::new(&mut hardware, &config.actuators, SystemClock::new())?;

    let rt = args.realtime.then_some(RtOptions {
        cpu_core: args.cpu_core,
        priority: args.rt_priority,
    });
    let handle = sequencer.spawn_with(rt)?;

    // Setup signal handler for graceful shutdown.
    let commands = handle.commands().clone();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        commands.shutdown();
    })?;

    // stdin blocks; the reader thread is abandoned once the loop stops.
    let commands = handle.commands().clone();
    std::thread::Builder::new()
        .name("latch-console".to_string())
        .spawn(move || console(commands, rig))?;

    let stats = handle.join()?;
    info!(
        "Cycles: {}, avg body {}ns, max body {}ns, overruns {}",
        stats.cycle_count,
        stats.avg_cycle_ns(),
        stats.max_cycle_ns,
        stats.overruns
    );
    Ok(())
}

/// Read operator commands from stdin until EOF, `quit` or shutdown.
fn console(commands: LatchCommands, rig: SimulationRig) {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("stdin read failed: {e}");
                break;
            }
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("status") {
            print_status(&commands, &rig.motor, &rig.servo);
            continue;
        }
        match input.parse::<Command>() {
            Ok(command) => {
                info!("Operator command: {command:?}");
                commands.apply(command);
            }
            Err(e) => warn!("{e}"),
        }
        if !commands.is_running() {
            return;
        }
    }
    info!("Console closed");
    commands.shutdown();
}

fn print_status(commands: &LatchCommands, motor: &ActuatorProbe, servo: &ActuatorProbe) {
    let report = StatusReport {
        snapshot: commands.snapshot(),
        motor_output: motor.last_power(),
        servo_output: servo.last_power(),
        motor_braking: motor.is_braking(),
    };
    match serde_json::to_string(&report) {
        Ok(json) => println!("{json}"),
        Err(e) => warn!("Failed to encode status: {e}"),
    }
}

/// Setup tracing subscriber based on CLI arguments and configured level.
fn setup_tracing(args: &Args, configured: LogLevel) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::from(configured)
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
