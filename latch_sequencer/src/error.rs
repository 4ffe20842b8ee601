//! Startup and lifecycle errors.
//!
//! Commands never fail; only building, spawning and joining the control
//! loop can.

use latch_common::config::ConfigError;
use latch_common::hal::driver::HalError;
use thiserror::Error;

/// Errors raised while constructing or running the sequencer.
#[derive(Debug, Error)]
pub enum SequencerError {
    /// An actuator could not be resolved from the hardware map.
    #[error("hardware error: {0}")]
    Hal(#[from] HalError),

    /// Configuration could not be loaded or validated.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The control thread could not be started.
    #[error("failed to spawn control thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// RT system call failed.
    #[error("RT setup error: {0}")]
    RtSetup(String),

    /// The control thread panicked before returning.
    #[error("control thread panicked")]
    ControlThreadPanicked,
}
