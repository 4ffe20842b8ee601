//! Shared observation handle for a simulated actuator.

use latch_common::hal::types::ZeroPowerBehavior;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Number of most recent outputs kept in [`ActuatorLog::history`].
pub const HISTORY_CAPACITY: usize = 4096;

/// Everything a simulated actuator has been told.
#[derive(Debug, Clone, Default)]
pub struct ActuatorLog {
    /// Last hardware-side power written.
    pub last_power: f64,
    /// Total `set_power` calls.
    pub command_count: u64,
    /// Most recent hardware-side powers, oldest first.
    pub history: VecDeque<f64>,
    /// Configured zero-power behavior.
    pub zero_power_behavior: ZeroPowerBehavior,
}

impl ActuatorLog {
    pub(crate) fn record(&mut self, power: f64) {
        self.last_power = power;
        self.command_count += 1;
        if self.history.len() == HISTORY_CAPACITY {
            self.history.pop_front();
        }
        self.history.push_back(power);
    }

    /// Whether the output is currently braking (zero power with brake enabled).
    pub fn is_braking(&self) -> bool {
        self.zero_power_behavior == ZeroPowerBehavior::Brake && self.last_power == 0.0
    }
}

/// Cloneable read handle on a simulated actuator's log.
#[derive(Debug, Clone, Default)]
pub struct ActuatorProbe {
    log: Arc<Mutex<ActuatorLog>>,
}

impl ActuatorProbe {
    pub(crate) fn new(log: Arc<Mutex<ActuatorLog>>) -> Self {
        Self { log }
    }

    pub fn last_power(&self) -> f64 {
        self.log.lock().last_power
    }

    pub fn command_count(&self) -> u64 {
        self.log.lock().command_count
    }

    pub fn zero_power_behavior(&self) -> ZeroPowerBehavior {
        self.log.lock().zero_power_behavior
    }

    pub fn is_braking(&self) -> bool {
        self.log.lock().is_braking()
    }

    /// Copy of the recorded outputs, oldest first.
    pub fn history(&self) -> Vec<f64> {
        self.log.lock().history.iter().copied().collect()
    }

    /// Copy of the whole log.
    pub fn snapshot(&self) -> ActuatorLog {
        self.log.lock().clone()
    }
}
