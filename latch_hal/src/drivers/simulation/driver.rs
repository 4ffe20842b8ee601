//! Simulated actuators implementing the `PowerSink` trait.

use super::probe::{ActuatorLog, ActuatorProbe};
use crate::hardware_map::HardwareMap;
use latch_common::config::ActuatorNames;
use latch_common::hal::driver::{HalError, PowerSink};
use latch_common::hal::types::{ActuatorKind, ZeroPowerBehavior};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::info;

/// Software actuator recording every output into a shared log.
pub struct SimulatedActuator {
    name: String,
    log: Arc<Mutex<ActuatorLog>>,
}

impl SimulatedActuator {
    /// Create a simulated actuator and the probe that observes it.
    pub fn new(name: impl Into<String>) -> (Self, ActuatorProbe) {
        let log = Arc::new(Mutex::new(ActuatorLog::default()));
        let probe = ActuatorProbe::new(Arc::clone(&log));
        (
            Self {
                name: name.into(),
                log,
            },
            probe,
        )
    }
}

impl PowerSink for SimulatedActuator {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_power(&mut self, power: f64) {
        self.log.lock().record(power);
    }

    fn set_zero_power_behavior(&mut self, behavior: ZeroPowerBehavior) {
        self.log.lock().zero_power_behavior = behavior;
    }
}

/// Probes for a simulated lander motor and latch servo.
#[derive(Debug, Clone)]
pub struct SimulationRig {
    /// Lander motor outputs (hardware side, after polarity).
    pub motor: ActuatorProbe,
    /// Latch servo outputs (hardware side, after polarity).
    pub servo: ActuatorProbe,
}

impl SimulationRig {
    /// Register a simulated motor and servo under the configured names.
    ///
    /// # Errors
    /// Returns `HalError::DuplicateDevice` if either name is already present.
    pub fn install(map: &mut HardwareMap, names: &ActuatorNames) -> Result<Self, HalError> {
        let (motor, motor_probe) = SimulatedActuator::new(names.motor.as_str());
        let (servo, servo_probe) = SimulatedActuator::new(names.servo.as_str());

        map.register(names.motor.as_str(), ActuatorKind::Motor, Box::new(motor))?;
        map.register(names.servo.as_str(), ActuatorKind::ContinuousServo, Box::new(servo))?;

        info!(
            "Simulation rig installed (motor='{}', servo='{}')",
            names.motor, names.servo
        );

        Ok(Self {
            motor: motor_probe,
            servo: servo_probe,
        })
    }
}
