// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! One control cycle.
//!
//! [`ControlContext`] owns every piece of control state and runs the stages in order:
//!
//! 1. markers (may arm or complete the stop sequence),
//! 2. position estimate,
//! 3. speed ramp, capped at the brake speed once the stop sequence is armed,
//! 4. steering correction and actuation.
//!
//! Typical usage pattern:
//!
//! ```ignore
//! let mut ctx = ControlContext::new(config, profile, decel_timer, stop_timer)?;
//!
//! loop {
//!     ctx.cycle(&mut sensors, &mut motors, &mut diagnostics);
//!     wait_for_tick();
//! }
//! ```

use crate::config::{ConfigError, ControlConfig};
use crate::control::pid::Pid;
use crate::control::run::{RunState, RunSupervisor, StopPhase};
use crate::control::speed::SpeedController;
use crate::control::MotorCommand;
use crate::interfaces::{DiagnosticsSink, ElapsedTimer, MotorActuator, RawSensorSource};
use crate::sensing::calibration::CalibrationProfile;
use crate::sensing::markers::{MarkerEvents, MarkerStateMachine};
use crate::sensing::position::PositionEstimator;

/// What one cycle did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CycleOutcome {
    /// Command sent to the motors.
    pub command: MotorCommand,
    pub markers: MarkerEvents,
    pub stop_phase: StopPhase,
    /// Line error used this cycle; `None` once the robot is stopped.
    pub error: Option<i32>,
}

/// All control-loop state for one run.
pub struct ControlContext<T> {
    config: ControlConfig,
    profile: CalibrationProfile,
    estimator: PositionEstimator,
    markers: MarkerStateMachine,
    run: RunSupervisor<T>,
    speed: SpeedController,
    pid: Pid,
}

impl<T: ElapsedTimer> ControlContext<T> {
    /// Create the context for a run. The speed starts at the fast cruise speed.
    pub fn new(
        config: ControlConfig,
        profile: CalibrationProfile,
        decel_timer: T,
        stop_timer: T,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            config,
            profile,
            estimator: PositionEstimator::new(config.sensor_weights, config.line_threshold),
            markers: MarkerStateMachine::new(config.marker_threshold, config.marker_polarity),
            run: RunSupervisor::new(
                config.finish_target,
                config.brake_speed,
                config.decel_ms,
                config.stop_delay_ms,
                decel_timer,
                stop_timer,
            ),
            speed: SpeedController::new(&config),
            pid: Pid::from_config(&config),
        })
    }

    #[inline]
    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    #[inline]
    pub fn run_state(&self) -> RunState {
        self.run.state()
    }

    #[inline]
    pub fn estimator(&self) -> &PositionEstimator {
        &self.estimator
    }

    #[inline]
    pub fn markers(&self) -> &MarkerStateMachine {
        &self.markers
    }

    #[inline]
    pub fn speed(&self) -> &SpeedController {
        &self.speed
    }

    #[inline]
    pub fn pid(&self) -> &Pid {
        &self.pid
    }

    /// Run one control cycle against the given collaborators.
    pub fn cycle<S, M, D>(
        &mut self,
        sensors: &mut S,
        motors: &mut M,
        diag: &mut D,
    ) -> CycleOutcome
    where
        S: RawSensorSource,
        M: MotorActuator,
        D: DiagnosticsSink,
    {
        let (left, right) = sensors.read_marker_sensors();
        let events = self.markers.update(left, right);
        self.handle_events(&events, diag);

        let stop_phase = self.run.poll_stop(&mut self.speed);

        if self.run.is_stopped() {
            motors.set_power(0, 0);
            diag.record("geometry", i32::from(events.state.code()));
            diag.end_cycle();
            return CycleOutcome {
                command: MotorCommand::STOP,
                markers: events,
                stop_phase,
                error: None,
            };
        }

        let frame = sensors.read_line_sensors();
        let position = self.estimator.update(&self.profile, &frame);
        let error = position - self.config.target_position;

        self.speed.update(error, self.run.state().precision_mode);
        self.run.hold_brake(&mut self.speed);
        let speed = self.speed.current();
        let command = self.pid.update(error, speed);
        motors.set_power(command.left, command.right);

        diag.record("speed", speed);
        diag.record("error", error);
        diag.record("correction", self.pid.last_correction());
        diag.record("geometry", i32::from(events.state.code()));
        diag.end_cycle();

        CycleOutcome {
            command,
            markers: events,
            stop_phase,
            error: Some(error),
        }
    }

    fn handle_events<D: DiagnosticsSink>(&mut self, events: &MarkerEvents, diag: &mut D) {
        if events.finish_line {
            let armed = self.run.on_finish_line();
            diag.record("finish", self.run.state().finish_line_count as i32);
            if armed {
                diag.record("stop_armed", 1);
            }
        } else if events.precision_toggle {
            self.run.on_precision_toggle(&mut self.speed);
            diag.record("precision", i32::from(self.run.state().precision_mode));
        }

        if events.intersection {
            diag.record("intersection", 1);
        }
    }
}
