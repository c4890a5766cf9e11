// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Run-level state driven by course markers: precision mode, finish counting and the
//! decelerate-then-stop sequence that ends a run.

use crate::control::speed::SpeedController;
use crate::interfaces::ElapsedTimer;

/// Progress of the current run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RunState {
    pub finish_line_count: u32,
    /// Completed laps; the first finish crossing only starts lap one.
    pub lap_count: u32,
    pub precision_mode: bool,
    pub stop_sequence_active: bool,
    /// Terminal. Only a restart clears it.
    pub robot_stopped: bool,
}

/// What the stop sequence did this cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StopPhase {
    /// Sequence not armed, or already finished on an earlier cycle.
    Inactive,
    /// Armed, speed held at or below the brake speed.
    Decelerating,
    /// Armed, waiting for the stop timer.
    Waiting,
    /// The stop timer expired this cycle; the robot is now stopped.
    Stopped,
}

/// Owns [`RunState`] and the two stop-sequence timers.
pub struct RunSupervisor<T> {
    state: RunState,
    finish_target: u32,
    brake_speed: i32,
    decel_ms: u32,
    stop_delay_ms: u32,
    decel_timer: T,
    stop_timer: T,
}

impl<T: ElapsedTimer> RunSupervisor<T> {
    pub fn new(
        finish_target: u32,
        brake_speed: i32,
        decel_ms: u32,
        stop_delay_ms: u32,
        decel_timer: T,
        stop_timer: T,
    ) -> Self {
        Self {
            state: RunState::default(),
            finish_target,
            brake_speed,
            decel_ms,
            stop_delay_ms,
            decel_timer,
            stop_timer,
        }
    }

    #[inline]
    pub fn state(&self) -> RunState {
        self.state
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.state.robot_stopped
    }

    /// Count a finish-line crossing. Returns true if this crossing armed the stop sequence.
    pub fn on_finish_line(&mut self) -> bool {
        self.state.finish_line_count += 1;
        self.state.lap_count = self.state.finish_line_count - 1;

        if self.state.finish_line_count == self.finish_target && !self.state.stop_sequence_active
        {
            self.state.stop_sequence_active = true;
            self.decel_timer.start(self.decel_ms);
            self.stop_timer.start(self.stop_delay_ms);
            return true;
        }
        false
    }

    /// Flip precision mode and restart the speed ramp at the new mode's base speed.
    pub fn on_precision_toggle(&mut self, speed: &mut SpeedController) {
        self.state.precision_mode = !self.state.precision_mode;
        speed.reset_for_mode(self.state.precision_mode);
    }

    /// Keep the speed at or below the brake speed while the stop sequence is armed.
    ///
    /// Call after the speed ramp so the ramp cannot climb back above the brake speed before the
    /// robot stops.
    pub fn hold_brake(&self, speed: &mut SpeedController) {
        if self.state.stop_sequence_active && !self.state.robot_stopped {
            speed.limit(self.brake_speed);
        }
    }

    /// Advance the stop sequence. Call once per cycle after marker handling.
    pub fn poll_stop(&mut self, speed: &mut SpeedController) -> StopPhase {
        if !self.state.stop_sequence_active || self.state.robot_stopped {
            return StopPhase::Inactive;
        }

        if !self.decel_timer.expired() && speed.current() > self.brake_speed {
            speed.limit(self.brake_speed);
            StopPhase::Decelerating
        } else if self.stop_timer.expired() {
            speed.stop();
            self.state.robot_stopped = true;
            StopPhase::Stopped
        } else {
            StopPhase::Waiting
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ControlConfig;
    use core::cell::Cell;
    use std::rc::Rc;

    /// Timer whose expiry is flipped by the test.
    #[derive(Clone, Default)]
    struct Manual {
        expired: Rc<Cell<bool>>,
        started: Rc<Cell<u32>>,
        duration: Rc<Cell<u32>>,
    }

    impl ElapsedTimer for Manual {
        fn start(&mut self, duration_ms: u32) {
            self.started.set(self.started.get() + 1);
            self.duration.set(duration_ms);
            self.expired.set(false);
        }

        fn expired(&self) -> bool {
            self.expired.get()
        }
    }

    fn supervisor() -> (RunSupervisor<Manual>, Manual, Manual) {
        let decel = Manual::default();
        let stop = Manual::default();
        let sup = RunSupervisor::new(2, 120, 50, 300, decel.clone(), stop.clone());
        (sup, decel, stop)
    }

    #[test]
    fn second_finish_arms_once() {
        let (mut sup, decel, stop) = supervisor();

        assert!(!sup.on_finish_line());
        assert!(!sup.state().stop_sequence_active);
        assert_eq!(sup.state().lap_count, 0);

        assert!(sup.on_finish_line());
        assert!(sup.state().stop_sequence_active);
        assert_eq!(sup.state().lap_count, 1);
        assert_eq!(decel.duration.get(), 50);
        assert_eq!(stop.duration.get(), 300);

        assert!(!sup.on_finish_line());
        assert_eq!(sup.state().finish_line_count, 3);
        assert_eq!(decel.started.get(), 1);
        assert_eq!(stop.started.get(), 1);
    }

    #[test]
    fn precision_toggle_flips_and_resets_speed() {
        let (mut sup, _, _) = supervisor();
        let mut speed = SpeedController::new(&ControlConfig::default());
        speed.update(80, false);
        speed.update(0, false);

        sup.on_precision_toggle(&mut speed);
        assert!(sup.state().precision_mode);
        assert_eq!(speed.current(), 160);
        assert_eq!(speed.state().boost_countdown, 0);

        sup.on_precision_toggle(&mut speed);
        assert!(!sup.state().precision_mode);
        assert_eq!(speed.current(), 180);
    }

    #[test]
    fn stop_sequence_brakes_then_stops() {
        let (mut sup, decel, stop) = supervisor();
        let mut speed = SpeedController::new(&ControlConfig::default());

        assert_eq!(sup.poll_stop(&mut speed), StopPhase::Inactive);

        sup.on_finish_line();
        sup.on_finish_line();

        assert_eq!(sup.poll_stop(&mut speed), StopPhase::Decelerating);
        assert_eq!(speed.current(), 120);
        assert_eq!(sup.poll_stop(&mut speed), StopPhase::Waiting);

        decel.expired.set(true);
        assert_eq!(sup.poll_stop(&mut speed), StopPhase::Waiting);

        stop.expired.set(true);
        assert_eq!(sup.poll_stop(&mut speed), StopPhase::Stopped);
        assert_eq!(speed.current(), 0);
        assert!(sup.is_stopped());

        assert_eq!(sup.poll_stop(&mut speed), StopPhase::Inactive);
        assert!(sup.is_stopped());
    }

    #[test]
    fn brake_ceiling_holds_until_stopped() {
        let (mut sup, decel, stop) = supervisor();
        let mut speed = SpeedController::new(&ControlConfig::default());

        sup.hold_brake(&mut speed);
        assert_eq!(speed.current(), 180);

        sup.on_finish_line();
        sup.on_finish_line();
        sup.poll_stop(&mut speed);
        decel.expired.set(true);

        for _ in 0..10 {
            assert_eq!(sup.poll_stop(&mut speed), StopPhase::Waiting);
            speed.update(0, false);
            sup.hold_brake(&mut speed);
            assert_eq!(speed.current(), 120);
        }

        stop.expired.set(true);
        sup.poll_stop(&mut speed);
        sup.hold_brake(&mut speed);
        assert_eq!(speed.current(), 0);
    }

    #[test]
    fn braking_takes_priority_over_stop_timer() {
        let (mut sup, _, stop) = supervisor();
        let mut speed = SpeedController::new(&ControlConfig::default());
        sup.on_finish_line();
        sup.on_finish_line();

        stop.expired.set(true);
        assert_eq!(sup.poll_stop(&mut speed), StopPhase::Decelerating);
        assert!(!sup.is_stopped());
        assert_eq!(sup.poll_stop(&mut speed), StopPhase::Stopped);
    }
}
