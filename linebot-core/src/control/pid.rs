// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! PD steering controller with a filtered derivative.
//!
//! Works in `no_std` and does not allocate memory.

use crate::config::{ControlConfig, MAX_POWER};
use crate::control::MotorCommand;

/// Derivative history, persisted across cycles.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PidState {
    /// Raw error of the previous cycle.
    pub previous_error: i32,
    /// Exponentially smoothed error rate.
    pub filtered_error_rate: i32,
}

/// Steering controller turning a line error into a left/right power split.
pub struct Pid {
    /// Proportional gain
    kp: f32,
    /// Derivative gain
    kd: f32,
    /// Derivative smoothing factor, weight of the newest sample
    alpha: f32,

    /// Correction is scaled by `high_speed_gain` above this speed
    high_speed_threshold: i32,
    high_speed_gain: f32,

    state: PidState,
    last_correction: i32,
}

impl Pid {
    /// Create a new controller.
    ///
    /// `kp`, `kd` are the gain constants. The derivative filter defaults to `alpha = 0.6`.
    pub fn new(kp: f32, kd: f32) -> Self {
        Self {
            kp,
            kd,
            alpha: 0.6,

            high_speed_threshold: 200,
            high_speed_gain: 0.85,

            state: PidState::default(),
            last_correction: 0,
        }
    }

    /// Build from the control configuration.
    pub fn from_config(config: &ControlConfig) -> Self {
        Self::new(config.kp, config.kd)
            .with_filter(config.alpha)
            .with_speed_damping(config.high_speed_threshold, config.high_speed_gain)
    }

    /// Set the derivative smoothing factor.
    pub fn with_filter(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    /// Scale the correction by `gain` while the speed is above `threshold`.
    pub fn with_speed_damping(mut self, threshold: i32, gain: f32) -> Self {
        self.high_speed_threshold = threshold;
        self.high_speed_gain = gain;
        self
    }

    /// Reset derivative history.
    pub fn reset(&mut self) {
        self.state = PidState::default();
        self.last_correction = 0;
    }

    #[inline]
    pub fn state(&self) -> PidState {
        self.state
    }

    /// Correction applied on the most recent update.
    #[inline]
    pub fn last_correction(&self) -> i32 {
        self.last_correction
    }

    /// Update the controller.
    ///
    /// `error`: line position minus setpoint
    /// `speed`: base power both motors would get on a centered line
    ///
    /// Returns independent left/right powers, each within `[-255, 255]`.
    pub fn update(&mut self, error: i32, speed: i32) -> MotorCommand {
        // ----- D term, smoothed -----
        let d_error = error - self.state.previous_error;
        self.state.filtered_error_rate = (self.alpha * d_error as f32
            + (1.0 - self.alpha) * self.state.filtered_error_rate as f32)
            as i32;

        // ----- P + D -----
        let p = self.kp * error as f32;
        let d = self.kd * self.state.filtered_error_rate as f32;

        // ----- High-speed damping -----
        let gain = if speed > self.high_speed_threshold {
            self.high_speed_gain
        } else {
            1.0
        };

        // ----- Output clamp -----
        let correction = (((p + d) * gain) as i32).clamp(-MAX_POWER, MAX_POWER);
        self.last_correction = correction;
        self.state.previous_error = error;

        MotorCommand {
            left: (speed + correction).clamp(-MAX_POWER, MAX_POWER),
            right: (speed - correction).clamp(-MAX_POWER, MAX_POWER),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_line_drives_straight() {
        let mut pid = Pid::from_config(&ControlConfig::default());
        let cmd = pid.update(0, 150);
        assert_eq!(cmd, MotorCommand { left: 150, right: 150 });
        assert_eq!(pid.last_correction(), 0);
    }

    #[test]
    fn proportional_and_filtered_derivative() {
        let mut pid = Pid::new(2.0, 10.0).with_filter(0.5);

        // d = 10, filtered = 5, correction = 20 + 50
        let cmd = pid.update(10, 180);
        assert_eq!(pid.state().filtered_error_rate, 5);
        assert_eq!(cmd, MotorCommand { left: 250, right: 110 });

        // d = 0, filtered = 2.5 -> 2, correction = 20 + 20
        let cmd = pid.update(10, 180);
        assert_eq!(pid.state().filtered_error_rate, 2);
        assert_eq!(pid.last_correction(), 40);
        assert_eq!(cmd, MotorCommand { left: 220, right: 140 });
        assert_eq!(pid.state().previous_error, 10);
    }

    #[test]
    fn filtered_rate_truncates_toward_zero() {
        let mut pid = Pid::new(0.0, 0.0).with_filter(0.5);
        pid.update(-5, 100);
        // 0.5 * -5 = -2.5 -> -2
        assert_eq!(pid.state().filtered_error_rate, -2);
    }

    #[test]
    fn high_speed_damps_correction() {
        let mut pid = Pid::new(2.0, 10.0).with_filter(0.5);
        // 70 * 0.85 = 59.5 -> 59
        let cmd = pid.update(10, 210);
        assert_eq!(pid.last_correction(), 59);
        assert_eq!(cmd, MotorCommand { left: 255, right: 151 });
    }

    #[test]
    fn outputs_are_clamped() {
        let mut pid = Pid::from_config(&ControlConfig::default());
        let cmd = pid.update(100, 180);
        assert_eq!(pid.last_correction(), 255);
        assert_eq!(cmd, MotorCommand { left: 255, right: -75 });

        pid.reset();
        let cmd = pid.update(-100, 180);
        assert_eq!(pid.last_correction(), -255);
        assert_eq!(cmd, MotorCommand { left: -75, right: 255 });
    }

    #[test]
    fn powers_stay_within_motor_range() {
        let mut pid = Pid::new(50.0, 0.0);
        let cmd = pid.update(100, 255);
        assert_eq!(pid.last_correction(), 255);
        assert_eq!(cmd, MotorCommand { left: 255, right: 0 });

        let cmd = pid.update(-100, 255);
        assert_eq!(cmd, MotorCommand { left: 0, right: 255 });
    }

    #[test]
    fn reset_clears_history() {
        let mut pid = Pid::from_config(&ControlConfig::default());
        pid.update(40, 150);
        pid.reset();
        assert_eq!(pid.state(), PidState::default());
    }
}
