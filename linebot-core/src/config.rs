// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Tunable constants for the control loop.
//!
//! All knobs live in one [`ControlConfig`] so a run can be reproduced from a single value. The
//! defaults are the tuning used on the competition track; tweak them with the `with_*` builders:
//!
//! ```
//! use linebot_core::config::ControlConfig;
//!
//! let config = ControlConfig::default()
//!     .with_gains(6.0, 400.0, 0.7)
//!     .with_finish_target(3);
//! assert!(config.validate().is_ok());
//! ```

use core::fmt;

use crate::sensing::markers::MarkerPolarity;
use crate::NUM_LINE_SENSORS;

/// Highest PWM magnitude the motor driver accepts.
pub const MAX_POWER: i32 = 255;

/// Complete control-loop configuration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ControlConfig {
    // ----- Position estimator -----
    /// Normalized-sum threshold above which the robot is considered on the line.
    pub line_threshold: i32,
    /// Per-sensor centroid weights, leftmost sensor first.
    pub sensor_weights: [f32; NUM_LINE_SENSORS],
    /// Desired line position; the error is `position - target_position`.
    pub target_position: i32,

    // ----- Markers -----
    /// Raw reading compared against each marker sensor.
    pub marker_threshold: i32,
    pub marker_polarity: MarkerPolarity,

    // ----- Speeds -----
    /// Target speed in curves, also the lower clamp of the ramped speed.
    pub turn_speed: i32,
    /// Ceiling applied while the stop sequence decelerates.
    pub brake_speed: i32,
    /// Cruise speed in normal mode.
    pub fast_speed: i32,
    /// Cruise speed in precision mode.
    pub precision_speed: i32,

    // ----- Ramping and classification -----
    pub accel_step: i32,
    pub brake_step: i32,
    /// `|error|` above this is a curve.
    pub turn_threshold: i32,
    /// `|error|` below this is a straight.
    pub straight_threshold: i32,
    /// Cycles of boost after leaving a curve.
    pub boost_duration: u8,
    pub boost_increment: i32,

    // ----- Correction -----
    pub kp: f32,
    pub kd: f32,
    /// Smoothing factor of the filtered error rate, in [0, 1].
    pub alpha: f32,
    /// Above this speed the correction is scaled by `high_speed_gain`.
    pub high_speed_threshold: i32,
    pub high_speed_gain: f32,

    // ----- Finish / stop sequence -----
    /// Finish-line crossings that arm the stop sequence.
    pub finish_target: u32,
    /// Window during which the speed is held at `brake_speed`.
    pub decel_ms: u32,
    /// Delay from arming until the robot is stopped.
    pub stop_delay_ms: u32,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            line_threshold: 120,
            sensor_weights: [-2.5, -1.2, -0.6, 0.6, 1.2, 2.5],
            target_position: 0,

            marker_threshold: 180,
            marker_polarity: MarkerPolarity::ActiveLow,

            turn_speed: 120,
            brake_speed: 120,
            fast_speed: 180,
            precision_speed: 160,

            accel_step: 25,
            brake_step: 60,
            turn_threshold: 45,
            straight_threshold: 20,
            boost_duration: 10,
            boost_increment: 30,

            kp: 5.0,
            kd: 600.0,
            alpha: 0.6,
            high_speed_threshold: 200,
            high_speed_gain: 0.85,

            finish_target: 2,
            decel_ms: 50,
            stop_delay_ms: 300,
        }
    }
}

impl ControlConfig {
    /// Set the correction gains and derivative smoothing factor.
    pub fn with_gains(mut self, kp: f32, kd: f32, alpha: f32) -> Self {
        self.kp = kp;
        self.kd = kd;
        self.alpha = alpha;
        self
    }

    /// Set turn, brake, fast-cruise and precision-cruise speeds.
    pub fn with_speeds(mut self, turn: i32, brake: i32, fast: i32, precision: i32) -> Self {
        self.turn_speed = turn;
        self.brake_speed = brake;
        self.fast_speed = fast;
        self.precision_speed = precision;
        self
    }

    /// Set the acceleration and braking ramp steps.
    pub fn with_ramp(mut self, accel_step: i32, brake_step: i32) -> Self {
        self.accel_step = accel_step;
        self.brake_step = brake_step;
        self
    }

    /// Set the straight/curve classification thresholds.
    pub fn with_thresholds(mut self, straight: i32, turn: i32) -> Self {
        self.straight_threshold = straight;
        self.turn_threshold = turn;
        self
    }

    /// Set the post-curve boost length (cycles) and increment.
    pub fn with_boost(mut self, duration: u8, increment: i32) -> Self {
        self.boost_duration = duration;
        self.boost_increment = increment;
        self
    }

    pub fn with_markers(mut self, threshold: i32, polarity: MarkerPolarity) -> Self {
        self.marker_threshold = threshold;
        self.marker_polarity = polarity;
        self
    }

    pub fn with_finish_target(mut self, crossings: u32) -> Self {
        self.finish_target = crossings;
        self
    }

    /// Set the deceleration window and the full-stop delay (ms).
    pub fn with_stop_timing(mut self, decel_ms: u32, stop_delay_ms: u32) -> Self {
        self.decel_ms = decel_ms;
        self.stop_delay_ms = stop_delay_ms;
        self
    }

    /// Cruise speed for the given mode.
    #[inline]
    pub fn cruise_speed(&self, precision: bool) -> i32 {
        if precision {
            self.precision_speed
        } else {
            self.fast_speed
        }
    }

    /// Check that every control operation is total under this configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let speeds = [
            self.turn_speed,
            self.brake_speed,
            self.fast_speed,
            self.precision_speed,
        ];
        if speeds.iter().any(|s| !(0..=MAX_POWER).contains(s)) {
            return Err(ConfigError::SpeedOutOfRange);
        }
        if self.turn_speed > self.fast_speed || self.turn_speed > self.precision_speed {
            return Err(ConfigError::TurnAboveCruise);
        }
        if self.accel_step <= 0 || self.brake_step <= 0 {
            return Err(ConfigError::NonPositiveStep);
        }
        if self.straight_threshold >= self.turn_threshold {
            return Err(ConfigError::ThresholdOrder);
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(ConfigError::AlphaOutOfRange);
        }
        if self.finish_target == 0 {
            return Err(ConfigError::ZeroFinishTarget);
        }
        Ok(())
    }
}

/// Reasons a [`ControlConfig`] is rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A speed lies outside `0..=255`.
    SpeedOutOfRange,
    /// Turn speed exceeds a cruise speed, leaving the speed clamp empty.
    TurnAboveCruise,
    /// An acceleration or brake step is zero or negative.
    NonPositiveStep,
    /// The straight threshold is not below the turn threshold.
    ThresholdOrder,
    /// The smoothing factor is outside `[0, 1]`.
    AlphaOutOfRange,
    /// The stop sequence could never be armed.
    ZeroFinishTarget,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ConfigError::SpeedOutOfRange => "speed outside 0..=255",
            ConfigError::TurnAboveCruise => "turn speed above cruise speed",
            ConfigError::NonPositiveStep => "ramp step must be positive",
            ConfigError::ThresholdOrder => "straight threshold must be below turn threshold",
            ConfigError::AlphaOutOfRange => "filter coefficient outside [0, 1]",
            ConfigError::ZeroFinishTarget => "finish target must be at least 1",
        };
        f.write_str(msg)
    }
}
