// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Cruise speed selection and ramping.
//!
//! The absolute line error classifies the track under the robot:
//!
//! - **curve** (`|error| > turn_threshold`): slow down to the turn speed;
//! - **straight** (`|error| < straight_threshold`): run at the mode's cruise speed, with a short
//!   boost right after leaving a curve;
//! - anything between is interpolated linearly.
//!
//! The actual speed never jumps: it moves toward the target by at most one acceleration or brake
//! step per cycle and is kept within `[turn_speed, cruise_speed]`.

use crate::config::{ControlConfig, MAX_POWER};

/// Track classification for one error sample.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TrackSection {
    Curve,
    Straight,
    Transition,
}

/// Ramp state, persisted across cycles.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SpeedState {
    pub current_speed: i32,
    pub turning: bool,
    pub exiting_turn: bool,
    pub boost_countdown: u8,
}

/// Target-speed policy plus bounded ramp.
#[derive(Clone, Debug)]
pub struct SpeedController {
    turn_speed: i32,
    fast_speed: i32,
    precision_speed: i32,
    accel_step: i32,
    brake_step: i32,
    turn_threshold: i32,
    straight_threshold: i32,
    boost_duration: u8,
    boost_increment: i32,
    state: SpeedState,
}

impl SpeedController {
    /// Create a controller starting at the fast cruise speed.
    pub fn new(config: &ControlConfig) -> Self {
        Self {
            turn_speed: config.turn_speed,
            fast_speed: config.fast_speed,
            precision_speed: config.precision_speed,
            accel_step: config.accel_step,
            brake_step: config.brake_step,
            turn_threshold: config.turn_threshold,
            straight_threshold: config.straight_threshold,
            boost_duration: config.boost_duration,
            boost_increment: config.boost_increment,
            state: SpeedState {
                current_speed: config.fast_speed,
                ..SpeedState::default()
            },
        }
    }

    #[inline]
    pub fn state(&self) -> SpeedState {
        self.state
    }

    #[inline]
    pub fn current(&self) -> i32 {
        self.state.current_speed
    }

    #[inline]
    pub fn cruise_speed(&self, precision: bool) -> i32 {
        if precision {
            self.precision_speed
        } else {
            self.fast_speed
        }
    }

    pub fn classify(&self, error: i32) -> TrackSection {
        let magnitude = error.saturating_abs();
        if magnitude > self.turn_threshold {
            TrackSection::Curve
        } else if magnitude < self.straight_threshold {
            TrackSection::Straight
        } else {
            TrackSection::Transition
        }
    }

    /// Speed target between the thresholds: cruise at `straight_threshold`, turn speed at
    /// `turn_threshold`. Integer arithmetic, truncating toward zero.
    ///
    /// With coinciding thresholds there is nothing to interpolate and the turn speed is returned.
    pub fn interpolate(&self, magnitude: i32, precision: bool) -> i32 {
        let cruise = self.cruise_speed(precision);
        let span = self.turn_threshold - self.straight_threshold;
        if span == 0 {
            return self.turn_speed;
        }
        (magnitude - self.straight_threshold) * (self.turn_speed - cruise) / span + cruise
    }

    /// Compute this cycle's target speed, updating the turn/boost flags.
    pub fn target(&mut self, error: i32, precision: bool) -> i32 {
        let cruise = self.cruise_speed(precision);

        let mut target = match self.classify(error) {
            TrackSection::Curve => {
                self.state.turning = true;
                self.state.exiting_turn = false;
                self.turn_speed
            }
            TrackSection::Straight => {
                if self.state.turning {
                    self.state.exiting_turn = true;
                    self.state.boost_countdown = self.boost_duration;
                }
                self.state.turning = false;
                cruise
            }
            TrackSection::Transition => self.interpolate(error.saturating_abs(), precision),
        };

        if self.state.exiting_turn && self.state.boost_countdown > 0 && !precision {
            target = (target + self.boost_increment).min(MAX_POWER);
            self.state.boost_countdown -= 1;
        }

        target
    }

    /// Run one cycle: pick a target, ramp toward it and clamp to the mode's band.
    pub fn update(&mut self, error: i32, precision: bool) -> i32 {
        let target = self.target(error, precision);
        let current = self.state.current_speed;

        let step = if target > current {
            self.accel_step
        } else {
            self.brake_step
        };

        let ramped = if (target - current).abs() <= step {
            target
        } else if target > current {
            current + step
        } else {
            current - step
        };

        let cruise = self.cruise_speed(precision);
        self.state.current_speed = constrain(ramped, self.turn_speed, cruise);
        self.state.current_speed
    }

    /// Restart at the base speed of a newly selected mode, dropping any turn or boost state.
    pub fn reset_for_mode(&mut self, precision: bool) {
        self.state = SpeedState {
            current_speed: self.cruise_speed(precision),
            turning: false,
            exiting_turn: false,
            boost_countdown: 0,
        };
    }

    /// Lower the current speed to `ceiling` if it is above it.
    pub fn limit(&mut self, ceiling: i32) {
        if self.state.current_speed > ceiling {
            self.state.current_speed = ceiling;
        }
    }

    pub fn stop(&mut self) {
        self.state.current_speed = 0;
    }
}

/// Bound `x` to `[lo, hi]`. The lower bound wins when the range is empty.
#[inline]
fn constrain(x: i32, lo: i32, hi: i32) -> i32 {
    if x < lo {
        lo
    } else if x > hi {
        hi
    } else {
        x
    }
}
