// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Line position estimator.
//!
//! Turns one calibrated frame into a signed lateral position in `[-100, 100]` (negative = line to
//! the left) using a weighted centroid. When the line is lost the estimate saturates toward the
//! side it was last seen on.

use crate::sensing::calibration::CalibrationProfile;
use crate::NUM_LINE_SENSORS;

/// Largest position magnitude.
pub const POSITION_LIMIT: i32 = 100;

/// Estimator output, persisted across cycles.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PositionState {
    pub current_position: i32,
    pub last_valid_position: i32,
    pub on_line: bool,
}

/// Weighted-centroid position estimator.
#[derive(Clone, Debug)]
pub struct PositionEstimator {
    weights: [f32; NUM_LINE_SENSORS],
    line_threshold: i32,
    state: PositionState,
}

impl PositionEstimator {
    pub fn new(weights: [f32; NUM_LINE_SENSORS], line_threshold: i32) -> Self {
        Self {
            weights,
            line_threshold,
            state: PositionState::default(),
        }
    }

    #[inline]
    pub fn state(&self) -> PositionState {
        self.state
    }

    /// Estimate the line position from a raw frame.
    pub fn update(&mut self, profile: &CalibrationProfile, raw: &[u16; NUM_LINE_SENSORS]) -> i32 {
        let normalized = profile.normalize(raw);
        self.update_normalized(&normalized)
    }

    /// Estimate the line position from an already normalized frame.
    pub fn update_normalized(&mut self, normalized: &[i32; NUM_LINE_SENSORS]) -> i32 {
        let sum: i32 = normalized.iter().sum();
        let on_line = sum > self.line_threshold;

        let position = if on_line {
            if sum != 0 {
                self.centroid(normalized, sum)
            } else {
                self.state.last_valid_position
            }
        } else if self.state.last_valid_position < 0 {
            -POSITION_LIMIT
        } else {
            POSITION_LIMIT
        };

        self.state = PositionState {
            current_position: position,
            last_valid_position: position,
            on_line,
        };
        position
    }

    fn centroid(&self, normalized: &[i32; NUM_LINE_SENSORS], sum: i32) -> i32 {
        let weighted: f32 = self
            .weights
            .iter()
            .zip(normalized.iter())
            .map(|(w, &v)| w * v as f32)
            .sum();

        let limit = POSITION_LIMIT as f32;
        (limit * weighted / sum as f32).clamp(-limit, limit) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ControlConfig;

    fn estimator() -> PositionEstimator {
        let config = ControlConfig::default();
        PositionEstimator::new(config.sensor_weights, config.line_threshold)
    }

    #[test]
    fn uniform_frame_is_centered() {
        let profile = CalibrationProfile::uniform(0, 1000);
        let mut est = estimator();

        assert_eq!(est.update(&profile, &[500; 6]), 0);
        assert!(est.state().on_line);
    }

    #[test]
    fn line_under_left_edge_is_negative() {
        let mut est = estimator();
        // sum = 130, weighted = -2.5*100 - 1.2*30 = -286 -> 100 * -286 / 130 = -220 -> clamped
        assert_eq!(est.update_normalized(&[100, 30, 0, 0, 0, 0]), -100);

        // weighted = -0.6*100 + 0.6*50 = -30 -> 100 * -30 / 150 = -20
        assert_eq!(est.update_normalized(&[0, 0, 100, 50, 0, 0]), -20);
    }

    #[test]
    fn centroid_truncates_toward_zero() {
        let mut est = estimator();
        // weighted = 0.6*100 + 1.2*30 = 96 -> 100 * 96 / 130 = 73.8
        assert_eq!(est.update_normalized(&[0, 0, 0, 100, 30, 0]), 73);
        // mirrored
        assert_eq!(est.update_normalized(&[0, 30, 100, 0, 0, 0]), -73);
    }

    #[test]
    fn lost_line_saturates_to_last_side() {
        let mut est = estimator();

        est.update_normalized(&[0, 0, 100, 50, 0, 0]);
        assert_eq!(est.update_normalized(&[0; 6]), -100);
        assert!(!est.state().on_line);
        assert_eq!(est.update_normalized(&[10, 10, 10, 10, 10, 10]), -100);

        est.update_normalized(&[0, 0, 0, 100, 30, 0]);
        assert_eq!(est.update_normalized(&[0; 6]), 100);
    }

    #[test]
    fn lost_line_from_center_exits_right() {
        let mut est = estimator();
        assert_eq!(est.update_normalized(&[0; 6]), 100);
    }

    #[test]
    fn sum_at_threshold_is_off_line() {
        let mut est = estimator();
        assert_eq!(est.update_normalized(&[0, 0, 60, 60, 0, 0]), 100);
        assert!(!est.state().on_line);
        assert_eq!(est.update_normalized(&[0, 0, 61, 60, 0, 0]), 0);
        assert!(est.state().on_line);
    }

    #[test]
    fn zero_sum_on_line_reuses_last_position() {
        // A negative threshold makes the degenerate branch reachable.
        let mut est = PositionEstimator::new([-1.0, -0.5, -0.2, 0.2, 0.5, 1.0], -1);
        est.update_normalized(&[0, 0, 0, 100, 30, 0]);
        let last = est.state().last_valid_position;

        assert_eq!(est.update_normalized(&[0; 6]), last);
        assert!(est.state().on_line);
    }

    #[test]
    fn repeated_frame_is_stable() {
        let profile = CalibrationProfile::uniform(100, 900);
        let mut est = estimator();
        let frame = [880, 700, 200, 150, 600, 890];

        let first = est.update(&profile, &frame);
        for _ in 0..10 {
            assert_eq!(est.update(&profile, &frame), first);
            assert!(est.state().on_line);
        }
    }

    #[test]
    fn output_stays_in_range() {
        let profile = CalibrationProfile::uniform(0, 1023);
        let mut est = estimator();

        let mut seed: u32 = 0x1234_5678;
        for _ in 0..500 {
            let mut frame = [0u16; 6];
            for v in frame.iter_mut() {
                seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                *v = (seed >> 16) as u16 % 1200;
            }
            let p = est.update(&profile, &frame);
            assert!((-100..=100).contains(&p));
        }
    }
}
