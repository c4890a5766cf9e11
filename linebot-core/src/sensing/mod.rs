// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Sensing
//!
//! Everything that turns raw reflectance readings into control inputs.
//!
//! - [`calibration`] - Per-sensor bounds and normalization.
//! - [`position`] - Weighted-centroid line position.
//! - [`markers`] - Side-marker geometry and course events.

pub mod calibration;
pub mod markers;
pub mod position;

pub use calibration::{CalibrationBuilder, CalibrationProfile, SampledCalibration, SensorBounds};
pub use markers::{MarkerEvents, MarkerHistory, MarkerPolarity, MarkerState, MarkerStateMachine};
pub use position::{PositionEstimator, PositionState};
