// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Linebot Control Core
//!
//! Hardware-independent control loop of the linebot line follower: six reflectance sensors in,
//! two motor powers out. Everything here is `no_std`, allocation-free and runs on the host for
//! tests; the board-specific side lives in the `linebot` firmware crate.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`config`] | Tunable constants and their validation |
//! | [`interfaces`] | Traits the firmware implements (sensors, motors, timers, diagnostics) |
//! | [`sensing`] | Calibration, line position and course markers |
//! | [`control`] | Speed policy, steering and the per-cycle pipeline |
//!
//! ## Running the tests
//!
//! ```bash
//! cargo test
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod control;
pub mod interfaces;
pub mod sensing;

/// Number of line sensors in the array.
pub const NUM_LINE_SENSORS: usize = 6;

pub use config::{ConfigError, ControlConfig};
pub use control::{ControlContext, CycleOutcome, MotorCommand};
pub use interfaces::{
    CalibrationService, DiagnosticsSink, ElapsedTimer, MotorActuator, NoDiagnostics,
    RawSensorSource,
};
