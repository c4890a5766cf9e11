// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Control Algorithms
//!
//! ## Modules
//!
//! - [`speed`] - Curve/straight speed policy with a bounded ramp.
//! - [`pid`] - PD steering with a filtered derivative.
//! - [`run`] - Precision mode, finish counting and the stop sequence.
//! - [`cycle`] - The per-cycle pipeline tying everything together.

pub mod cycle;
pub mod pid;
pub mod run;
pub mod speed;

pub use cycle::{ControlContext, CycleOutcome};
pub use pid::{Pid, PidState};
pub use run::{RunState, RunSupervisor, StopPhase};
pub use speed::{SpeedController, SpeedState, TrackSection};

/// Left/right motor power, each in `[-255, 255]`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MotorCommand {
    pub left: i32,
    pub right: i32,
}

impl MotorCommand {
    pub const STOP: MotorCommand = MotorCommand { left: 0, right: 0 };
}
