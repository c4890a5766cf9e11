// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Implementations of the control-core interfaces on linebot hardware.
//!
//! - [`line_sensors`] - TIM2-driven sampling of the line and marker sensors
//! - [`motor_driver`] - Dual H-bridge with TIM4 PWM
//! - [`diagnostics`] - `key=value` diagnostics stream over the USART console

pub mod diagnostics;
pub mod line_sensors;
pub mod motor_driver;

pub use diagnostics::UsartDiagnostics;
pub use line_sensors::{Sampler, SharedSensors};
pub use motor_driver::{BridgePins, MotorDriver};
