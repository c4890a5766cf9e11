// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Board wiring and timing.
//!
//! Pin assignments live in [`crate::hw::pins`]; this module holds the numbers that go with them.

/// ADC1 channels of the line sensors, leftmost first (PA0, PA3, PA4, PA6, PB1, PC0).
pub const LINE_CHANNELS: [u8; 6] = [0, 3, 4, 6, 9, 10];

/// ADC1 channel of the left marker sensor (PC3).
pub const MARKER_LEFT_CHANNEL: u8 = 13;
/// ADC1 channel of the right marker sensor (PC2).
pub const MARKER_RIGHT_CHANNEL: u8 = 12;

/// Sensor sampling interrupt rate.
pub const SAMPLE_RATE_HZ: u32 = 1_000;

/// Control loop period.
pub const CONTROL_PERIOD_MS: u32 = 1;

/// Motor PWM carrier frequency.
pub const PWM_FREQUENCY_HZ: u32 = 20_000;

/// Pause before and after parking the motors at power-up.
pub const SETUP_DELAY_MS: u32 = 600;

/// Start button debounce time.
pub const DEBOUNCE_MS: u32 = 50;

/// Calibration: number of frames and spacing between them.
pub const CALIBRATION_SAMPLES: u16 = 400;
pub const CALIBRATION_INTERVAL_MS: u32 = 30;

/// Debug console baud rate.
pub const CONSOLE_BAUD: u32 = 115_200;

/// Emit one diagnostics line every this many cycles.
pub const DIAGNOSTICS_EVERY: u16 = 50;
