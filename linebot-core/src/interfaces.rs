// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Seams between the control core and the board.
//!
//! The firmware implements these over real peripherals; tests implement them with scripted data.

use crate::sensing::calibration::CalibrationProfile;
use crate::NUM_LINE_SENSORS;

/// Latest raw samples from the reflectance sensors.
pub trait RawSensorSource {
    /// One consistent frame of the six line sensors, leftmost first.
    ///
    /// All six values must come from the same sampling pass.
    fn read_line_sensors(&mut self) -> [u16; NUM_LINE_SENSORS];

    /// `(left, right)` marker sensor readings.
    fn read_marker_sensors(&mut self) -> (u16, u16);
}

/// Produces the per-sensor bounds used to normalize readings. Run once before the control loop.
pub trait CalibrationService {
    fn calibrate(&mut self) -> CalibrationProfile;
}

/// Differential drive output.
pub trait MotorActuator {
    /// Drive both motors. Each power is in `[-255, 255]`; the sign selects direction.
    ///
    /// Called every cycle, so implementations must tolerate repeated identical commands.
    fn set_power(&mut self, left: i32, right: i32);
}

/// Non-blocking one-shot timer polled once per cycle.
pub trait ElapsedTimer {
    /// (Re)start the timer for `duration_ms` milliseconds from now.
    fn start(&mut self, duration_ms: u32);

    /// True once the started duration has passed.
    fn expired(&self) -> bool;
}

/// Optional sink for per-cycle scalar diagnostics.
pub trait DiagnosticsSink {
    fn record(&mut self, key: &'static str, value: i32);

    /// Called after the last record of a cycle.
    fn end_cycle(&mut self) {}
}

/// Diagnostics sink that drops everything.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoDiagnostics;

impl DiagnosticsSink for NoDiagnostics {
    #[inline]
    fn record(&mut self, _key: &'static str, _value: i32) {}
}

impl<D: DiagnosticsSink + ?Sized> DiagnosticsSink for &mut D {
    fn record(&mut self, key: &'static str, value: i32) {
        (**self).record(key, value);
    }

    fn end_cycle(&mut self) {
        (**self).end_cycle();
    }
}
