// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Sensor calibration.
//!
//! Each line sensor has its own dark/bright range. Calibration sweeps the array over the track and
//! records the extremes; the frozen [`CalibrationProfile`] then maps raw readings onto a common
//! `[0, 100]` scale where 100 means "line under this sensor".

use crate::interfaces::{
    CalibrationService, DiagnosticsSink, ElapsedTimer, NoDiagnostics, RawSensorSource,
};
use crate::NUM_LINE_SENSORS;

/// Normalized value for a reading at the sensor's calibrated minimum.
pub const NORMALIZED_MAX: i32 = 100;

/// Observed range of one sensor.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SensorBounds {
    pub min: u16,
    pub max: u16,
}

impl SensorBounds {
    /// Clamp `raw` into the bounds and rescale inverted onto `[100, 0]`.
    ///
    /// A sensor that never varied (`min == max`) carries no information and reads 0.
    pub fn normalize(&self, raw: u16) -> i32 {
        if self.max <= self.min {
            return 0;
        }
        let x = i32::from(raw.clamp(self.min, self.max));
        let (lo, hi) = (i32::from(self.min), i32::from(self.max));
        (x - lo) * -NORMALIZED_MAX / (hi - lo) + NORMALIZED_MAX
    }
}

/// Per-sensor bounds, frozen once calibration completes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CalibrationProfile {
    bounds: [SensorBounds; NUM_LINE_SENSORS],
}

impl CalibrationProfile {
    pub fn new(bounds: [SensorBounds; NUM_LINE_SENSORS]) -> Self {
        Self { bounds }
    }

    /// Same bounds for every sensor.
    pub fn uniform(min: u16, max: u16) -> Self {
        Self {
            bounds: [SensorBounds { min, max }; NUM_LINE_SENSORS],
        }
    }

    #[inline]
    pub fn bounds(&self) -> &[SensorBounds; NUM_LINE_SENSORS] {
        &self.bounds
    }

    /// Normalize a raw frame sensor by sensor.
    pub fn normalize(&self, raw: &[u16; NUM_LINE_SENSORS]) -> [i32; NUM_LINE_SENSORS] {
        let mut out = [0; NUM_LINE_SENSORS];
        for ((o, b), &r) in out.iter_mut().zip(self.bounds.iter()).zip(raw.iter()) {
            *o = b.normalize(r);
        }
        out
    }
}

/// Accumulates min/max bounds over raw frames.
#[derive(Clone, Debug)]
pub struct CalibrationBuilder {
    min: [u16; NUM_LINE_SENSORS],
    max: [u16; NUM_LINE_SENSORS],
    samples: u32,
}

impl Default for CalibrationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CalibrationBuilder {
    pub fn new() -> Self {
        Self {
            min: [u16::MAX; NUM_LINE_SENSORS],
            max: [0; NUM_LINE_SENSORS],
            samples: 0,
        }
    }

    /// Widen the bounds to include `frame`.
    pub fn observe(&mut self, frame: &[u16; NUM_LINE_SENSORS]) {
        for (i, &v) in frame.iter().enumerate() {
            self.min[i] = self.min[i].min(v);
            self.max[i] = self.max[i].max(v);
        }
        self.samples += 1;
    }

    #[inline]
    pub fn samples(&self) -> u32 {
        self.samples
    }

    /// Bounds seen so far for sensor `i`, if any frame was observed.
    pub fn bounds(&self, i: usize) -> Option<SensorBounds> {
        (self.samples > 0).then(|| SensorBounds {
            min: self.min[i],
            max: self.max[i],
        })
    }

    /// Freeze the profile. With no samples every sensor ends up `{0, 0}`.
    pub fn finish(&self) -> CalibrationProfile {
        let mut bounds = [SensorBounds { min: 0, max: 0 }; NUM_LINE_SENSORS];
        for (i, b) in bounds.iter_mut().enumerate() {
            if let Some(seen) = self.bounds(i) {
                *b = seen;
            }
        }
        CalibrationProfile { bounds }
    }
}

const MIN_KEYS: [&str; NUM_LINE_SENSORS] = ["min0", "min1", "min2", "min3", "min4", "min5"];
const MAX_KEYS: [&str; NUM_LINE_SENSORS] = ["max0", "max1", "max2", "max3", "max4", "max5"];

/// Calibration by periodic sampling: `samples` frames, one every `interval_ms`.
///
/// Blocks until every sample has been taken; total duration is roughly
/// `samples * interval_ms`.
pub struct SampledCalibration<S, T, D = NoDiagnostics> {
    source: S,
    timer: T,
    diagnostics: D,
    samples: u16,
    interval_ms: u32,
}

impl<S, T> SampledCalibration<S, T, NoDiagnostics>
where
    S: RawSensorSource,
    T: ElapsedTimer,
{
    pub fn new(source: S, timer: T, samples: u16, interval_ms: u32) -> Self {
        Self {
            source,
            timer,
            diagnostics: NoDiagnostics,
            samples,
            interval_ms,
        }
    }
}

impl<S, T, D> SampledCalibration<S, T, D>
where
    S: RawSensorSource,
    T: ElapsedTimer,
    D: DiagnosticsSink,
{
    /// Report the running bounds after every sample.
    pub fn with_diagnostics<D2: DiagnosticsSink>(
        self,
        diagnostics: D2,
    ) -> SampledCalibration<S, T, D2> {
        SampledCalibration {
            source: self.source,
            timer: self.timer,
            diagnostics,
            samples: self.samples,
            interval_ms: self.interval_ms,
        }
    }

    fn report(&mut self, builder: &CalibrationBuilder) {
        for i in 0..NUM_LINE_SENSORS {
            if let Some(b) = builder.bounds(i) {
                self.diagnostics.record(MIN_KEYS[i], i32::from(b.min));
                self.diagnostics.record(MAX_KEYS[i], i32::from(b.max));
            }
        }
        self.diagnostics.end_cycle();
    }
}

impl<S, T, D> CalibrationService for SampledCalibration<S, T, D>
where
    S: RawSensorSource,
    T: ElapsedTimer,
    D: DiagnosticsSink,
{
    fn calibrate(&mut self) -> CalibrationProfile {
        let mut builder = CalibrationBuilder::new();
        let mut taken = 0;

        self.timer.start(self.interval_ms);
        while taken < self.samples {
            if self.timer.expired() {
                let frame = self.source.read_line_sensors();
                builder.observe(&frame);
                self.report(&builder);

                taken += 1;
                self.timer.start(self.interval_ms);
            }
        }

        builder.finish()
    }
}
