// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Scripted stand-ins for the board collaborators.

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use linebot_core::{DiagnosticsSink, ElapsedTimer, MotorActuator, RawSensorSource};

/// Raw reading the marker sensors return over tape.
pub const TAPE: u16 = 50;
/// Raw reading the marker sensors return over bare track.
pub const BARE: u16 = 900;

/// Sensor source returning whatever the test last set.
pub struct ScriptedSensors {
    pub line: [u16; 6],
    pub markers: (u16, u16),
    pub line_reads: usize,
}

impl ScriptedSensors {
    pub fn centered() -> Self {
        Self {
            line: [500; 6],
            markers: (BARE, BARE),
            line_reads: 0,
        }
    }

    pub fn markers(&mut self, left: bool, right: bool) {
        let level = |hit| if hit { TAPE } else { BARE };
        self.markers = (level(left), level(right));
    }
}

impl RawSensorSource for ScriptedSensors {
    fn read_line_sensors(&mut self) -> [u16; 6] {
        self.line_reads += 1;
        self.line
    }

    fn read_marker_sensors(&mut self) -> (u16, u16) {
        self.markers
    }
}

/// Timer whose expiry the test flips by hand. Clones share state.
#[derive(Clone, Default)]
pub struct ManualTimer {
    expired: Rc<Cell<bool>>,
    starts: Rc<Cell<u32>>,
    last_duration: Rc<Cell<u32>>,
}

impl ManualTimer {
    pub fn expire(&self) {
        self.expired.set(true);
    }

    pub fn starts(&self) -> u32 {
        self.starts.get()
    }

    pub fn last_duration(&self) -> u32 {
        self.last_duration.get()
    }
}

impl ElapsedTimer for ManualTimer {
    fn start(&mut self, duration_ms: u32) {
        self.starts.set(self.starts.get() + 1);
        self.last_duration.set(duration_ms);
        self.expired.set(false);
    }

    fn expired(&self) -> bool {
        self.expired.get()
    }
}

/// Motor actuator that records every command.
#[derive(Default)]
pub struct RecordingMotors {
    pub commands: Vec<(i32, i32)>,
}

impl RecordingMotors {
    pub fn last(&self) -> Option<(i32, i32)> {
        self.commands.last().copied()
    }
}

impl MotorActuator for RecordingMotors {
    fn set_power(&mut self, left: i32, right: i32) {
        assert!((-255..=255).contains(&left), "left power {left}");
        assert!((-255..=255).contains(&right), "right power {right}");
        self.commands.push((left, right));
    }
}

/// Diagnostics sink keeping the records of the current and all past cycles.
#[derive(Default)]
pub struct RecordingDiagnostics {
    pub current: Vec<(&'static str, i32)>,
    pub cycles: Vec<Vec<(&'static str, i32)>>,
}

impl RecordingDiagnostics {
    /// Value recorded under `key` in the most recent cycle.
    pub fn last(&self, key: &str) -> Option<i32> {
        self.cycles
            .last()?
            .iter()
            .find(|(k, _)| *k == key)
            .map(|&(_, v)| v)
    }

    /// Number of cycles in which `key` was recorded.
    pub fn count(&self, key: &str) -> usize {
        self.cycles
            .iter()
            .filter(|c| c.iter().any(|(k, _)| *k == key))
            .count()
    }
}

impl DiagnosticsSink for RecordingDiagnostics {
    fn record(&mut self, key: &'static str, value: i32) {
        self.current.push((key, value));
    }

    fn end_cycle(&mut self) {
        self.cycles.push(std::mem::take(&mut self.current));
    }
}

/// Timer that is always expired.
#[derive(Clone, Copy, Default)]
pub struct Immediate;

impl ElapsedTimer for Immediate {
    fn start(&mut self, _duration_ms: u32) {}

    fn expired(&self) -> bool {
        true
    }
}
