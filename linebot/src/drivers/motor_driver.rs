// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Dual H-bridge motor driver: one PWM channel and two direction pins per motor.

use linebot_core::config::MAX_POWER;
use linebot_core::MotorActuator;
use stm32f7xx_hal::gpio::{Output, Pin, PushPull};

use crate::hw::{DualPwm, PwmChannel};

/// Logical drive direction for one motor.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Direction {
    Forward,
    Reverse,
    /// Both bridge inputs low; the motor freewheels.
    Coast,
}

impl Direction {
    fn from_power(power: i32) -> Self {
        match power {
            p if p > 0 => Direction::Forward,
            p if p < 0 => Direction::Reverse,
            _ => Direction::Coast,
        }
    }
}

/// Direction input pair of one bridge.
pub struct BridgePins<const FP: char, const FN: u8, const RP: char, const RN: u8> {
    fwd: Pin<FP, FN, Output<PushPull>>,
    rev: Pin<RP, RN, Output<PushPull>>,
}

impl<const FP: char, const FN: u8, const RP: char, const RN: u8> BridgePins<FP, FN, RP, RN> {
    pub fn new(mut fwd: Pin<FP, FN, Output<PushPull>>, mut rev: Pin<RP, RN, Output<PushPull>>) -> Self {
        fwd.set_low();
        rev.set_low();
        Self { fwd, rev }
    }
}

/// Anything that can point a bridge in a direction.
pub trait DirectionControl {
    fn set_direction(&mut self, dir: Direction);
}

impl<const FP: char, const FN: u8, const RP: char, const RN: u8> DirectionControl
    for BridgePins<FP, FN, RP, RN>
{
    fn set_direction(&mut self, dir: Direction) {
        // Drop the active side first so both inputs are never high together.
        match dir {
            Direction::Forward => {
                self.rev.set_low();
                self.fwd.set_high();
            }
            Direction::Reverse => {
                self.fwd.set_low();
                self.rev.set_high();
            }
            Direction::Coast => {
                self.fwd.set_low();
                self.rev.set_low();
            }
        }
    }
}

/// Left motor on PWM CH1, right motor on PWM CH2.
pub struct MotorDriver<L, R> {
    pwm: DualPwm,
    left: L,
    right: R,
    last: (i32, i32),
}

impl<L: DirectionControl, R: DirectionControl> MotorDriver<L, R> {
    /// Create the driver with both motors coasting.
    pub fn new(pwm: DualPwm, left: L, right: R) -> Self {
        let mut driver = Self {
            pwm,
            left,
            right,
            last: (0, 0),
        };
        driver.drive_left(0);
        driver.drive_right(0);
        driver
    }

    fn drive_left(&mut self, power: i32) {
        self.left.set_direction(Direction::from_power(power));
        self.pwm.set_duty(PwmChannel::Ch1, duty(power));
    }

    fn drive_right(&mut self, power: i32) {
        self.right.set_direction(Direction::from_power(power));
        self.pwm.set_duty(PwmChannel::Ch2, duty(power));
    }
}

fn duty(power: i32) -> u8 {
    power.unsigned_abs().min(MAX_POWER as u32) as u8
}

impl<L: DirectionControl, R: DirectionControl> MotorActuator for MotorDriver<L, R> {
    fn set_power(&mut self, left: i32, right: i32) {
        let left = left.clamp(-MAX_POWER, MAX_POWER);
        let right = right.clamp(-MAX_POWER, MAX_POWER);

        if (left, right) == self.last {
            return;
        }

        self.drive_left(left);
        self.drive_right(right);
        self.last = (left, right);
    }
}
