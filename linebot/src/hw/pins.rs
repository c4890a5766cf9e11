// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the linebot on a Nucleo-F767ZI.
//!
//! | Function | Pins |
//! | -------- | ---- |
//! | Line sensors (ADC1) | PA0, PA3, PA4, PA6, PB1, PC0 (left to right) |
//! | Marker sensors (ADC1) | PC3 (left), PC2 (right) |
//! | Motor PWM (TIM4) | PD12 (left), PD13 (right) |
//! | H-bridge direction | PD0/PD1 (left), PD4/PD5 (right) |
//! | User button | PC13 |
//! | LEDs | PB7 (status), PB0 (marker) |
//! | Console (USART3) | PD8 (TX), PD9 (RX) |

use stm32f7xx_hal::{
    gpio::{gpioa, gpiob, gpioc, gpiod, Alternate, Analog, Floating, Input, Output, PushPull},
    pac,
    prelude::*,
};

pub struct BoardPins {
    pub sensors: SensorPins,
    pub motors: MotorPins,
    pub leds: Leds,
    pub button: gpioc::PC13<Input<Floating>>,
    pub usart3: Usart3Pins,
}

/// Analog inputs. Held only so nothing else can reconfigure them.
pub struct SensorPins {
    pub line: (
        gpioa::PA0<Analog>,
        gpioa::PA3<Analog>,
        gpioa::PA4<Analog>,
        gpioa::PA6<Analog>,
        gpiob::PB1<Analog>,
        gpioc::PC0<Analog>,
    ),
    pub marker_left: gpioc::PC3<Analog>,
    pub marker_right: gpioc::PC2<Analog>,
}

pub struct MotorPins {
    pub pwm: (gpiod::PD12<Alternate<2>>, gpiod::PD13<Alternate<2>>),
    pub left_fwd: gpiod::PD0<Output<PushPull>>,
    pub left_rev: gpiod::PD1<Output<PushPull>>,
    pub right_fwd: gpiod::PD4<Output<PushPull>>,
    pub right_rev: gpiod::PD5<Output<PushPull>>,
}

pub struct Leds {
    pub status: gpiob::PB7<Output<PushPull>>, // LD2 (blue)
    pub marker: gpiob::PB0<Output<PushPull>>, // LD1 (green)
}

pub struct Usart3Pins {
    pub tx: gpiod::PD8<Alternate<7>>,
    pub rx: gpiod::PD9<Alternate<7>>,
}

impl BoardPins {
    pub fn new(gpioa: pac::GPIOA, gpiob: pac::GPIOB, gpioc: pac::GPIOC, gpiod: pac::GPIOD) -> Self {
        let gpioa = gpioa.split();
        let gpiob = gpiob.split();
        let gpioc = gpioc.split();
        let gpiod = gpiod.split();

        Self {
            sensors: SensorPins {
                line: (
                    gpioa.pa0.into_analog(),
                    gpioa.pa3.into_analog(),
                    gpioa.pa4.into_analog(),
                    gpioa.pa6.into_analog(),
                    gpiob.pb1.into_analog(),
                    gpioc.pc0.into_analog(),
                ),
                marker_left: gpioc.pc3.into_analog(),
                marker_right: gpioc.pc2.into_analog(),
            },

            motors: MotorPins {
                pwm: (
                    gpiod.pd12.into_alternate::<2>(),
                    gpiod.pd13.into_alternate::<2>(),
                ),
                left_fwd: gpiod.pd0.into_push_pull_output(),
                left_rev: gpiod.pd1.into_push_pull_output(),
                right_fwd: gpiod.pd4.into_push_pull_output(),
                right_rev: gpiod.pd5.into_push_pull_output(),
            },

            leds: Leds {
                status: gpiob.pb7.into_push_pull_output(),
                marker: gpiob.pb0.into_push_pull_output(),
            },

            button: gpioc.pc13.into_floating_input(),

            usart3: Usart3Pins {
                tx: gpiod.pd8.into_alternate::<7>(),
                rx: gpiod.pd9.into_alternate::<7>(),
            },
        }
    }
}
