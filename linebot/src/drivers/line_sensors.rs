// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Interrupt-driven reflectance sensor sampling.
//!
//! TIM2 fires at a fixed rate; its handler converts all eight channels and publishes them as one
//! [`Frame`]. The control loop reads the latest frame through [`SharedSensors`]. Publishing and
//! reading both happen inside a critical section, so a reader never sees a half-updated frame.
//!
//! Wiring in the binary:
//!
//! ```ignore
//! Sampler::new(adc, dp.TIM2, timer_clock_hz, SAMPLE_RATE_HZ).install();
//!
//! #[interrupt]
//! fn TIM2() {
//!     line_sensors::on_timer_interrupt();
//! }
//! ```

use core::cell::{Cell, RefCell};

use cortex_m::interrupt::{self, Mutex};
use cortex_m::peripheral::NVIC;
use linebot_core::{RawSensorSource, NUM_LINE_SENSORS};
use stm32f7xx_hal::pac;

use crate::config::{LINE_CHANNELS, MARKER_LEFT_CHANNEL, MARKER_RIGHT_CHANNEL};
use crate::hw::Adc;

/// One sampling pass over every sensor.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    pub line: [u16; NUM_LINE_SENSORS],
    pub marker_left: u16,
    pub marker_right: u16,
}

impl Frame {
    const EMPTY: Frame = Frame {
        line: [0; NUM_LINE_SENSORS],
        marker_left: 0,
        marker_right: 0,
    };
}

static LATEST: Mutex<Cell<Frame>> = Mutex::new(Cell::new(Frame::EMPTY));
static SAMPLER: Mutex<RefCell<Option<Sampler>>> = Mutex::new(RefCell::new(None));

/// Owns the ADC and the sampling timer once installed.
pub struct Sampler {
    adc: Adc,
    tim: pac::TIM2,
}

impl Sampler {
    /// Configure TIM2 to raise an update interrupt `rate_hz` times per second.
    ///
    /// `timer_clock_hz` is the APB1 timer clock. The timer is not started until [`Self::install`].
    pub fn new(adc: Adc, tim: pac::TIM2, timer_clock_hz: u32, rate_hz: u32) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim2en().set_bit());

        tim.cr1.modify(|_, w| w.cen().clear_bit());

        // 1 MHz counter
        let psc = (timer_clock_hz / 1_000_000).saturating_sub(1);
        tim.psc.write(|w| w.psc().bits(psc as u16));
        tim.arr.write(|w| unsafe { w.bits(1_000_000 / rate_hz - 1) });
        tim.egr.write(|w| w.ug().set_bit());
        tim.sr.modify(|_, w| w.uif().clear_bit());
        tim.dier.modify(|_, w| w.uie().set_bit());

        Self { adc, tim }
    }

    /// Take one frame. Blocks for eight conversions.
    pub fn sample(&self) -> Frame {
        let mut frame = Frame::EMPTY;
        self.adc.read_into(&LINE_CHANNELS, &mut frame.line);
        frame.marker_left = self.adc.read(MARKER_LEFT_CHANNEL);
        frame.marker_right = self.adc.read(MARKER_RIGHT_CHANNEL);
        frame
    }

    /// Publish an initial frame, hand the sampler to the interrupt handler and start the timer.
    pub fn install(self) {
        let first = self.sample();

        interrupt::free(|cs| {
            LATEST.borrow(cs).set(first);
            self.tim.cr1.modify(|_, w| w.cen().set_bit());
            SAMPLER.borrow(cs).replace(Some(self));
        });

        unsafe { NVIC::unmask(pac::Interrupt::TIM2) };
    }
}

/// Body of the TIM2 interrupt handler.
pub fn on_timer_interrupt() {
    interrupt::free(|cs| {
        if let Some(sampler) = SAMPLER.borrow(cs).borrow().as_ref() {
            sampler.tim.sr.modify(|_, w| w.uif().clear_bit());
            LATEST.borrow(cs).set(sampler.sample());
        }
    });
}

/// Most recently published frame.
pub fn latest() -> Frame {
    interrupt::free(|cs| LATEST.borrow(cs).get())
}

/// Read side of the sampler, handed to calibration and the control loop.
#[derive(Copy, Clone, Debug, Default)]
pub struct SharedSensors;

impl RawSensorSource for SharedSensors {
    fn read_line_sensors(&mut self) -> [u16; NUM_LINE_SENSORS] {
        latest().line
    }

    fn read_marker_sensors(&mut self) -> (u16, u16) {
        let frame = latest();
        (frame.marker_left, frame.marker_right)
    }
}
