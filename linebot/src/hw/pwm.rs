// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Two-channel motor PWM on TIM4 (CH1 = PD12, CH2 = PD13), direct PAC register access.
//!
//! The counter period is fixed at 256 ticks so a duty cycle is simply the 8-bit motor power.

use stm32f7xx_hal::{
    gpio::{gpiod, Alternate},
    pac,
};

/// Largest duty value; the counter reloads after this.
pub const MAX_DUTY: u8 = u8::MAX;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PwmChannel {
    Ch1,
    Ch2,
}

pub struct DualPwm {
    tim: pac::TIM4,
    _pins: (gpiod::PD12<Alternate<2>>, gpiod::PD13<Alternate<2>>),
}

impl DualPwm {
    /// Configure TIM4 for edge-aligned PWM at roughly `pwm_hz`, both outputs at 0 % duty.
    ///
    /// `timer_clock_hz` is the APB1 timer clock.
    pub fn tim4(
        tim: pac::TIM4,
        pins: (gpiod::PD12<Alternate<2>>, gpiod::PD13<Alternate<2>>),
        timer_clock_hz: u32,
        pwm_hz: u32,
    ) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim4en().set_bit());

        tim.cr1.modify(|_, w| w.cen().clear_bit());

        // ----- Period -----
        let ticks_per_period = pwm_hz * (u32::from(MAX_DUTY) + 1);
        let psc = (timer_clock_hz / ticks_per_period).saturating_sub(1);
        tim.psc.write(|w| w.psc().bits(psc as u16));
        tim.arr.write(|w| unsafe { w.bits(u32::from(MAX_DUTY)) });

        // ----- PWM mode 1, preloaded -----
        tim.ccmr1_output().modify(|_, w| unsafe {
            w.oc1m().bits(0b110);
            w.oc1pe().set_bit();
            w.oc2m().bits(0b110);
            w.oc2pe().set_bit();
            w
        });
        tim.ccr1().write(|w| unsafe { w.bits(0) });
        tim.ccr2().write(|w| unsafe { w.bits(0) });
        tim.ccer.modify(|_, w| {
            w.cc1e().set_bit();
            w.cc2e().set_bit();
            w
        });

        // ----- Start -----
        tim.cr1.modify(|_, w| w.arpe().set_bit());
        tim.egr.write(|w| w.ug().set_bit());
        tim.cr1.modify(|_, w| w.cen().set_bit());

        Self { tim, _pins: pins }
    }

    /// Set the duty of one channel. Takes effect at the next counter update.
    pub fn set_duty(&mut self, channel: PwmChannel, duty: u8) {
        let duty = u32::from(duty);
        match channel {
            PwmChannel::Ch1 => self.tim.ccr1().write(|w| unsafe { w.bits(duty) }),
            PwmChannel::Ch2 => self.tim.ccr2().write(|w| unsafe { w.bits(duty) }),
        }
    }
}
