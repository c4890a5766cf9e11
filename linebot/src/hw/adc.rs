// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! ADC1 support using direct PAC register access.
//!
//! Blocking single conversions, software triggered. A multi-channel frame is a sequence of single
//! conversions taken back to back.
//!
//! Example:
//! ```ignore
//! let adc = Adc::adc1(dp.ADC1);
//! let value = adc.read(3);
//! ```

use stm32f7xx_hal::pac;

/// 84 ADC cycles per conversion. The reflectance sensors have a high output impedance.
const SAMPLE_TIME: u8 = 0b100;

pub struct Adc {
    adc: pac::ADC1,
}

impl Adc {
    /// Power up and configure ADC1: 12-bit, right aligned, single conversion.
    pub fn adc1(adc1: pac::ADC1) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb2enr.modify(|_, w| w.adc1en().set_bit());

        let common = unsafe { &*pac::ADC_COMMON::ptr() };
        // ADC prescaler: PCLK2 / 4
        common.ccr.modify(|_, w| w.adcpre().div4());

        // Power off to configure
        adc1.cr2.modify(|_, w| w.adon().clear_bit());

        adc1.cr1.modify(|_, w| w.res().bits(0b00));
        adc1.cr2.modify(|_, w| {
            w.cont().clear_bit();
            w.align().right();
            w.exten().disabled();
            w
        });

        // Sequence length = 1 conversion
        adc1.sqr1.modify(|_, w| w.l().bits(0));

        adc1.cr2.modify(|_, w| w.adon().set_bit());

        let mut adc = Self { adc: adc1 };
        adc.set_sample_times();
        adc
    }

    fn set_sample_times(&mut self) {
        self.adc.smpr2.modify(|_, w| {
            w.smp0().bits(SAMPLE_TIME);
            w.smp1().bits(SAMPLE_TIME);
            w.smp2().bits(SAMPLE_TIME);
            w.smp3().bits(SAMPLE_TIME);
            w.smp4().bits(SAMPLE_TIME);
            w.smp5().bits(SAMPLE_TIME);
            w.smp6().bits(SAMPLE_TIME);
            w.smp7().bits(SAMPLE_TIME);
            w.smp8().bits(SAMPLE_TIME);
            w.smp9().bits(SAMPLE_TIME);
            w
        });
        self.adc.smpr1.modify(|_, w| {
            w.smp10().bits(SAMPLE_TIME);
            w.smp11().bits(SAMPLE_TIME);
            w.smp12().bits(SAMPLE_TIME);
            w.smp13().bits(SAMPLE_TIME);
            w
        });
    }

    /// Convert a single channel.
    pub fn read(&self, channel: u8) -> u16 {
        let adc = &self.adc;

        adc.sqr3
            .modify(|_, w| unsafe { w.sq1().bits(channel & 0x1F) });

        adc.cr2.modify(|_, w| w.swstart().set_bit());
        while adc.sr.read().eoc().bit_is_clear() {}

        adc.dr.read().data().bits() as u16
    }

    /// Convert each channel in `channels` in order, writing results to `out`.
    pub fn read_into(&self, channels: &[u8], out: &mut [u16]) {
        for (slot, &ch) in out.iter_mut().zip(channels) {
            *slot = self.read(ch);
        }
    }
}
