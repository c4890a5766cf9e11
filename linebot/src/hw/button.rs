// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Debounced push button.

use stm32f7xx_hal::gpio::{Floating, Input, Pin};

use crate::hw::clock;

/// Momentary button read by polling.
pub struct Button<const P: char, const N: u8> {
    pin: Pin<P, N, Input<Floating>>,
    active_high: bool,
    debounce_ms: u32,
}

impl<const P: char, const N: u8> Button<P, N> {
    /// The Nucleo user button (PC13) reads high while pressed.
    pub fn active_high(pin: Pin<P, N, Input<Floating>>, debounce_ms: u32) -> Self {
        Self {
            pin,
            active_high: true,
            debounce_ms,
        }
    }

    /// Raw level, no debouncing.
    #[inline]
    pub fn is_pressed(&self) -> bool {
        self.pin.is_high() == self.active_high
    }

    /// Block until one full press-and-release has been seen, with both edges debounced.
    pub fn wait_for_press(&mut self) {
        self.wait_for_level(true);
        self.wait_for_level(false);
    }

    /// Wait until the button has held `pressed` for the whole debounce time.
    fn wait_for_level(&self, pressed: bool) {
        loop {
            while self.is_pressed() != pressed {}

            let since = clock::millis();
            while self.is_pressed() == pressed {
                if clock::millis().wrapping_sub(since) >= self.debounce_ms {
                    return;
                }
            }
        }
    }
}
