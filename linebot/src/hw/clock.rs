// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Millisecond time base on SysTick.
//!
//! The SysTick exception handler lives in the binary and must call [`tick`]. Everything else reads
//! the counter through [`millis`] or a [`MillisTimer`].

use core::sync::atomic::{AtomicU32, Ordering};

use cortex_m::peripheral::{syst::SystClkSource, SYST};
use linebot_core::ElapsedTimer;

static MILLIS: AtomicU32 = AtomicU32::new(0);

/// Start SysTick at 1 kHz from the core clock.
pub fn start(mut syst: SYST, sysclk_hz: u32) {
    syst.set_clock_source(SystClkSource::Core);
    syst.set_reload(sysclk_hz / 1_000 - 1);
    syst.clear_current();
    syst.enable_counter();
    syst.enable_interrupt();
}

/// Advance the counter by one millisecond. Call from the SysTick handler only.
#[inline]
pub fn tick() {
    MILLIS.fetch_add(1, Ordering::Relaxed);
}

/// Milliseconds since [`start`]. Wraps after ~49 days.
#[inline]
pub fn millis() -> u32 {
    MILLIS.load(Ordering::Relaxed)
}

/// Busy-wait for `ms` milliseconds.
pub fn delay_ms(ms: u32) {
    let mut timer = MillisTimer::new();
    timer.start(ms);
    while !timer.expired() {
        cortex_m::asm::nop();
    }
}

/// One-shot timer over [`millis`]. Expired until first started.
#[derive(Copy, Clone, Debug, Default)]
pub struct MillisTimer {
    started_at: u32,
    duration_ms: u32,
}

impl MillisTimer {
    pub const fn new() -> Self {
        Self {
            started_at: 0,
            duration_ms: 0,
        }
    }
}

impl ElapsedTimer for MillisTimer {
    fn start(&mut self, duration_ms: u32) {
        self.started_at = millis();
        self.duration_ms = duration_ms;
    }

    fn expired(&self) -> bool {
        millis().wrapping_sub(self.started_at) >= self.duration_ms
    }
}
