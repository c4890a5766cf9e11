// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Diagnostics stream over the USART console.
//!
//! Each reported cycle becomes one line of space separated `key=value` fields:
//!
//! ```text
//! speed=180 error=-4 correction=-20 geometry=0
//! ```
//!
//! At 115200 baud a full line takes several milliseconds, far longer than a control cycle, so only
//! every `every`-th cycle is printed. Records of the other cycles are dropped.

use linebot_core::DiagnosticsSink;
use stm32f7xx_hal::serial::Instance;

use crate::hw::Usart;

pub struct UsartDiagnostics<'a, U: Instance> {
    usart: &'a mut Usart<U>,
    every: u16,
    cycle: u16,
    fields: u8,
}

impl<'a, U: Instance> UsartDiagnostics<'a, U> {
    /// Print one cycle out of every `every` (`0` is treated as `1`).
    pub fn new(usart: &'a mut Usart<U>, every: u16) -> Self {
        Self {
            usart,
            every: every.max(1),
            cycle: 0,
            fields: 0,
        }
    }

    #[inline]
    fn reporting(&self) -> bool {
        self.cycle == 0
    }
}

impl<U: Instance> DiagnosticsSink for UsartDiagnostics<'_, U> {
    fn record(&mut self, key: &'static str, value: i32) {
        if !self.reporting() {
            return;
        }
        if self.fields > 0 {
            self.usart.write_byte(b' ');
        }
        self.usart.print_field(key, value);
        self.fields = self.fields.saturating_add(1);
    }

    fn end_cycle(&mut self) {
        if self.reporting() && self.fields > 0 {
            self.usart.write_str("\r\n");
        }
        self.fields = 0;
        self.cycle = (self.cycle + 1) % self.every;
    }
}
