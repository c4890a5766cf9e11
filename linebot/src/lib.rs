// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Linebot Firmware
//!
//! Board support for the linebot line follower, written in Rust, targeting the STM32F767ZI
//! (Nucleo-144). The control algorithms live in `linebot-core`; this crate provides the peripherals
//! they run on.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`hw`] | MCU-level wrappers around ADC, timers, GPIO and USART |
//! | [`drivers`] | Implementations of the control-core interfaces (sensors, motors, diagnostics) |
//! | [`config`] | Board wiring and timing constants |
//!
//! ## Getting Started
//!
//! Build docs:
//!
//! ```bash
//! cargo doc --no-deps --open
//! ```
//!
//! Flash the board (from the `linebot/` directory, which selects the Cortex-M target):
//!
//! ```bash
//! cargo run --release
//! ```
//!
//! With the diagnostics stream on USART3:
//!
//! ```bash
//! cargo run --release --features diagnostics
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![no_std]

pub mod config;
pub mod drivers;
pub mod hw;
