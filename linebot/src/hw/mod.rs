// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

pub mod adc;
pub mod button;
pub mod clock;
pub mod led;
pub mod pins;
pub mod pwm;
pub mod usart;

pub use adc::Adc;
pub use button::Button;
pub use clock::MillisTimer;
pub use led::Led;
pub use pins::BoardPins;
pub use pwm::{DualPwm, PwmChannel};
pub use usart::Usart;
