// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

#![no_main]
#![no_std]

use cortex_m_rt::{entry, exception};
use panic_halt as _;

use hal::{
    pac::{self, interrupt},
    prelude::*,
    serial::{Config, Serial},
};
use stm32f7xx_hal as hal;

use linebot::config::*;
use linebot::drivers::{line_sensors, BridgePins, MotorDriver, Sampler, SharedSensors};
use linebot::hw::{clock, Adc, BoardPins, Button, DualPwm, Led, MillisTimer, Usart};
use linebot_core::sensing::SampledCalibration;
use linebot_core::{
    CalibrationService, ControlConfig, ControlContext, ElapsedTimer, MotorActuator,
};

#[cfg(feature = "diagnostics")]
use linebot::drivers::UsartDiagnostics;
#[cfg(not(feature = "diagnostics"))]
use linebot_core::NoDiagnostics;

#[entry]
fn main() -> ! {
    // Peripherals
    let dp = pac::Peripherals::take().unwrap();
    let cp = cortex_m::Peripherals::take().unwrap();

    // Clocks
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze();
    clock::start(cp.SYST, clocks.sysclk().raw());

    // GPIO
    let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOC, dp.GPIOD);

    // LEDs and button
    let mut status = Led::active_high(pins.leds.status);
    let mut marker_led = Led::active_high(pins.leds.marker);
    let mut button = Button::active_high(pins.button, DEBOUNCE_MS);

    // USART3 (ST-LINK VCP)
    let usart_cfg = Config {
        baud_rate: CONSOLE_BAUD.bps(),
        ..Default::default()
    };
    let serial = Serial::new(
        dp.USART3,
        (pins.usart3.tx, pins.usart3.rx),
        &clocks,
        usart_cfg,
    );
    let mut console = Usart::new(serial);

    // Motors
    let pwm = DualPwm::tim4(
        dp.TIM4,
        pins.motors.pwm,
        clocks.timclk1().raw(),
        PWM_FREQUENCY_HZ,
    );
    let mut motors = MotorDriver::new(
        pwm,
        BridgePins::new(pins.motors.left_fwd, pins.motors.left_rev),
        BridgePins::new(pins.motors.right_fwd, pins.motors.right_rev),
    );

    // Sensors
    let _sensor_pins = pins.sensors;
    let adc = Adc::adc1(dp.ADC1);
    Sampler::new(adc, dp.TIM2, clocks.timclk1().raw(), SAMPLE_RATE_HZ).install();
    let mut sensors = SharedSensors;

    console.println("linebot: boot");

    // ----- Setup sequence -----
    clock::delay_ms(SETUP_DELAY_MS);
    motors.set_power(0, 0);
    clock::delay_ms(SETUP_DELAY_MS);

    console.println("linebot: press to calibrate");
    button.wait_for_press();

    status.on();
    let calibration = SampledCalibration::new(
        sensors,
        MillisTimer::new(),
        CALIBRATION_SAMPLES,
        CALIBRATION_INTERVAL_MS,
    );
    #[cfg(feature = "diagnostics")]
    let profile = calibration
        .with_diagnostics(UsartDiagnostics::new(&mut console, 1))
        .calibrate();
    #[cfg(not(feature = "diagnostics"))]
    let profile = {
        let mut calibration = calibration;
        calibration.calibrate()
    };
    status.off();

    let mut ctx = match ControlContext::new(
        ControlConfig::default(),
        profile,
        MillisTimer::new(),
        MillisTimer::new(),
    ) {
        Ok(ctx) => ctx,
        Err(err) => {
            use core::fmt::Write;
            let _ = writeln!(console, "linebot: bad config: {}\r", err);
            loop {
                status.toggle();
                clock::delay_ms(100);
            }
        }
    };

    console.println("linebot: press to run");
    button.wait_for_press();
    status.on();

    #[cfg(feature = "diagnostics")]
    let mut diag = UsartDiagnostics::new(&mut console, DIAGNOSTICS_EVERY);
    #[cfg(not(feature = "diagnostics"))]
    let mut diag = NoDiagnostics;

    // ----- Control loop -----
    let mut period = MillisTimer::new();
    loop {
        period.start(CONTROL_PERIOD_MS);

        let outcome = ctx.cycle(&mut sensors, &mut motors, &mut diag);
        marker_led.set(outcome.markers.any_hit());

        while !period.expired() {
            cortex_m::asm::nop();
        }
    }
}

#[exception]
fn SysTick() {
    clock::tick();
}

#[interrupt]
fn TIM2() {
    line_sensors::on_timer_interrupt();
}
