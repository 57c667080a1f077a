//! DMX Timer firmware
//!
//! Drives one DMX512 channel through a repeating wait/active cycle,
//! configured from a rotary encoder and a 128x64 OLED menu.
//!
//! Everything runs in one cooperative loop on a 1 ms ticker: sample the
//! encoder, step the controller, log what it reports.
//!
//! # Wiring
//!
//! | Signal          | Pin  |
//! |-----------------|------|
//! | Encoder CLK (A) | GP2  |
//! | Encoder SW      | GP4  |
//! | Encoder DT (B)  | GP7  |
//! | DMX TX (UART1)  | GP8  |
//! | RS-485 DE       | GP9  |
//! | OLED SDA (I2C0) | GP16 |
//! | OLED SCL (I2C0) | GP17 |
//! | Activity LED    | GP25 |

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Level, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::pac;
use embassy_rp::uart::UartTx;
use embassy_time::{Delay, Duration, Instant, Ticker};
use {defmt_rtt as _, panic_probe as _};

use dmxtimer_core::controller::DisplayPower;
use dmxtimer_core::input::InputSubsystem;
use dmxtimer_core::sequence::Phase;
use dmxtimer_core::{Controller, ControllerError, Report};
use dmxtimer_display::{GraphicsSurface, Ssd1306};
use dmxtimer_drivers::DmxOutput;
use dmxtimer_hal::{OutputPin, UartConfig};
use dmxtimer_hal_rp2040::uart::to_rp_config;
use dmxtimer_hal_rp2040::{RpInput, RpOutput, RpUartTx};

mod settings;

use settings::SETTINGS;

/// Loop period in milliseconds
const LOOP_INTERVAL_MS: u64 = 1;

/// OLED bus speed
const I2C_FREQUENCY_HZ: u32 = 400_000;

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("DMX timer firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Encoder lines idle high; the switch pulls to ground
    let mut input = InputSubsystem::new(
        RpInput::new(p.PIN_2, Pull::Up),
        RpInput::new(p.PIN_7, Pull::Up),
        RpInput::new(p.PIN_4, Pull::Up),
        SETTINGS.debounce_ms,
    );

    // DMX512 line: UART1 TX into an RS-485 transceiver
    let mut driver_enable = RpOutput::new(p.PIN_9, Level::Low);
    let tx = UartTx::new_blocking(p.UART1, p.PIN_8, to_rp_config(&UartConfig::dmx512()));
    let mut dmx = DmxOutput::new(RpUartTx::new(tx, pac::UART1), Delay);
    driver_enable.set_high();
    info!("DMX output ready on UART1");

    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = I2C_FREQUENCY_HZ;
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_17, p.PIN_16, i2c_config);
    let mut panel = Ssd1306::new(i2c);
    if let Err(e) = panel.init() {
        error!("Display init failed: {}", e);
        panic!("display init failed");
    }
    let mut surface = GraphicsSurface::new(panel);

    let mut led = RpOutput::new(p.PIN_25, Level::Low);

    let mut controller = match Controller::new(SETTINGS) {
        Ok(controller) => controller,
        Err(e) => {
            error!("Invalid settings: {}", e);
            panic!("invalid settings");
        }
    };

    let start = Instant::now();
    if let Err(e) = controller.start_up(0, &mut surface) {
        // Keep going: the output side works without a screen
        warn!("Initial draw failed: {}", e);
    }
    info!(
        "Controller ready: channel {}, frame interval {} ms, repeat {}",
        controller.config().channel(),
        SETTINGS.frame_interval_ms(),
        SETTINGS.repeat
    );

    let mut ticker = Ticker::every(Duration::from_millis(LOOP_INTERVAL_MS));

    loop {
        let now_ms = start.elapsed().as_millis();

        match controller.iterate(now_ms, &mut input, &mut surface, &mut dmx) {
            Ok(report) => log_report(&report),
            Err(ControllerError::Display(e)) => warn!("Display error: {}", e),
            Err(ControllerError::Output(e)) => warn!("DMX error: {}", e),
        }

        led.set_state(controller.phase() == Phase::Active);

        ticker.next().await;
    }
}

fn log_report(report: &Report) {
    if report.input {
        trace!("Input handled");
    }

    for t in &report.transitions {
        info!("Phase {} -> {} at {} ms", t.from, t.to, t.at_ms);
    }

    if let Some(e) = report.rejected {
        warn!("Start rejected: {}", e);
    }

    match report.display {
        Some(DisplayPower::Sleep) => debug!("Display sleeping"),
        Some(DisplayPower::Wake) => debug!("Display woken"),
        None => {}
    }

    if report.redrawn {
        trace!("Screen repainted");
    }
}
