//! RP2040-specific HAL for the DMX timer firmware
//!
//! This crate implements the shared `dmxtimer-hal` traits on top of
//! embassy-rp:
//!
//! - GPIO input and output lines ([`gpio::RpInput`], [`gpio::RpOutput`])
//! - Blocking UART transmitter with break control ([`uart::RpUartTx`])

#![no_std]

pub mod gpio;
pub mod uart;

pub use gpio::{RpInput, RpOutput};
pub use uart::RpUartTx;
