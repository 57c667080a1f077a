//! DMX Timer Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the timer logic is written
//! against. Board crates implement them for their chip's GPIO and UART
//! types so the core and the drivers stay host-testable.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  dmxtimer-hal-rp2040 (board adapters)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  dmxtimer-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ dmxtimer-core │       │   dmxtimer-   │
//! │ (input lines) │       │    drivers    │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::InputPin`] - encoder phases and push-button
//! - [`gpio::OutputPin`] - driver-enable and indicator lines
//! - [`uart::UartTx`] - serial transmitter with line-break control (DMX512)

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use gpio::{InputPin, OutputPin};
pub use uart::{UartConfig, UartTx};
