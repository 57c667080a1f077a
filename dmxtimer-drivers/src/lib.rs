//! Hardware driver implementations
//!
//! Concrete implementations of the traits defined in dmxtimer-core:
//!
//! - DMX512 transmitter ([`dmx::DmxOutput`]) behind the `OutputBus` trait

#![no_std]
#![deny(unsafe_code)]

pub mod dmx;

pub use dmx::{DmxError, DmxOutput};
