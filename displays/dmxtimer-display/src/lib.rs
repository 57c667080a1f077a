//! Display backends for the DMX timer
//!
//! This crate provides:
//! - [`GraphicsSurface`], which implements the core `DisplaySurface` trait
//!   on top of any `embedded-graphics` monochrome [`Panel`]
//! - [`Ssd1306`], a buffered 128x64 SSD1306 I2C panel that only transfers
//!   the pages touched since the last flush
//!
//! # Architecture
//!
//! ```text
//! RenderCache --DisplaySurface--> GraphicsSurface --DrawTarget--> Ssd1306 --I2C--> OLED
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod ssd1306;
pub mod surface;

pub use ssd1306::Ssd1306;
pub use surface::{GraphicsSurface, Panel};
