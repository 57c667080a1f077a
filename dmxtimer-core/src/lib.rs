//! Board-agnostic core logic for the DMX timer firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Configuration model, power-on defaults and device tunables
//! - Quadrature encoder decoding and push-button debouncing
//! - Navigate/edit menu state machine over row descriptors
//! - Render cache with row- and field-level invalidation
//! - Timed output engine (idle / wait / active sequencing)
//! - The controller that runs one cooperative loop iteration
//! - Display surface and output bus traits

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod controller;
pub mod input;
pub mod menu;
pub mod render;
pub mod sequence;
pub mod traits;

pub use controller::{Controller, ControllerError, Report};
