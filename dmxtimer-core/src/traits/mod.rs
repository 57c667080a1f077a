//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and the display and lighting bus implementations.

pub mod display;
pub mod output;

pub use display::{DisplaySurface, Rect, Shade};
pub use output::OutputBus;
