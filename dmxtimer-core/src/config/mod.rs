//! Configuration types
//!
//! The operator-editable [`Configuration`] lives in RAM only and is rebuilt
//! from [`TimerSettings`] defaults on every power cycle.

pub mod settings;
pub mod types;

pub use settings::*;
pub use types::*;
