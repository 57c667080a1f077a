//! Configuration menu
//!
//! Two modes: navigate (encoder moves the row selection, clamped) and
//! edit (encoder changes the selected value, wrapping). The interval row
//! is edited as two sub-fields, minutes then seconds.

pub mod machine;
pub mod rows;

pub use machine::{Command, Menu, Mode, Response, UiState};
pub use rows::{Field, FieldText, Row};
