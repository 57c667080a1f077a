//! Partial-repaint renderer
//!
//! The screen is a title band plus one band per menu row. The
//! [`RenderCache`] remembers what each row last showed and repaints only
//! stale rows or value boxes.

pub mod cache;
pub mod layout;

use crate::config::Configuration;
use crate::menu::{Field, FieldText, Row, UiState};
use crate::sequence::Readout;

pub use cache::RenderCache;

/// A region that must be repainted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Invalidation {
    /// Whole screen, including static chrome
    Full,
    /// One row band: background, label and all values
    Row(Row),
    /// One value box
    Field(Row, Field),
}

/// Everything the screen is derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct View {
    pub config: Configuration,
    pub ui: UiState,
    pub readout: Readout,
}

/// What one row band shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub label: &'static str,
    /// Selected row, drawn inverted
    pub highlighted: bool,
    /// Field carrying the focus outline
    pub focus: Option<Field>,
    /// Value text per field slot
    pub values: [FieldText; 2],
}

impl View {
    /// Derive the contents of one row
    pub fn row(&self, row: Row) -> RowView {
        let mut values = [FieldText::new(), FieldText::new()];
        for field in row.fields() {
            values[field.slot()] = row.field_text(*field, &self.config, &self.readout);
        }

        RowView {
            label: row.label(self.readout.phase),
            highlighted: self.ui.selected == row,
            focus: self
                .ui
                .focus()
                .filter(|(focused, _)| *focused == row)
                .map(|(_, field)| field),
            values,
        }
    }
}
