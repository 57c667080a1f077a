//! Screen geometry for a 128x64 panel with a 6x10 font

use crate::menu::{Field, Row};
use crate::traits::Rect;

pub const WIDTH: u32 = 128;
pub const HEIGHT: u32 = 64;

/// Glyph cell size
pub const CHAR_WIDTH: i32 = 6;
pub const CHAR_HEIGHT: u32 = 10;

pub const TITLE: &str = "DMX TIMER";
pub const TITLE_X: i32 = 2;
pub const TITLE_Y: i32 = 1;
/// Horizontal rule under the title
pub const RULE_Y: i32 = 12;

/// Lamp icon in the title band
pub const LAMP_X: i32 = 116;
pub const LAMP_Y: i32 = 1;
pub const LAMP_WIDTH: u32 = 10;
#[rustfmt::skip]
pub const LAMP: [u8; 20] = [
    0x3F, 0x00,
    0x40, 0x80,
    0x80, 0x40,
    0x92, 0x40,
    0x8C, 0x40,
    0x4C, 0x80,
    0x2D, 0x00,
    0x1E, 0x00,
    0x1E, 0x00,
    0x0C, 0x00,
];

pub const FIRST_ROW_Y: i32 = 14;
pub const ROW_HEIGHT: u32 = 10;
pub const LABEL_X: i32 = 4;

/// Separator between interval minutes and seconds
pub const COLON_X: i32 = 98;

/// Padding between field text and its box edge
const BOX_PAD: i32 = 2;

/// Top edge of a row band
pub fn row_y(row: Row) -> i32 {
    FIRST_ROW_Y + (row.index() as i32) * ROW_HEIGHT as i32
}

/// Full-width band owned by a row
pub fn row_rect(row: Row) -> Rect {
    Rect::new(0, row_y(row), WIDTH, ROW_HEIGHT)
}

/// Left edge of a field's text
pub fn field_x(row: Row, field: Field) -> i32 {
    match (row, field) {
        (Row::Interval, Field::Second) => 104,
        (Row::Interval, _) => 84,
        (Row::StartStop, _) => 74,
        _ => 98,
    }
}

/// Width of a field in characters
pub fn field_chars(row: Row, field: Field) -> u32 {
    match (row, field) {
        (Row::Interval, _) => 2,
        (Row::StartStop, _) => 7,
        _ => 3,
    }
}

/// Box owned by a field: its text plus padding for the focus outline
pub fn field_rect(row: Row, field: Field) -> Rect {
    Rect::new(
        field_x(row, field) - BOX_PAD,
        row_y(row),
        field_chars(row, field) * CHAR_WIDTH as u32 + 2 * BOX_PAD as u32,
        ROW_HEIGHT,
    )
}
