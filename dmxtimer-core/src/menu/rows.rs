//! Row descriptors
//!
//! Each menu row knows its label, how to format its value(s) and how an
//! encoder step changes the configuration. Adding a row means adding a
//! variant here; the menu machine and render cache only go through
//! these methods.

use core::fmt::Write;

use heapless::String;

use crate::config::Configuration;
use crate::input::Direction;
use crate::sequence::{Phase, Readout};

/// Formatted value text (longest is the status readout, "W 59:59")
pub type FieldText = String<8>;

/// Menu rows, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Row {
    /// Target channel
    Channel,
    /// Wait interval (MM:SS)
    Interval,
    /// Active duration
    Duration,
    /// Active intensity
    Intensity,
    /// Start/stop control with status readout
    StartStop,
}

/// Editable value within a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    /// The only value on a scalar row
    Value,
    /// Interval minutes
    Minute,
    /// Interval seconds
    Second,
}

impl Field {
    /// Position of this field within its row's value slots
    pub fn slot(self) -> usize {
        match self {
            Field::Value | Field::Minute => 0,
            Field::Second => 1,
        }
    }
}

const SCALAR: &[Field] = &[Field::Value];
const MM_SS: &[Field] = &[Field::Minute, Field::Second];
const MINUTE: &[Field] = &[Field::Minute];
const SECOND: &[Field] = &[Field::Second];
const NONE: &[Field] = &[];

impl Row {
    /// All rows in display order
    pub const ALL: [Row; 5] = [
        Row::Channel,
        Row::Interval,
        Row::Duration,
        Row::Intensity,
        Row::StartStop,
    ];

    /// Number of rows
    pub const COUNT: usize = Self::ALL.len();

    /// Index of the last row
    pub const LAST: usize = Self::COUNT - 1;

    pub fn index(self) -> usize {
        match self {
            Row::Channel => 0,
            Row::Interval => 1,
            Row::Duration => 2,
            Row::Intensity => 3,
            Row::StartStop => 4,
        }
    }

    pub fn from_index(index: usize) -> Option<Row> {
        Self::ALL.get(index).copied()
    }

    /// Whether a click enters edit mode (otherwise it issues a command)
    pub fn is_editable(self) -> bool {
        !matches!(self, Row::StartStop)
    }

    /// Whether the row has independently edited sub-fields
    pub fn is_multi_field(self) -> bool {
        self.fields().len() > 1
    }

    /// Fields shown on this row, left to right
    pub fn fields(self) -> &'static [Field] {
        match self {
            Row::Interval => MM_SS,
            _ => SCALAR,
        }
    }

    /// Field focused when edit mode is entered
    pub fn first_field(self) -> Field {
        match self {
            Row::Interval => Field::Minute,
            _ => Field::Value,
        }
    }

    /// Row label; the start/stop row reflects the engine phase
    pub fn label(self, phase: Phase) -> &'static str {
        match self {
            Row::Channel => "CHANNEL",
            Row::Interval => "WAIT",
            Row::Duration => "ACTIVE",
            Row::Intensity => "LEVEL",
            Row::StartStop if phase.is_running() => "RUN",
            Row::StartStop => "STOP",
        }
    }

    /// Current text of one field
    pub fn field_text(self, field: Field, config: &Configuration, readout: &Readout) -> FieldText {
        let mut text = FieldText::new();
        let wait = config.wait();

        let _ = match (self, field) {
            (Row::Channel, _) => write!(text, "{:>3}", config.channel()),
            (Row::Interval, Field::Second) => write!(text, "{:02}", wait.seconds()),
            (Row::Interval, _) => write!(text, "{:02}", wait.minutes()),
            (Row::Duration, _) => write!(text, "{:>2}s", config.active_seconds()),
            (Row::Intensity, _) => write!(text, "{:>3}", config.intensity()),
            (Row::StartStop, _) => write_status(&mut text, readout),
        };

        text
    }

    /// Apply one encoder step to the field being edited
    ///
    /// Returns the fields whose displayed value changed.
    pub fn step(
        self,
        field: Field,
        config: &mut Configuration,
        direction: Direction,
    ) -> &'static [Field] {
        match (self, field) {
            (Row::Channel, _) => {
                config.step_channel(direction);
                SCALAR
            }
            (Row::Interval, Field::Second) => {
                if config.step_wait_seconds(direction) {
                    MM_SS
                } else {
                    SECOND
                }
            }
            (Row::Interval, _) => {
                config.step_wait_minutes(direction);
                MINUTE
            }
            (Row::Duration, _) => {
                config.step_active(direction);
                SCALAR
            }
            (Row::Intensity, _) => {
                config.step_intensity(direction);
                SCALAR
            }
            (Row::StartStop, _) => NONE,
        }
    }
}

fn write_status(text: &mut FieldText, readout: &Readout) -> core::fmt::Result {
    if readout.fault.is_some() {
        return text.write_str("ERR CH");
    }

    let tag = match readout.phase {
        Phase::Idle => return Ok(()),
        Phase::Wait => 'W',
        Phase::Active => 'A',
    };

    // Round up so the readout never shows 00:00 while time remains
    let secs = readout.remaining_ms.unwrap_or(0).div_ceil(1_000).min(59 * 60 + 59);
    write!(text, "{} {:02}:{:02}", tag, secs / 60, secs % 60)
}
