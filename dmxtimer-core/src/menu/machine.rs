//! Navigate / edit state machine
//!
//! Every input event is a pure function of the current [`UiState`] and
//! the event. The result says which regions of the screen went stale
//! and whether the engine should be started or stopped.

use heapless::Vec;

use crate::config::Configuration;
use crate::input::{Direction, InputEvent};
use crate::render::Invalidation;

use super::rows::{Field, Row};

/// Menu mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Encoder moves the row selection
    Navigate,
    /// Encoder changes the selected row's value
    Edit,
}

/// Selection and edit focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UiState {
    pub mode: Mode,
    pub selected: Row,
    /// Only meaningful in [`Mode::Edit`]
    pub edit_field: Field,
}

impl UiState {
    pub const fn new() -> Self {
        Self {
            mode: Mode::Navigate,
            selected: Row::Channel,
            edit_field: Field::Value,
        }
    }

    /// The field carrying the focus outline, if editing
    pub fn focus(&self) -> Option<(Row, Field)> {
        match self.mode {
            Mode::Edit => Some((self.selected, self.edit_field)),
            Mode::Navigate => None,
        }
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

/// Commands for the sequence engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Start when idle, stop when running
    StartStop,
}

/// Outcome of one input event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    /// Screen regions that must be repainted
    pub invalidations: Vec<Invalidation, 4>,
    /// Engine command, if the event issued one
    pub command: Option<Command>,
}

impl Response {
    fn invalidate(&mut self, invalidation: Invalidation) {
        // Capacity covers the largest event (row move or sub-field carry)
        let _ = self.invalidations.push(invalidation);
    }
}

/// Configuration menu
#[derive(Debug, Clone, Default)]
pub struct Menu {
    state: UiState,
}

impl Menu {
    pub const fn new() -> Self {
        Self {
            state: UiState::new(),
        }
    }

    /// Current UI state
    pub fn state(&self) -> &UiState {
        &self.state
    }

    /// Process one input event, mutating `config` if a value is edited
    pub fn handle(&mut self, event: InputEvent, config: &mut Configuration) -> Response {
        use InputEvent::*;
        use Mode::*;

        let mut response = Response::default();
        let row = self.state.selected;

        match (self.state.mode, event) {
            (Navigate, Step(direction)) => {
                let next = Self::neighbour(row, direction);
                if next != row {
                    self.state.selected = next;
                    response.invalidate(Invalidation::Row(row));
                    response.invalidate(Invalidation::Row(next));
                }
            }

            (Navigate, Click) if row.is_editable() => {
                self.state.mode = Edit;
                self.state.edit_field = row.first_field();
                response.invalidate(Invalidation::Row(row));
            }

            (Navigate, Click) => {
                response.command = Some(Command::StartStop);
            }

            (Edit, Step(direction)) => {
                for field in row.step(self.state.edit_field, config, direction) {
                    response.invalidate(Invalidation::Field(row, *field));
                }
            }

            (Edit, Click) => {
                let current = self.state.edit_field;
                match Self::next_field(row, current) {
                    // Move the outline to the next sub-field
                    Some(next) => {
                        self.state.edit_field = next;
                        response.invalidate(Invalidation::Field(row, current));
                        response.invalidate(Invalidation::Field(row, next));
                    }
                    None => {
                        self.state.mode = Navigate;
                        response.invalidate(Invalidation::Row(row));
                    }
                }
            }
        }

        response
    }

    /// Adjacent row, clamped at both ends
    fn neighbour(row: Row, direction: Direction) -> Row {
        let index = match direction {
            Direction::Clockwise => (row.index() + 1).min(Row::LAST),
            Direction::CounterClockwise => row.index().saturating_sub(1),
        };
        Row::from_index(index).unwrap_or(row)
    }

    fn next_field(row: Row, field: Field) -> Option<Field> {
        let fields = row.fields();
        let position = fields.iter().position(|f| *f == field)?;
        fields.get(position + 1).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CW: InputEvent = InputEvent::Step(Direction::Clockwise);
    const CCW: InputEvent = InputEvent::Step(Direction::CounterClockwise);
    const CLICK: InputEvent = InputEvent::Click;

    fn select(menu: &mut Menu, config: &mut Configuration, row: Row) {
        for _ in 0..row.index() {
            menu.handle(CW, config);
        }
    }

    #[test]
    fn test_navigate_clamps() {
        let mut menu = Menu::new();
        let mut config = Configuration::default();

        let response = menu.handle(CCW, &mut config);
        assert_eq!(menu.state().selected, Row::Channel);
        assert!(response.invalidations.is_empty());

        for _ in 0..10 {
            menu.handle(CW, &mut config);
        }
        assert_eq!(menu.state().selected, Row::StartStop);
    }

    #[test]
    fn test_navigate_invalidates_both_rows() {
        let mut menu = Menu::new();
        let mut config = Configuration::default();

        let response = menu.handle(CW, &mut config);
        assert_eq!(
            response.invalidations.as_slice(),
            &[
                Invalidation::Row(Row::Channel),
                Invalidation::Row(Row::Interval)
            ]
        );
    }

    #[test]
    fn test_edit_scalar_row() {
        let mut menu = Menu::new();
        let mut config = Configuration::default();

        menu.handle(CLICK, &mut config);
        assert_eq!(menu.state().focus(), Some((Row::Channel, Field::Value)));

        let response = menu.handle(CCW, &mut config);
        assert_eq!(config.channel(), 512);
        assert_eq!(
            response.invalidations.as_slice(),
            &[Invalidation::Field(Row::Channel, Field::Value)]
        );

        menu.handle(CLICK, &mut config);
        assert_eq!(menu.state().mode, Mode::Navigate);
        assert_eq!(menu.state().focus(), None);
    }

    #[test]
    fn test_interval_sub_fields() {
        let mut menu = Menu::new();
        let mut config = Configuration::default();
        select(&mut menu, &mut config, Row::Interval);

        menu.handle(CLICK, &mut config);
        assert_eq!(menu.state().focus(), Some((Row::Interval, Field::Minute)));

        menu.handle(CW, &mut config);
        assert_eq!(config.wait().minutes(), 1);

        let response = menu.handle(CLICK, &mut config);
        assert_eq!(menu.state().focus(), Some((Row::Interval, Field::Second)));
        assert_eq!(response.invalidations.len(), 2);

        menu.handle(CCW, &mut config);
        assert_eq!((config.wait().minutes(), config.wait().seconds()), (1, 4));

        menu.handle(CLICK, &mut config);
        assert_eq!(menu.state().mode, Mode::Navigate);
        assert_eq!(menu.state().selected, Row::Interval);
    }

    #[test]
    fn test_start_stop_click_issues_command() {
        let mut menu = Menu::new();
        let mut config = Configuration::default();
        select(&mut menu, &mut config, Row::StartStop);

        let response = menu.handle(CLICK, &mut config);
        assert_eq!(response.command, Some(Command::StartStop));
        assert_eq!(menu.state().mode, Mode::Navigate);
        assert_eq!(config, Configuration::default());
    }
}
