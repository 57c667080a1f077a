//! Input subsystem
//!
//! Samples the encoder and button lines once per loop iteration and turns
//! them into [`Inputs`]. Nothing in here waits: release detection and the
//! debounce window are both evaluated against the current sample and the
//! monotonic clock.

pub mod button;
pub mod encoder;

use dmxtimer_hal::gpio::{ActiveLevel, InputPin};

pub use button::Debouncer;
pub use encoder::QuadratureDecoder;

/// Encoder rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// One detent clockwise (+1)
    Clockwise,
    /// One detent counter-clockwise (-1)
    CounterClockwise,
}

impl Direction {
    /// Signed step: +1 or -1
    pub fn delta(self) -> i8 {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }
}

/// Discrete input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputEvent {
    /// Encoder moved one detent
    Step(Direction),
    /// Button pressed (one event per physical press)
    Click,
}

/// Everything the input lines produced in one iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Inputs {
    /// Encoder step, if any
    pub step: Option<Direction>,
    /// Button click accepted this iteration
    pub click: bool,
}

impl Inputs {
    /// No input this iteration
    pub const NONE: Self = Self {
        step: None,
        click: false,
    };

    /// A single encoder step
    pub const fn step(direction: Direction) -> Self {
        Self {
            step: Some(direction),
            click: false,
        }
    }

    /// A single click
    pub const fn click() -> Self {
        Self {
            step: None,
            click: true,
        }
    }

    /// True if neither a step nor a click occurred
    pub fn is_empty(&self) -> bool {
        self.step.is_none() && !self.click
    }

    /// Events in processing order: rotation before click
    pub fn events(&self) -> impl Iterator<Item = InputEvent> {
        self.step
            .map(InputEvent::Step)
            .into_iter()
            .chain(self.click.then_some(InputEvent::Click))
    }
}

/// Encoder + push-button front end
///
/// Owns the three input lines and polls them without blocking.
pub struct InputSubsystem<A, B, K> {
    phase_a: A,
    phase_b: B,
    button: K,
    button_level: ActiveLevel,
    decoder: QuadratureDecoder,
    debouncer: Debouncer,
}

impl<A, B, K> InputSubsystem<A, B, K>
where
    A: InputPin,
    B: InputPin,
    K: InputPin,
{
    /// Create the input subsystem
    ///
    /// The button is treated as active-low (pull-up wiring).
    pub fn new(phase_a: A, phase_b: B, button: K, debounce_ms: u16) -> Self {
        let decoder = QuadratureDecoder::new(phase_a.is_high());
        Self {
            phase_a,
            phase_b,
            button,
            button_level: ActiveLevel::Low,
            decoder,
            debouncer: Debouncer::new(debounce_ms),
        }
    }

    /// Sample the encoder: `Some` on a rising edge of phase A
    pub fn poll_encoder(&mut self) -> Option<Direction> {
        self.decoder
            .update(self.phase_a.is_high(), self.phase_b.is_high())
    }

    /// Sample the button: `true` once per accepted press
    pub fn poll_button(&mut self, now_ms: u64) -> bool {
        let active = self.button_level.is_active(&self.button);
        self.debouncer.update(active, now_ms)
    }

    /// Sample all lines
    pub fn poll(&mut self, now_ms: u64) -> Inputs {
        Inputs {
            step: self.poll_encoder(),
            click: self.poll_button(now_ms),
        }
    }
}
