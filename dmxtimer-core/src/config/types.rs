//! Configuration model
//!
//! Every field is a [`Bounded`] value, so an out-of-range channel,
//! interval or intensity cannot be represented at all.

use crate::input::Direction;

use super::settings::{ConfigError, Defaults};

/// Highest addressable DMX512 slot
pub const MAX_CHANNEL: u16 = 512;

/// Integer constrained to `LO..=HI`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Bounded<const LO: u16, const HI: u16>(u16);

impl<const LO: u16, const HI: u16> Bounded<LO, HI> {
    /// Lowest allowed value
    pub const LOWER: u16 = LO;
    /// Highest allowed value
    pub const UPPER: u16 = HI;

    /// Create a value, or `None` if it is outside `LO..=HI`
    pub const fn new(value: u16) -> Option<Self> {
        if value >= LO && value <= HI {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Get the raw value
    pub const fn get(self) -> u16 {
        self.0
    }

    /// Move one unit in `direction`, wrapping at either boundary
    ///
    /// Returns `true` if the value wrapped around.
    pub fn wrapping_step(&mut self, direction: Direction) -> bool {
        match direction {
            Direction::Clockwise if self.0 >= HI => {
                self.0 = LO;
                true
            }
            Direction::Clockwise => {
                self.0 += 1;
                false
            }
            Direction::CounterClockwise if self.0 <= LO => {
                self.0 = HI;
                true
            }
            Direction::CounterClockwise => {
                self.0 -= 1;
                false
            }
        }
    }
}

/// Output slot on the DMX universe (1-512)
pub type Channel = Bounded<1, MAX_CHANNEL>;
/// Minutes of the wait interval (0-59)
pub type Minutes = Bounded<0, 59>;
/// Seconds of the wait interval or active duration (0-59)
pub type Seconds = Bounded<0, 59>;
/// Output level during the active phase (1-255)
pub type Intensity = Bounded<1, 255>;

/// Wait interval as a carry-chained MM:SS pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WaitInterval {
    minutes: Minutes,
    seconds: Seconds,
}

impl WaitInterval {
    /// Create an interval from validated parts
    pub const fn new(minutes: Minutes, seconds: Seconds) -> Self {
        Self { minutes, seconds }
    }

    /// Minutes part
    pub fn minutes(&self) -> u8 {
        self.minutes.get() as u8
    }

    /// Seconds part
    pub fn seconds(&self) -> u8 {
        self.seconds.get() as u8
    }

    /// Step the minutes independently, wrapping 59 <-> 0
    pub fn step_minutes(&mut self, direction: Direction) {
        self.minutes.wrapping_step(direction);
    }

    /// Step the seconds, carrying into (or borrowing from) the minutes
    ///
    /// Returns `true` if the minutes changed as well.
    pub fn step_seconds(&mut self, direction: Direction) -> bool {
        let wrapped = self.seconds.wrapping_step(direction);
        if wrapped {
            self.minutes.wrapping_step(direction);
        }
        wrapped
    }

    /// Total length in milliseconds
    pub fn as_millis(&self) -> u32 {
        self.minutes.get() as u32 * 60_000 + self.seconds.get() as u32 * 1_000
    }
}

/// Snapshot of the values the sequence engine runs from
///
/// Built from the live [`Configuration`] on every service call so edits
/// made mid-cycle reach the engine at the next phase boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SequenceParams {
    /// Target slot (validated again by the engine on start)
    pub channel: u16,
    /// Length of the wait phase
    pub wait_ms: u32,
    /// Length of the active phase
    pub active_ms: u32,
    /// Level written during the active phase
    pub intensity: u8,
}

/// Operator configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Configuration {
    channel: Channel,
    wait: WaitInterval,
    active: Seconds,
    intensity: Intensity,
}

impl Configuration {
    /// Create a configuration from validated fields
    pub const fn new(
        channel: Channel,
        wait: WaitInterval,
        active: Seconds,
        intensity: Intensity,
    ) -> Self {
        Self {
            channel,
            wait,
            active,
            intensity,
        }
    }

    /// Target channel
    pub fn channel(&self) -> u16 {
        self.channel.get()
    }

    /// Wait interval
    pub fn wait(&self) -> WaitInterval {
        self.wait
    }

    /// Active duration in seconds
    pub fn active_seconds(&self) -> u8 {
        self.active.get() as u8
    }

    /// Active-phase output level
    pub fn intensity(&self) -> u8 {
        self.intensity.get() as u8
    }

    pub fn step_channel(&mut self, direction: Direction) {
        self.channel.wrapping_step(direction);
    }

    pub fn step_wait_minutes(&mut self, direction: Direction) {
        self.wait.step_minutes(direction);
    }

    /// Returns `true` if the step carried into the minutes
    pub fn step_wait_seconds(&mut self, direction: Direction) -> bool {
        self.wait.step_seconds(direction)
    }

    pub fn step_active(&mut self, direction: Direction) {
        self.active.wrapping_step(direction);
    }

    pub fn step_intensity(&mut self, direction: Direction) {
        self.intensity.wrapping_step(direction);
    }

    /// Parameters for the sequence engine
    pub fn sequence_params(&self) -> SequenceParams {
        SequenceParams {
            channel: self.channel.get(),
            wait_ms: self.wait.as_millis(),
            active_ms: self.active.get() as u32 * 1_000,
            intensity: self.intensity.get() as u8,
        }
    }
}

impl Default for Configuration {
    /// Matches [`Defaults::new`]
    fn default() -> Self {
        Self {
            channel: Bounded(1),
            wait: WaitInterval::new(Bounded(0), Bounded(5)),
            active: Bounded(3),
            intensity: Bounded(255),
        }
    }
}

impl TryFrom<&Defaults> for Configuration {
    type Error = ConfigError;

    fn try_from(defaults: &Defaults) -> Result<Self, Self::Error> {
        let channel = Channel::new(defaults.channel).ok_or(ConfigError::ChannelOutOfRange)?;
        let minutes =
            Minutes::new(defaults.wait_minutes as u16).ok_or(ConfigError::MinutesOutOfRange)?;
        let seconds =
            Seconds::new(defaults.wait_seconds as u16).ok_or(ConfigError::SecondsOutOfRange)?;
        let active =
            Seconds::new(defaults.active_seconds as u16).ok_or(ConfigError::DurationOutOfRange)?;
        let intensity =
            Intensity::new(defaults.intensity as u16).ok_or(ConfigError::IntensityOutOfRange)?;

        Ok(Self::new(
            channel,
            WaitInterval::new(minutes, seconds),
            active,
            intensity,
        ))
    }
}
