//! Device tunables and power-on defaults
//!
//! The firmware compiles these in from `timer.toml`; the build script
//! deserializes the file into [`TimerSettings`] and rejects it unless
//! [`TimerSettings::validate`] passes.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::types::{Channel, Configuration, Intensity, Minutes, Seconds};

/// Minimum quiet time between accepted button clicks
pub const DEFAULT_DEBOUNCE_MS: u16 = 180;

/// Inactivity before the display is powered down
pub const DEFAULT_IDLE_TIMEOUT_S: u16 = 60;

/// Output refresh rate
pub const DEFAULT_FRAME_RATE_HZ: u8 = 30;

/// Accepted debounce window range (ms)
pub const DEBOUNCE_RANGE_MS: (u16, u16) = (10, 1000);

/// Accepted refresh rate range (Hz). DMX512 tops out near 44 Hz for a
/// full universe.
pub const FRAME_RATE_RANGE_HZ: (u8, u8) = (1, 44);

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Channel outside 1-512
    ChannelOutOfRange,
    /// Wait minutes outside 0-59
    MinutesOutOfRange,
    /// Wait seconds outside 0-59
    SecondsOutOfRange,
    /// Active duration outside 0-59
    DurationOutOfRange,
    /// Intensity outside 1-255
    IntensityOutOfRange,
    /// Frame rate outside [`FRAME_RATE_RANGE_HZ`]
    FrameRateOutOfRange,
    /// Debounce window outside [`DEBOUNCE_RANGE_MS`]
    DebounceOutOfRange,
}

/// What happens when an active phase ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RepeatMode {
    /// Cycle wait/active until stopped
    #[default]
    Continuous,
    /// Return to idle after the first active phase
    Once,
}

/// Power-on values of the operator configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct Defaults {
    pub channel: u16,
    pub wait_minutes: u8,
    pub wait_seconds: u8,
    pub active_seconds: u8,
    pub intensity: u8,
}

impl Defaults {
    pub const fn new() -> Self {
        Self {
            channel: 1,
            wait_minutes: 0,
            wait_seconds: 5,
            active_seconds: 3,
            intensity: 255,
        }
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self::new()
    }
}

/// Device tunables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct TimerSettings {
    /// Power-on operator configuration
    pub defaults: Defaults,
    /// Button debounce quiet interval (ms)
    pub debounce_ms: u16,
    /// Display sleep after this many seconds without input (0 = never)
    pub idle_timeout_s: u16,
    /// Output writes per second
    pub frame_rate_hz: u8,
    /// Continuous cycling or a single wait/active pass
    pub repeat: RepeatMode,
}

impl TimerSettings {
    pub const fn new() -> Self {
        Self {
            defaults: Defaults::new(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            idle_timeout_s: DEFAULT_IDLE_TIMEOUT_S,
            frame_rate_hz: DEFAULT_FRAME_RATE_HZ,
            repeat: RepeatMode::Continuous,
        }
    }

    /// Check every field against its allowed range
    pub fn validate(&self) -> Result<(), ConfigError> {
        let d = &self.defaults;
        Channel::new(d.channel).ok_or(ConfigError::ChannelOutOfRange)?;
        Minutes::new(d.wait_minutes as u16).ok_or(ConfigError::MinutesOutOfRange)?;
        Seconds::new(d.wait_seconds as u16).ok_or(ConfigError::SecondsOutOfRange)?;
        Seconds::new(d.active_seconds as u16).ok_or(ConfigError::DurationOutOfRange)?;
        Intensity::new(d.intensity as u16).ok_or(ConfigError::IntensityOutOfRange)?;

        let (lo, hi) = FRAME_RATE_RANGE_HZ;
        if !(lo..=hi).contains(&self.frame_rate_hz) {
            return Err(ConfigError::FrameRateOutOfRange);
        }

        let (lo, hi) = DEBOUNCE_RANGE_MS;
        if !(lo..=hi).contains(&self.debounce_ms) {
            return Err(ConfigError::DebounceOutOfRange);
        }

        Ok(())
    }

    /// Operator configuration to start from at power-on
    pub fn initial_configuration(&self) -> Result<Configuration, ConfigError> {
        Configuration::try_from(&self.defaults)
    }

    /// Minimum spacing between output writes
    ///
    /// Rounded down so the effective rate never falls below
    /// `frame_rate_hz` (33 ms for 30 Hz).
    pub fn frame_interval_ms(&self) -> u64 {
        1000 / self.frame_rate_hz.max(1) as u64
    }

    /// Display idle timeout, `None` if sleeping is disabled
    pub fn idle_timeout_ms(&self) -> Option<u64> {
        match self.idle_timeout_s {
            0 => None,
            s => Some(s as u64 * 1000),
        }
    }
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self::new()
    }
}
