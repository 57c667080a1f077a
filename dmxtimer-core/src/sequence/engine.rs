//! Sequence engine implementation
//!
//! All timing is "compare the monotonic clock to a stored deadline";
//! nothing here sleeps. Call [`SequenceEngine::service`] (or
//! [`SequenceEngine::advance`] followed by [`SequenceEngine::write_frame`])
//! on every loop iteration.

use crate::config::{RepeatMode, SequenceParams, TimerSettings, MAX_CHANNEL};
use crate::traits::OutputBus;

/// Engine phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Output held at 0, no countdown
    Idle,
    /// Output held at 0 until the wait deadline
    Wait,
    /// Output at the configured intensity until the active deadline
    Active,
}

impl Phase {
    /// True in wait or active
    pub fn is_running(self) -> bool {
        !matches!(self, Phase::Idle)
    }
}

/// Why a start command was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartError {
    /// Channel outside 1-512
    InvalidChannel(u16),
}

/// A phase change, for logging and display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    pub from: Phase,
    pub to: Phase,
    pub at_ms: u64,
}

/// Operator-facing engine status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Readout {
    /// Current phase
    pub phase: Phase,
    /// Time left in the current wait/active phase
    pub remaining_ms: Option<u64>,
    /// Error indicator from a rejected start command
    pub fault: Option<StartError>,
}

impl Readout {
    pub const IDLE: Self = Self {
        phase: Phase::Idle,
        remaining_ms: None,
        fault: None,
    };
}

fn is_valid_channel(channel: u16) -> bool {
    (1..=MAX_CHANNEL).contains(&channel)
}

/// Idle / wait / active state machine with cadence-gated output
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SequenceEngine {
    phase: Phase,
    /// Channel latched at start; also the target of the last write
    channel: u16,
    wait_deadline_ms: u64,
    active_deadline_ms: u64,
    repeat: RepeatMode,
    frame_interval_ms: u64,
    last_frame_ms: Option<u64>,
    /// Set on every phase change so the new value goes out immediately
    frame_forced: bool,
}

impl SequenceEngine {
    /// Create an idle engine
    pub fn new(frame_interval_ms: u64, repeat: RepeatMode) -> Self {
        Self {
            phase: Phase::Idle,
            channel: 1,
            wait_deadline_ms: 0,
            active_deadline_ms: 0,
            repeat,
            frame_interval_ms,
            last_frame_ms: None,
            frame_forced: false,
        }
    }

    /// Create an idle engine with the cadence and repeat mode from settings
    pub fn from_settings(settings: &TimerSettings) -> Self {
        Self::new(settings.frame_interval_ms(), settings.repeat)
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Channel being driven (latched while running)
    pub fn channel(&self) -> u16 {
        self.channel
    }

    /// Start a cycle
    ///
    /// A zero wait interval enters the active phase on this call.
    /// Starting while already running restarts the cycle from `now_ms`.
    pub fn start(
        &mut self,
        now_ms: u64,
        params: &SequenceParams,
    ) -> Result<Transition, StartError> {
        if !is_valid_channel(params.channel) {
            return Err(StartError::InvalidChannel(params.channel));
        }

        self.channel = params.channel;

        let next = if params.wait_ms == 0 {
            self.active_deadline_ms = now_ms + params.active_ms as u64;
            Phase::Active
        } else {
            self.wait_deadline_ms = now_ms + params.wait_ms as u64;
            Phase::Wait
        };

        Ok(self.enter(next, now_ms))
    }

    /// Stop and return to idle; a no-op when already idle
    pub fn stop(&mut self, now_ms: u64) -> Option<Transition> {
        if self.phase == Phase::Idle {
            return None;
        }
        Some(self.enter(Phase::Idle, now_ms))
    }

    /// Check deadlines and perform at most one phase change
    ///
    /// Durations are taken from `params` at the moment of the change, so
    /// interval and duration edits made mid-cycle apply to the next phase.
    pub fn advance(&mut self, now_ms: u64, params: &SequenceParams) -> Option<Transition> {
        match self.phase {
            Phase::Wait if now_ms >= self.wait_deadline_ms => {
                self.active_deadline_ms = now_ms + params.active_ms as u64;
                Some(self.enter(Phase::Active, now_ms))
            }
            Phase::Active if now_ms >= self.active_deadline_ms => match self.repeat {
                RepeatMode::Continuous => {
                    self.wait_deadline_ms = now_ms + params.wait_ms as u64;
                    Some(self.enter(Phase::Wait, now_ms))
                }
                RepeatMode::Once => Some(self.enter(Phase::Idle, now_ms)),
            },
            _ => None,
        }
    }

    /// Value the channel should carry right now
    pub fn output_value(&self, params: &SequenceParams) -> u8 {
        match self.phase {
            Phase::Active => params.intensity,
            Phase::Idle | Phase::Wait => 0,
        }
    }

    /// Whether a write is due at `now_ms`
    pub fn frame_due(&self, now_ms: u64) -> bool {
        if self.frame_forced {
            return true;
        }
        match self.last_frame_ms {
            Some(last) => now_ms.saturating_sub(last) >= self.frame_interval_ms,
            None => true,
        }
    }

    /// Write the current value if the cadence gate allows it
    ///
    /// Returns the `(channel, value)` written, if any.
    pub fn write_frame<O: OutputBus>(
        &mut self,
        now_ms: u64,
        params: &SequenceParams,
        bus: &mut O,
    ) -> Result<Option<(u16, u8)>, O::Error> {
        if !self.frame_due(now_ms) {
            return Ok(None);
        }

        // While idle, follow the configured channel, except for the first
        // frame after a stop which must zero the channel that was lit.
        let channel = match self.phase {
            Phase::Idle if !self.frame_forced && is_valid_channel(params.channel) => {
                params.channel
            }
            _ => self.channel,
        };
        let value = self.output_value(params);

        self.channel = channel;
        self.last_frame_ms = Some(now_ms);
        self.frame_forced = false;

        bus.write(channel, value)?;
        Ok(Some((channel, value)))
    }

    /// One service tick: phase check, then the cadence-gated write
    pub fn service<O: OutputBus>(
        &mut self,
        now_ms: u64,
        params: &SequenceParams,
        bus: &mut O,
    ) -> Result<Option<Transition>, O::Error> {
        let transition = self.advance(now_ms, params);
        self.write_frame(now_ms, params, bus)?;
        Ok(transition)
    }

    /// Status for the display
    pub fn readout(&self, now_ms: u64) -> Readout {
        let remaining_ms = match self.phase {
            Phase::Idle => None,
            Phase::Wait => Some(self.wait_deadline_ms.saturating_sub(now_ms)),
            Phase::Active => Some(self.active_deadline_ms.saturating_sub(now_ms)),
        };

        Readout {
            phase: self.phase,
            remaining_ms,
            fault: None,
        }
    }

    fn enter(&mut self, next: Phase, now_ms: u64) -> Transition {
        let from = self.phase;
        self.phase = next;
        self.frame_forced = true;
        Transition {
            from,
            to: next,
            at_ms: now_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct LastWrite(Option<(u16, u8)>, usize);

    impl OutputBus for LastWrite {
        type Error = ();

        fn write(&mut self, channel: u16, value: u8) -> Result<(), ()> {
            self.0 = Some((channel, value));
            self.1 += 1;
            Ok(())
        }
    }

    fn params(channel: u16, wait_ms: u32, active_ms: u32, intensity: u8) -> SequenceParams {
        SequenceParams {
            channel,
            wait_ms,
            active_ms,
            intensity,
        }
    }

    #[test]
    fn test_engine_creation() {
        let engine = SequenceEngine::new(33, RepeatMode::Continuous);
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(engine.readout(0), Readout::IDLE);
    }

    #[test]
    fn test_zero_wait_starts_active() {
        let mut engine = SequenceEngine::new(33, RepeatMode::Continuous);
        let p = params(1, 0, 2_000, 255);

        let t = engine.start(100, &p).unwrap();
        assert_eq!(t.to, Phase::Active);
        assert_eq!(engine.readout(100).remaining_ms, Some(2_000));
    }

    #[test]
    fn test_invalid_channel_rejected() {
        let mut engine = SequenceEngine::new(33, RepeatMode::Continuous);

        assert_eq!(
            engine.start(0, &params(0, 1_000, 1_000, 255)),
            Err(StartError::InvalidChannel(0))
        );
        assert_eq!(
            engine.start(0, &params(513, 1_000, 1_000, 255)),
            Err(StartError::InvalidChannel(513))
        );
        assert_eq!(engine.phase(), Phase::Idle);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut engine = SequenceEngine::new(33, RepeatMode::Continuous);
        engine.start(0, &params(1, 1_000, 1_000, 255)).unwrap();

        assert!(engine.stop(10).is_some());
        assert_eq!(engine.phase(), Phase::Idle);
        assert!(engine.stop(20).is_none());
    }

    #[test]
    fn test_cadence_gate() {
        let mut engine = SequenceEngine::new(33, RepeatMode::Continuous);
        let p = params(5, 1_000, 1_000, 255);
        let mut bus = LastWrite(None, 0);

        engine.write_frame(0, &p, &mut bus).unwrap();
        assert_eq!(bus.1, 1);

        // Gate closed until 33 ms have passed
        for t in 1..33 {
            assert_eq!(engine.write_frame(t, &p, &mut bus), Ok(None));
        }
        assert_eq!(engine.write_frame(33, &p, &mut bus), Ok(Some((5, 0))));
        assert_eq!(bus.1, 2);
    }

    #[test]
    fn test_phase_change_forces_frame() {
        let mut engine = SequenceEngine::new(33, RepeatMode::Continuous);
        let p = params(7, 0, 1_000, 128);
        let mut bus = LastWrite(None, 0);

        engine.write_frame(0, &p, &mut bus).unwrap();
        engine.start(5, &p).unwrap();

        // Inside the cadence window, but the start forces a write
        assert_eq!(engine.write_frame(5, &p, &mut bus), Ok(Some((7, 128))));
    }

    #[test]
    fn test_once_mode_returns_to_idle() {
        let mut engine = SequenceEngine::new(33, RepeatMode::Once);
        let p = params(1, 1_000, 500, 255);

        engine.start(0, &p).unwrap();
        assert_eq!(engine.advance(1_000, &p).map(|t| t.to), Some(Phase::Active));
        assert_eq!(engine.advance(1_500, &p).map(|t| t.to), Some(Phase::Idle));
        assert_eq!(engine.advance(5_000, &p), None);
    }

    #[test]
    fn test_channel_latched_while_running() {
        let mut engine = SequenceEngine::new(33, RepeatMode::Continuous);
        let mut bus = LastWrite(None, 0);

        engine.start(0, &params(3, 0, 5_000, 200)).unwrap();
        engine.write_frame(0, &params(3, 0, 5_000, 200), &mut bus).unwrap();

        // Operator moves the channel mid-cycle
        let edited = params(9, 0, 5_000, 200);
        engine.write_frame(40, &edited, &mut bus).unwrap();
        assert_eq!(bus.0, Some((3, 200)));

        // Stop zeroes the latched channel first, then follows the edit
        engine.stop(50);
        engine.write_frame(50, &edited, &mut bus).unwrap();
        assert_eq!(bus.0, Some((3, 0)));
        engine.write_frame(90, &edited, &mut bus).unwrap();
        assert_eq!(bus.0, Some((9, 0)));
    }
}
