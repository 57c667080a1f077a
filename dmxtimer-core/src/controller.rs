//! Top-level controller
//!
//! Owns the configuration, menu state, sequence engine and render cache,
//! and runs one cooperative loop iteration per [`Controller::poll`]:
//!
//! 1. Input events drive the menu (waking the display first if asleep)
//! 2. The idle timeout may power the display down
//! 3. The engine checks its deadlines and writes a frame if one is due
//! 4. Stale screen regions are repainted
//!
//! Step 3 runs on every call, whatever happened in steps 1-2 and even if
//! the display reported an error.

use heapless::Vec;

use crate::config::{ConfigError, Configuration, SequenceParams, TimerSettings};
use crate::input::{InputSubsystem, Inputs};
use crate::menu::{Command, Field, Menu, Row, UiState};
use crate::render::{Invalidation, RenderCache, View};
use crate::sequence::{Phase, Readout, SequenceEngine, StartError, Transition};
use crate::traits::{DisplaySurface, OutputBus};

use dmxtimer_hal::gpio::InputPin;

/// Error from one of the two external collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControllerError<D, O> {
    /// Display surface failed (drawing, power or flush)
    Display(D),
    /// Output bus write failed
    Output(O),
}

/// Display power change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayPower {
    /// Powered down after the idle timeout
    Sleep,
    /// Powered up by an input event
    Wake,
}

/// What happened during one iteration, for the caller to log
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Report {
    /// Any step or click was processed
    pub input: bool,
    /// Phase changes, in order
    pub transitions: Vec<Transition, 2>,
    /// A start command was rejected
    pub rejected: Option<StartError>,
    /// Display was put to sleep or woken
    pub display: Option<DisplayPower>,
    /// Something was repainted
    pub redrawn: bool,
}

/// The timer application
pub struct Controller {
    settings: TimerSettings,
    config: Configuration,
    menu: Menu,
    engine: SequenceEngine,
    cache: RenderCache,
    /// Error indicator, cleared by the next input event
    fault: Option<StartError>,
    last_input_ms: u64,
    display_on: bool,
}

impl Controller {
    /// Create a controller from validated settings
    pub fn new(settings: TimerSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        let config = settings.initial_configuration()?;

        Ok(Self {
            settings,
            config,
            menu: Menu::new(),
            engine: SequenceEngine::from_settings(&settings),
            cache: RenderCache::new(),
            fault: None,
            last_input_ms: 0,
            display_on: true,
        })
    }

    /// Power the panel and paint the full screen
    pub fn start_up<S: DisplaySurface>(
        &mut self,
        now_ms: u64,
        surface: &mut S,
    ) -> Result<(), S::Error> {
        self.last_input_ms = now_ms;
        self.display_on = true;
        self.cache.apply(Invalidation::Full);

        surface.set_power(true)?;
        let view = self.view(now_ms);
        self.cache.flush(surface, &view)?;
        Ok(())
    }

    pub fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn ui(&self) -> &UiState {
        self.menu.state()
    }

    pub fn phase(&self) -> Phase {
        self.engine.phase()
    }

    pub fn is_display_on(&self) -> bool {
        self.display_on
    }

    /// Engine status including the error indicator
    pub fn readout(&self, now_ms: u64) -> Readout {
        Readout {
            fault: self.fault,
            ..self.engine.readout(now_ms)
        }
    }

    /// Everything the screen shows at `now_ms`
    pub fn view(&self, now_ms: u64) -> View {
        View {
            config: self.config,
            ui: *self.menu.state(),
            readout: self.readout(now_ms),
        }
    }

    /// Start the engine with explicit parameters
    ///
    /// A rejected start raises the error indicator.
    pub fn start(
        &mut self,
        now_ms: u64,
        params: &SequenceParams,
    ) -> Result<Transition, StartError> {
        let result = self.engine.start(now_ms, params);
        if let Err(e) = result {
            self.fault = Some(e);
            self.cache.invalidate_field(Row::StartStop, Field::Value);
        }
        result
    }

    /// Stop the engine; a no-op when idle
    pub fn stop(&mut self, now_ms: u64) -> Option<Transition> {
        self.engine.stop(now_ms)
    }

    /// Sample the input lines and run one iteration
    pub fn iterate<A, B, K, S, O>(
        &mut self,
        now_ms: u64,
        input: &mut InputSubsystem<A, B, K>,
        surface: &mut S,
        bus: &mut O,
    ) -> Result<Report, ControllerError<S::Error, O::Error>>
    where
        A: InputPin,
        B: InputPin,
        K: InputPin,
        S: DisplaySurface,
        O: OutputBus,
    {
        let inputs = input.poll(now_ms);
        self.poll(now_ms, inputs, surface, bus)
    }

    /// Run one iteration with already-sampled inputs
    pub fn poll<S: DisplaySurface, O: OutputBus>(
        &mut self,
        now_ms: u64,
        inputs: Inputs,
        surface: &mut S,
        bus: &mut O,
    ) -> Result<Report, ControllerError<S::Error, O::Error>> {
        let mut report = Report::default();
        let mut display = Ok(());

        if !inputs.is_empty() {
            report.input = true;
            self.last_input_ms = now_ms;

            if !self.display_on {
                self.display_on = true;
                report.display = Some(DisplayPower::Wake);
                display = surface.set_power(true);
                self.cache.apply(Invalidation::Full);
            }

            if self.fault.take().is_some() {
                self.cache.invalidate_field(Row::StartStop, Field::Value);
            }

            for event in inputs.events() {
                let response = self.menu.handle(event, &mut self.config);
                for invalidation in response.invalidations {
                    self.cache.apply(invalidation);
                }
                if let Some(Command::StartStop) = response.command {
                    self.start_stop(now_ms, &mut report);
                }
            }
        }

        if self.display_on && self.idle_timeout_elapsed(now_ms) {
            self.display_on = false;
            report.display = Some(DisplayPower::Sleep);
            display = display.and(surface.set_power(false));
        }

        let params = self.config.sequence_params();
        if let Some(transition) = self.engine.advance(now_ms, &params) {
            let _ = report.transitions.push(transition);
        }
        let output = self.engine.write_frame(now_ms, &params, bus);

        // Stale regions stay marked while the panel is off and go out on wake
        if self.display_on && display.is_ok() {
            let view = self.view(now_ms);
            display = self
                .cache
                .flush(surface, &view)
                .map(|redrawn| report.redrawn = redrawn);
        }

        display.map_err(ControllerError::Display)?;
        output.map_err(ControllerError::Output)?;
        Ok(report)
    }

    fn start_stop(&mut self, now_ms: u64, report: &mut Report) {
        if self.engine.phase().is_running() {
            if let Some(transition) = self.stop(now_ms) {
                let _ = report.transitions.push(transition);
            }
            return;
        }

        let params = self.config.sequence_params();
        match self.start(now_ms, &params) {
            Ok(transition) => {
                let _ = report.transitions.push(transition);
            }
            Err(e) => report.rejected = Some(e),
        }
    }

    fn idle_timeout_elapsed(&self, now_ms: u64) -> bool {
        self.settings
            .idle_timeout_ms()
            .is_some_and(|timeout| now_ms.saturating_sub(self.last_input_ms) >= timeout)
    }
}
