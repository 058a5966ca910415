//! The session state machine sequencing the whole device.

use heapless::Vec;
use pluck_dsp::detector::Detection;

use crate::config::Config;
use crate::controller::{Controller, Verdict};
use crate::input::{Press, Snapshot, Store as Input};
use crate::log;
use crate::output::{
    ActuatorCommand, AutoTuneView, DesiredOutput, Screen, SettingsView, StandbyView,
    StatisticsView, TuningView,
};
use crate::profile::{PROFILES, STRING_COUNT, STRING_NAMES};
use crate::resolver::{resolve, SelectionMode};
use crate::sequence::AutoTuneSequence;
use crate::statistics::Statistics;

/// Success is celebrated on screen this long before the session advances.
const SUCCESS_DISPLAY_MS: u32 = 3000;

/// The top-level sequencer owning all mutable device state.
///
/// The binding feeds it one [`Snapshot`] per tick, optionally one
/// [`Detection`] while it wants one, and collects the [`DesiredOutput`]
/// from [`Store::tick`]. There is no other mutable state in the core.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Store {
    state: State,
    input: Input,
    config: Config,
    profile_index: usize,
    selection: SelectionMode,
    controller: Controller,
    statistics: Statistics,
    celebrating: Option<u32>,
    tune_started_at: Option<u32>,
    now: u32,
    live: LiveView,
    actuator: Vec<ActuatorCommand, 4>,
    fault: bool,
}

/// The current session mode. Transitions are driven by button events
/// only; every (state, event) pair is either handled or an explicit
/// no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum State {
    Off,
    Standby,
    Tuning,
    AutoTuneAll(AutoTuneSequence),
    StringSelect,
    ModeSelect,
    Statistics,
    Settings,
}

/// Last detection and resolution, kept for the display.
#[derive(Debug, Default, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
struct LiveView {
    frequency: f32,
    signal_level: f32,
    note: Option<&'static str>,
    string: Option<usize>,
    cents: i32,
}

#[allow(clippy::new_without_default)]
impl Store {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: State::Standby,
            input: Input::default(),
            config: Config::default(),
            profile_index: 0,
            selection: SelectionMode::Auto,
            controller: Controller::default(),
            statistics: Statistics::default(),
            celebrating: None,
            tune_started_at: None,
            now: 0,
            live: LiveView::default(),
            actuator: Vec::new(),
            fault: false,
        }
    }

    #[must_use]
    pub fn config(&self) -> Config {
        self.config
    }

    pub fn set_config(&mut self, config: Config) {
        self.config = config;
        self.controller.set_attributes(config.controller_attributes());
    }

    #[must_use]
    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    #[must_use]
    pub fn selection(&self) -> SelectionMode {
        self.selection
    }

    /// Latches the startup fault raised when the sample buffers could
    /// not be allocated. The device then refuses every tuning state and
    /// pins the display on the failure screen.
    pub fn report_allocation_failure(&mut self) {
        self.fault = true;
    }

    pub fn apply_input_snapshot(&mut self, snapshot: Snapshot) {
        self.now = snapshot.now_ms;
        let events = self.input.update(snapshot);
        if let Some(press) = events.toggle {
            self.on_toggle(press);
        }
        if let Some(press) = events.string {
            self.on_string(press);
        }
        if let Some(press) = events.mode {
            self.on_mode(press);
        }
    }

    /// Whether the binding should acquire and detect this tick.
    #[must_use]
    pub fn wants_detection(&self) -> bool {
        !self.fault && self.celebrating.is_none() && self.is_active()
    }

    pub fn apply_detection(&mut self, detection: Detection) {
        if !self.wants_detection() {
            return;
        }

        let pinned = match self.state {
            State::AutoTuneAll(sequence) => Some(sequence.current()),
            _ => None,
        };
        let resolution = resolve(
            detection.smoothed,
            &PROFILES[self.profile_index],
            self.selection,
            pinned,
        );
        self.live = LiveView {
            frequency: detection.smoothed,
            signal_level: detection.signal_level,
            note: resolution.note,
            string: resolution.string,
            cents: resolution.cents,
        };

        // A noise-gated tick reports frequency 0.0 while the smoothed
        // history may still be populated; it is display-only and must
        // never reach the controller.
        if detection.frequency <= 0.0 || resolution.string.is_none() {
            return;
        }
        match self.controller.update(resolution.cents, self.now) {
            Verdict::Move(position) => self.push_actuator(ActuatorCommand::MoveTo(position)),
            Verdict::InTune => self.on_in_tune(),
            Verdict::Idle => (),
        }
    }

    pub fn tick(&mut self) -> DesiredOutput {
        self.converge_celebration();
        self.converge_timeout();
        DesiredOutput {
            screen: self.screen(),
            actuator: core::mem::take(&mut self.actuator),
        }
    }

    fn on_toggle(&mut self, press: Press) {
        match (self.state, press) {
            (State::Off, _) => self.power_on(),
            (_, Press::VeryLong) => self.power_off(),
            (State::Standby, Press::Short) => self.start_tuning(false),
            (State::Standby, Press::Long) => self.start_tuning(true),
            (State::Tuning | State::AutoTuneAll(_), _) => {
                self.stop_active();
                self.state = State::Standby;
                log::info!("Tuning stopped");
            }
            _ => self.state = State::Standby,
        }
    }

    fn on_string(&mut self, press: Press) {
        // Only the toggle button owns a very-long action.
        let press = if press == Press::VeryLong {
            Press::Long
        } else {
            press
        };
        match (self.state, press) {
            (State::Off, _) | (State::StringSelect, Press::Long) => (),
            (State::Statistics | State::Settings, _) => self.state = State::Standby,
            (State::StringSelect, _) => {
                self.selection = self.selection.advanced();
                if self.selection == SelectionMode::Auto {
                    self.state = State::Standby;
                    log::info!("String selection complete");
                }
            }
            (State::Standby, Press::Short) => self.state = State::StringSelect,
            (State::Standby, _) => self.state = State::Statistics,
            (State::Tuning | State::AutoTuneAll(_), Press::Short) => {
                self.stop_active();
                self.state = State::StringSelect;
            }
            (State::Tuning | State::AutoTuneAll(_), _) => {
                self.stop_active();
                self.state = State::Statistics;
            }
            (State::ModeSelect, _) => self.state = State::StringSelect,
        }
    }

    fn on_mode(&mut self, press: Press) {
        let press = if press == Press::VeryLong {
            Press::Long
        } else {
            press
        };
        match (self.state, press) {
            (State::Off, _) => (),
            (State::Statistics | State::Settings, _) => self.state = State::Standby,
            (State::ModeSelect, _) => {
                self.profile_index = (self.profile_index + 1) % PROFILES.len();
                log::info!("Tuning mode changed");
            }
            (State::Standby | State::StringSelect, Press::Short) => self.state = State::ModeSelect,
            (State::Standby | State::StringSelect, _) => self.state = State::Settings,
            (State::Tuning | State::AutoTuneAll(_), Press::Short) => {
                self.stop_active();
                self.state = State::ModeSelect;
            }
            (State::Tuning | State::AutoTuneAll(_), _) => {
                self.stop_active();
                self.state = State::Settings;
            }
        }
    }

    fn power_on(&mut self) {
        self.statistics.reset_session();
        self.state = State::Standby;
        log::info!("Powered on");
    }

    fn power_off(&mut self) {
        if self.is_active() {
            self.stop_active();
        } else {
            self.rest_actuator();
        }
        self.state = State::Off;
        log::info!("Powered off");
    }

    fn start_tuning(&mut self, auto_all: bool) {
        if self.fault {
            return;
        }
        self.push_actuator(ActuatorCommand::Attach);
        self.controller.reset();
        self.live = LiveView::default();
        self.tune_started_at = Some(self.now);
        self.state = if auto_all {
            log::info!("Auto tune all started");
            State::AutoTuneAll(AutoTuneSequence::new(self.now))
        } else {
            log::info!("Tuning started");
            State::Tuning
        };
    }

    fn is_active(&self) -> bool {
        matches!(self.state, State::Tuning | State::AutoTuneAll(_))
    }

    /// Tears down an active tuning state: folds the elapsed time of the
    /// aborted attempt and rests the actuator. All controller and
    /// sequence state is cleared within this tick.
    fn stop_active(&mut self) {
        if let Some(started) = self.tune_started_at.take() {
            self.statistics.fold_time(self.now.wrapping_sub(started));
        }
        self.celebrating = None;
        self.live = LiveView::default();
        self.rest_actuator();
    }

    fn on_in_tune(&mut self) {
        if let Some(started) = self.tune_started_at.take() {
            self.statistics.record_success(self.now.wrapping_sub(started));
        }
        self.celebrating = Some(self.now);
        log::info!("String in tune");
    }

    fn converge_celebration(&mut self) {
        if let Some(since) = self.celebrating {
            if self.now.wrapping_sub(since) >= SUCCESS_DISPLAY_MS {
                self.celebrating = None;
                self.advance_after_success();
            }
        }
    }

    fn advance_after_success(&mut self) {
        match self.state {
            State::AutoTuneAll(mut sequence) => {
                sequence.advance(self.now);
                self.controller.reset();
                self.live = LiveView::default();
                if sequence.is_complete() {
                    self.rest_actuator();
                    self.state = State::Standby;
                    log::info!("Auto tune all complete");
                } else {
                    self.tune_started_at = Some(self.now);
                    self.state = State::AutoTuneAll(sequence);
                }
            }
            State::Tuning => match self.selection {
                SelectionMode::Manual(string) if string + 1 < STRING_COUNT => {
                    self.selection = SelectionMode::Manual(string + 1);
                    self.controller.reset();
                    self.live = LiveView::default();
                    self.tune_started_at = Some(self.now);
                }
                SelectionMode::Manual(_) => {
                    self.rest_actuator();
                    self.state = State::Standby;
                    log::info!("Manual tuning complete");
                }
                SelectionMode::Auto => {
                    self.controller.reset();
                    self.live = LiveView::default();
                    self.tune_started_at = Some(self.now);
                }
            },
            _ => (),
        }
    }

    fn converge_timeout(&mut self) {
        if self.celebrating.is_some() {
            return;
        }
        let State::AutoTuneAll(mut sequence) = self.state else {
            return;
        };
        if !sequence.timed_out(self.now) {
            return;
        }

        log::info!("String timed out, skipping");
        self.statistics.record_failure();
        self.controller.reset();
        self.live = LiveView::default();
        sequence.advance(self.now);
        if sequence.is_complete() {
            self.tune_started_at = None;
            self.rest_actuator();
            self.state = State::Standby;
            log::info!("Auto tune all complete");
        } else {
            self.tune_started_at = Some(self.now);
            self.state = State::AutoTuneAll(sequence);
        }
    }

    fn rest_actuator(&mut self) {
        self.push_actuator(ActuatorCommand::Rest);
        self.controller.rest();
    }

    fn push_actuator(&mut self, command: ActuatorCommand) {
        // NOTE: This is safe, the capacity covers the worst-case tick.
        let _: Result<_, _> = self.actuator.push(command);
    }

    fn screen(&self) -> Screen {
        if self.fault {
            return Screen::AllocationFailure;
        }
        let profile = PROFILES[self.profile_index].name;
        match self.state {
            State::Off => Screen::Off,
            State::Standby => Screen::Standby(StandbyView {
                profile,
                selection: self.selection,
                session_strings_tuned: self.statistics.session_strings_tuned,
            }),
            State::Tuning => Screen::Tuning(TuningView {
                profile,
                frequency: self.live.frequency,
                note: self.live.note,
                string: self.live.string.map(|string| STRING_NAMES[string]),
                cents: self.live.cents,
                signal_level: self.live.signal_level,
                celebrating: self.celebrating.is_some(),
            }),
            State::AutoTuneAll(sequence) => {
                let string_index = sequence.current().min(STRING_COUNT - 1);
                Screen::AutoTuneAll(AutoTuneView {
                    profile,
                    string_index,
                    string: STRING_NAMES[string_index],
                    frequency: self.live.frequency,
                    cents: self.live.cents,
                    signal_level: self.live.signal_level,
                    celebrating: self.celebrating.is_some(),
                })
            }
            State::StringSelect => Screen::StringSelect(self.selection),
            State::ModeSelect => Screen::ModeSelect(profile),
            State::Statistics => Screen::Statistics(StatisticsView::from(&self.statistics)),
            State::Settings => Screen::Settings(SettingsView {
                tolerance: self.config.tolerance,
                stable_samples: self.config.stable_samples,
                move_period_ms: self.config.move_period_ms,
                noise_threshold: self.config.noise_threshold,
                gain: self.config.gain,
                dc_block: self.config.dc_block,
            }),
        }
    }
}
