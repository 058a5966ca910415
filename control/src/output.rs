//! Desired state of the output peripherals.

use heapless::Vec;

use crate::resolver::SelectionMode;
use crate::statistics::Statistics;

/// What the binding should do with its peripherals after one tick.
///
/// The core never touches hardware; it only requests. The display
/// collaborator renders the screen, the actuator executes the commands
/// in order.
#[derive(Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DesiredOutput {
    pub screen: Screen,
    pub actuator: Vec<ActuatorCommand, 4>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorCommand {
    Attach,
    MoveTo(u8),
    /// Move to the centered rest position, then detach.
    Rest,
}

/// Everything the display needs to render the current state.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Screen {
    Off,
    Standby(StandbyView),
    Tuning(TuningView),
    AutoTuneAll(AutoTuneView),
    StringSelect(SelectionMode),
    ModeSelect(&'static str),
    Statistics(StatisticsView),
    Settings(SettingsView),
    /// Persistent fault screen; the device refuses to tune.
    AllocationFailure,
}

impl Default for Screen {
    fn default() -> Self {
        Self::Standby(StandbyView::default())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StandbyView {
    pub profile: &'static str,
    pub selection: SelectionMode,
    pub session_strings_tuned: u32,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TuningView {
    pub profile: &'static str,
    pub frequency: f32,
    pub note: Option<&'static str>,
    pub string: Option<&'static str>,
    pub cents: i32,
    pub signal_level: f32,
    pub celebrating: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AutoTuneView {
    pub profile: &'static str,
    pub string_index: usize,
    pub string: &'static str,
    pub frequency: f32,
    pub cents: i32,
    pub signal_level: f32,
    pub celebrating: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatisticsView {
    pub statistics: Statistics,
    pub average_tuning_secs: f32,
}

impl From<&Statistics> for StatisticsView {
    fn from(statistics: &Statistics) -> Self {
        Self {
            statistics: *statistics,
            average_tuning_secs: statistics.average_tuning_secs(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SettingsView {
    pub tolerance: i32,
    pub stable_samples: u32,
    pub move_period_ms: u32,
    pub noise_threshold: f32,
    pub gain: f32,
    pub dc_block: bool,
}
