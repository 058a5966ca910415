//! Mapping of a detected frequency to a target string and cent deviation.

use crate::note;
use crate::profile::{TuningProfile, STRING_COUNT};

// Relative window around each string's target accepted in Auto mode.
// TODO: Recalibrate against real hardware; 0.26 was chosen empirically.
pub const STRING_MATCH_TOLERANCE: f32 = 0.26;

/// How the active string is chosen while tuning.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SelectionMode {
    #[default]
    Auto,
    Manual(usize),
}

impl SelectionMode {
    /// Cycles Auto -> string 0 -> ... -> string 5 -> Auto.
    #[must_use]
    pub fn advanced(self) -> Self {
        match self {
            Self::Auto => Self::Manual(0),
            Self::Manual(string) if string + 1 < STRING_COUNT => Self::Manual(string + 1),
            Self::Manual(_) => Self::Auto,
        }
    }
}

/// Resolver output for one detection.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Resolution {
    pub note: Option<&'static str>,
    pub string: Option<usize>,
    pub cents: i32,
}

/// Resolves a smoothed frequency against the active profile.
///
/// During auto-tune-all the target is pinned to the sequence's string and
/// the pitch does not influence the choice; the player is assumed to be
/// plucking the commanded string. Manual mode uses the selected string.
/// Auto mode picks the closest target, but only when the deviation stays
/// within the relative match window; otherwise no string is identified
/// and the cents are taken against the nearest equal-tempered note.
#[must_use]
pub fn resolve(
    frequency: f32,
    profile: &TuningProfile,
    mode: SelectionMode,
    pinned: Option<usize>,
) -> Resolution {
    if frequency <= 0.0 {
        return Resolution::default();
    }

    let string = match (pinned, mode) {
        (Some(string), _) => Some(string),
        (None, SelectionMode::Manual(string)) => Some(string),
        (None, SelectionMode::Auto) => closest_string(frequency, profile),
    };

    let cents = match string {
        Some(string) => note::cents_between(frequency, profile.frequencies[string]),
        None => {
            let nearest = note::midi_frequency(note::nearest_midi(frequency));
            note::cents_between(frequency, nearest)
        }
    };

    Resolution {
        note: Some(note::name(frequency)),
        string,
        cents,
    }
}

fn closest_string(frequency: f32, profile: &TuningProfile) -> Option<usize> {
    let mut best = None;
    let mut best_difference = f32::INFINITY;
    for (i, target) in profile.frequencies.iter().enumerate() {
        let difference = libm::fabsf(frequency - target);
        if difference < target * STRING_MATCH_TOLERANCE && difference < best_difference {
            best_difference = difference;
            best = Some(i);
        }
    }
    best
}
