//! Alternate tunings and their per-string target frequencies.

/// Number of strings the mechanism can tune.
pub const STRING_COUNT: usize = 6;

/// Display names of the strings in standard tuning order, low to high.
pub const STRING_NAMES: [&str; STRING_COUNT] = ["E2", "A2", "D3", "G3", "B3", "E4"];

/// One alternate tuning: a name and six target frequencies, one per
/// string, low to high.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TuningProfile {
    pub name: &'static str,
    pub frequencies: [f32; STRING_COUNT],
}

/// The static set of selectable tunings. Selected by index, immutable.
pub const PROFILES: [TuningProfile; 4] = [
    TuningProfile {
        name: "STANDARD",
        frequencies: [82.41, 110.0, 146.83, 196.0, 246.94, 329.63],
    },
    TuningProfile {
        name: "1/2 STEP DOWN",
        frequencies: [77.78, 103.83, 138.59, 185.0, 233.08, 311.13],
    },
    TuningProfile {
        name: "1/2 STEP UP",
        frequencies: [87.31, 116.54, 155.56, 207.65, 261.63, 349.23],
    },
    TuningProfile {
        name: "FULL STEP DOWN",
        frequencies: [73.42, 98.0, 130.81, 174.61, 220.0, 293.66],
    },
];
