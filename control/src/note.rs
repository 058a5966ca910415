//! Equal-tempered note math.

/// Note names over one octave, indexed by MIDI number modulo 12.
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

const A4_MIDI: i32 = 69;
const A4_FREQUENCY: f32 = 440.0;

/// Nearest MIDI note number for a frequency.
#[must_use]
pub fn nearest_midi(frequency: f32) -> i32 {
    libm::roundf(A4_MIDI as f32 + 12.0 * libm::log2f(frequency / A4_FREQUENCY)) as i32
}

/// Name of the nearest note, with correct wraparound below C0.
#[must_use]
pub fn name(frequency: f32) -> &'static str {
    let index = nearest_midi(frequency).rem_euclid(12);
    NOTE_NAMES[index as usize]
}

/// Equal-tempered frequency of a MIDI note number.
#[must_use]
pub fn midi_frequency(midi: i32) -> f32 {
    A4_FREQUENCY * libm::powf(2.0, (midi - A4_MIDI) as f32 / 12.0)
}

/// Signed deviation of a frequency from a target, in cents. Negative
/// means flat, positive sharp.
#[must_use]
pub fn cents_between(frequency: f32, target: f32) -> i32 {
    libm::roundf(1200.0 * libm::log2f(frequency / target)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a4_maps_to_midi_69() {
        assert_eq!(nearest_midi(440.0), 69);
        assert_eq!(name(440.0), "A");
    }

    #[test]
    fn low_e_string_is_named_e() {
        assert_eq!(name(82.41), "E");
    }

    #[test]
    fn name_wraps_for_frequencies_below_c0() {
        // MIDI numbers go negative below ~8 Hz; modulo must stay positive.
        assert_eq!(nearest_midi(8.0), -3);
        assert_eq!(name(8.0), "A");
    }

    #[test]
    fn midi_frequency_inverts_nearest_midi() {
        for midi in 28..77 {
            let frequency = midi_frequency(midi);
            assert_eq!(nearest_midi(frequency), midi);
        }
    }

    #[test]
    fn cents_are_signed_and_zero_on_target() {
        assert_eq!(cents_between(110.0, 110.0), 0);
        assert!(cents_between(108.0, 110.0) < 0);
        assert!(cents_between(112.0, 110.0) > 0);
    }

    #[test]
    fn one_semitone_is_one_hundred_cents() {
        assert_eq!(cents_between(midi_frequency(70), midi_frequency(69)), 100);
    }
}
