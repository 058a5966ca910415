//! Progress through the six-string auto-tune routine.

use crate::profile::STRING_COUNT;

/// A string that is neither tuned nor timed out after this long is
/// recorded as failed and skipped.
pub const STRING_TIMEOUT_MS: u32 = 30_000;

/// Position within the auto-tune-all routine.
///
/// The index may reach [`STRING_COUNT`], which signals completion and is
/// never used to address a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AutoTuneSequence {
    current: usize,
    string_started_at: u32,
}

impl AutoTuneSequence {
    #[must_use]
    pub fn new(now_ms: u32) -> Self {
        Self {
            current: 0,
            string_started_at: now_ms,
        }
    }

    #[must_use]
    pub fn current(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current >= STRING_COUNT
    }

    /// Moves on to the next string and re-arms the per-string timer.
    pub fn advance(&mut self, now_ms: u32) {
        if self.current < STRING_COUNT {
            self.current += 1;
        }
        self.string_started_at = now_ms;
    }

    #[must_use]
    pub fn timed_out(&self, now_ms: u32) -> bool {
        now_ms.wrapping_sub(self.string_started_at) > STRING_TIMEOUT_MS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_advances_complete_the_sequence() {
        let mut sequence = AutoTuneSequence::new(0);
        for string in 0..STRING_COUNT {
            assert_eq!(sequence.current(), string);
            assert!(!sequence.is_complete());
            sequence.advance(0);
        }
        assert_eq!(sequence.current(), STRING_COUNT);
        assert!(sequence.is_complete());
    }

    #[test]
    fn advancing_rearms_the_string_timer() {
        let mut sequence = AutoTuneSequence::new(0);
        assert!(!sequence.timed_out(STRING_TIMEOUT_MS));
        assert!(sequence.timed_out(STRING_TIMEOUT_MS + 1));
        sequence.advance(STRING_TIMEOUT_MS);
        assert!(!sequence.timed_out(2 * STRING_TIMEOUT_MS));
        assert!(sequence.timed_out(2 * STRING_TIMEOUT_MS + 1));
    }
}
