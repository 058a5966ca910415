//! Session and lifetime tuning counters.
//!
//! Everything here is volatile; the lifetime counters survive only for
//! the powered session.

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Statistics {
    pub lifetime_strings_tuned: u32,
    pub session_strings_tuned: u32,
    pub total_tuning_ms: u32,
    pub successful_tunes: u32,
    pub failed_tunes: u32,
}

impl Statistics {
    pub fn record_success(&mut self, elapsed_ms: u32) {
        self.lifetime_strings_tuned += 1;
        self.session_strings_tuned += 1;
        self.successful_tunes += 1;
        self.total_tuning_ms = self.total_tuning_ms.saturating_add(elapsed_ms);
    }

    pub fn record_failure(&mut self) {
        self.failed_tunes += 1;
    }

    /// Folds the time of an aborted attempt into the totals.
    pub fn fold_time(&mut self, elapsed_ms: u32) {
        self.total_tuning_ms = self.total_tuning_ms.saturating_add(elapsed_ms);
    }

    pub fn reset_session(&mut self) {
        self.session_strings_tuned = 0;
    }

    /// Average seconds spent per successfully tuned string.
    #[must_use]
    pub fn average_tuning_secs(&self) -> f32 {
        let tuned = self.lifetime_strings_tuned.max(1);
        (self.total_tuning_ms as f32 / 1000.0) / tuned as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_bumps_all_success_counters() {
        let mut statistics = Statistics::default();
        statistics.record_success(4000);
        assert_eq!(statistics.lifetime_strings_tuned, 1);
        assert_eq!(statistics.session_strings_tuned, 1);
        assert_eq!(statistics.successful_tunes, 1);
        assert_eq!(statistics.failed_tunes, 0);
        assert_relative_eq!(statistics.average_tuning_secs(), 4.0);
    }

    #[test]
    fn failure_only_counts_the_failure() {
        let mut statistics = Statistics::default();
        statistics.record_failure();
        assert_eq!(statistics.failed_tunes, 1);
        assert_eq!(statistics.lifetime_strings_tuned, 0);
    }

    #[test]
    fn session_reset_keeps_lifetime_counters() {
        let mut statistics = Statistics::default();
        statistics.record_success(1000);
        statistics.reset_session();
        assert_eq!(statistics.session_strings_tuned, 0);
        assert_eq!(statistics.lifetime_strings_tuned, 1);
    }

    #[test]
    fn average_includes_folded_time_of_aborted_attempts() {
        let mut statistics = Statistics::default();
        statistics.record_success(2000);
        statistics.fold_time(2000);
        assert_relative_eq!(statistics.average_tuning_secs(), 4.0);
    }

    #[test]
    fn average_is_defined_before_the_first_success() {
        let statistics = Statistics::default();
        assert_relative_eq!(statistics.average_tuning_secs(), 0.0);
    }
}
