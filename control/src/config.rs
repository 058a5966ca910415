//! Runtime-adjustable device configuration.
//!
//! Not persisted across power loss in this design. The values feed the
//! regulator and the dsp pipeline and are injectable for tests.

use crate::controller;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Absolute cent deviation considered in tune.
    pub tolerance: i32,
    /// Consecutive in-tolerance samples required for success.
    pub stable_samples: u32,
    /// Minimum period between actuator moves.
    pub move_period_ms: u32,
    /// Spectral peak magnitude below which no pitch is reported.
    pub noise_threshold: f32,
    /// Gain applied to raw sensor readings.
    pub gain: f32,
    /// Subtract the DC offset of each acquisition window.
    pub dc_block: bool,
}

impl Default for Config {
    fn default() -> Self {
        let controller = controller::Attributes::default();
        let detector = pluck_dsp::detector::Attributes::default();
        Self {
            tolerance: controller.tolerance,
            stable_samples: controller.stable_samples,
            move_period_ms: controller.move_period_ms,
            noise_threshold: detector.noise_threshold,
            gain: 1.0,
            dc_block: detector.dc_block,
        }
    }
}

impl Config {
    #[must_use]
    pub fn controller_attributes(&self) -> controller::Attributes {
        controller::Attributes {
            tolerance: self.tolerance,
            stable_samples: self.stable_samples,
            move_period_ms: self.move_period_ms,
        }
    }

    #[must_use]
    pub fn detector_attributes(&self) -> pluck_dsp::detector::Attributes {
        pluck_dsp::detector::Attributes {
            noise_threshold: self.noise_threshold,
            dc_block: self.dc_block,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn sampler_attributes(&self) -> pluck_dsp::sampler::Attributes {
        pluck_dsp::sampler::Attributes { gain: self.gain }
    }
}
