//! The pitch detection pipeline, from raw window to smoothed frequency.

use core::fmt;

use crate::buffer::{AllocationError, SampleBuffer};
use crate::smoothing::Smoother;
use crate::spectrum::SpectrumAnalyzer;
use crate::window;

/// Runs one acquisition window through DC removal, windowing, spectral
/// peak extraction and temporal smoothing.
pub struct PitchDetector {
    spectrum: SpectrumAnalyzer,
    smoother: Smoother,
    attributes: Attributes,
}

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Attributes {
    /// Minimum spectral peak magnitude accepted as a pitch.
    pub noise_threshold: f32,
    /// Minimum signal level required before the spectrum is consulted.
    pub signal_floor: f32,
    /// Subtract the window mean before analysis. Piezo pickups ride on a
    /// large DC offset, so this is on by default.
    pub dc_block: bool,
}

impl Default for Attributes {
    fn default() -> Self {
        // TODO: Recalibrate the thresholds against real pickup hardware;
        // both values were carried over from bench experiments.
        Self {
            noise_threshold: 15.0,
            signal_floor: 5.0,
            dc_block: true,
        }
    }
}

/// Pipeline output for one tick.
///
/// A frequency of 0.0 means no detection and is never a valid pitch.
#[derive(Debug, Default, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Detection {
    pub frequency: f32,
    pub smoothed: f32,
    pub signal_level: f32,
}

impl fmt::Debug for PitchDetector {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "PitchDetector(attributes: {:?})", self.attributes)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PitchDetector {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "PitchDetector(attributes: {})", self.attributes);
    }
}

impl PitchDetector {
    /// # Errors
    ///
    /// Fails with `AllocationError` when the spectral working buffers
    /// cannot be allocated. The device must not enter a tuning state
    /// without a detector.
    pub fn try_new(sample_rate: f32) -> Result<Self, AllocationError> {
        Ok(Self {
            spectrum: SpectrumAnalyzer::try_new(sample_rate)?,
            smoother: Smoother::default(),
            attributes: Attributes::default(),
        })
    }

    pub fn set_attributes(&mut self, attributes: Attributes) {
        self.attributes = attributes;
    }

    #[must_use]
    pub fn attributes(&self) -> Attributes {
        self.attributes
    }

    pub fn reset(&mut self) {
        self.smoother.reset();
    }

    pub fn process(&mut self, buffer: &mut SampleBuffer) -> Detection {
        let samples = buffer.as_mut_slice();
        if self.attributes.dc_block {
            remove_dc(samples);
        }
        let signal_level = window::apply(samples);

        if signal_level <= self.attributes.signal_floor {
            return Detection {
                frequency: 0.0,
                smoothed: 0.0,
                signal_level,
            };
        }

        let frequency = self
            .spectrum
            .peak_frequency(samples, self.attributes.noise_threshold);
        let smoothed = self.smoother.smooth(frequency);
        Detection {
            frequency,
            smoothed,
            signal_level,
        }
    }
}

fn remove_dc(samples: &mut [f32]) {
    let mean = samples.iter().sum::<f32>() / samples.len() as f32;
    for sample in samples.iter_mut() {
        *sample -= mean;
    }
}
