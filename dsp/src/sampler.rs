//! Precisely timed acquisition of one window of sensor readings.

use crate::buffer::{SampleBuffer, LENGTH};

/// Source of raw analog readings, typically an ADC pin behind a piezo.
///
/// Readings are unsigned and saturating; a stalled source yields a flat
/// signal which the detector reports as no pitch.
pub trait AnalogSource {
    fn read(&mut self) -> u16;
}

/// Monotonic microsecond clock used to pace the acquisition loop.
pub trait Clock {
    fn micros(&self) -> u64;
}

/// Fills the sample buffer at a fixed rate by busy-waiting between reads.
///
/// Acquisition is the only time-critical task running, so spinning to the
/// next tick boundary is acceptable. Inter-sample spacing error is bounded
/// by the granularity of the underlying clock and is not corrected.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sampler {
    period_us: u64,
    attributes: Attributes,
}

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Attributes {
    /// Scale applied to every raw reading, compensating for pickup output.
    pub gain: f32,
}

impl Default for Attributes {
    fn default() -> Self {
        Self { gain: 1.0 }
    }
}

impl Sampler {
    #[must_use]
    pub fn new(sample_rate: f32) -> Self {
        Self {
            period_us: (1_000_000.0 / sample_rate) as u64,
            attributes: Attributes::default(),
        }
    }

    pub fn set_attributes(&mut self, attributes: Attributes) {
        self.attributes = attributes;
    }

    pub fn acquire(
        &self,
        source: &mut impl AnalogSource,
        clock: &impl Clock,
        buffer: &mut SampleBuffer,
    ) {
        let start = clock.micros();
        for (i, sample) in buffer.as_mut_slice().iter_mut().enumerate() {
            let target = start + i as u64 * self.period_us;
            while clock.micros() < target {}
            *sample = f32::from(source.read()) * self.attributes.gain;
        }
        debug_assert_eq!(buffer.as_slice().len(), LENGTH);
    }
}
