//! Acquisition window buffer, allocated once at startup.

use core::fmt;

/// Number of samples per acquisition window. Must be a power of two.
pub const LENGTH: usize = 2048;

/// Sampling frequency the acquisition loop is paced at, in Hz.
pub const SAMPLE_RATE: f32 = 8192.0;

/// One acquisition window of raw sensor readings.
///
/// The buffer is overwritten in place on every tuning tick. It lives on
/// the heap, and since the device must refuse to tune without it, the
/// allocation is checked rather than aborting.
pub struct SampleBuffer {
    samples: Vec<f32>,
}

/// The sample buffers could not be allocated at startup.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AllocationError;

impl fmt::Debug for SampleBuffer {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "SampleBuffer(length: {})", self.samples.len())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SampleBuffer {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "SampleBuffer(length: {})", self.samples.len());
    }
}

impl SampleBuffer {
    /// # Errors
    ///
    /// Fails with `AllocationError` when the heap cannot back the window.
    pub fn try_new() -> Result<Self, AllocationError> {
        let mut samples = Vec::new();
        samples
            .try_reserve_exact(LENGTH)
            .map_err(|_| AllocationError)?;
        samples.resize(LENGTH, 0.0);
        Ok(Self { samples })
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.samples
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.samples
    }

    pub fn reset(&mut self) {
        self.samples.fill(0.0);
    }
}
