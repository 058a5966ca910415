//! Magnitude spectrum and band-limited peak extraction.

use core::fmt;
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::buffer::{AllocationError, LENGTH};

/// Bounds of the searched band, covering drop-tuned E2 up to harmonics
/// useful for the high E string.
pub const F_MIN: f32 = 70.0;
pub const F_MAX: f32 = 1000.0;

/// Computes the magnitude spectrum of one acquisition window and finds
/// the dominant peak within the guitar band.
///
/// The FFT plan and all working buffers are allocated once at startup.
pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    spectrum: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    magnitudes: Vec<f32>,
    sample_rate: f32,
}

impl fmt::Debug for SpectrumAnalyzer {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "SpectrumAnalyzer(sample_rate: {})", self.sample_rate)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SpectrumAnalyzer {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "SpectrumAnalyzer(sample_rate: {})", self.sample_rate);
    }
}

impl SpectrumAnalyzer {
    /// # Errors
    ///
    /// Fails with `AllocationError` when the working buffers cannot be
    /// allocated.
    pub fn try_new(sample_rate: f32) -> Result<Self, AllocationError> {
        let fft = FftPlanner::new().plan_fft_forward(LENGTH);

        let mut spectrum = Vec::new();
        spectrum
            .try_reserve_exact(LENGTH)
            .map_err(|_| AllocationError)?;
        spectrum.resize(LENGTH, Complex::new(0.0, 0.0));

        let scratch_length = fft.get_inplace_scratch_len();
        let mut scratch = Vec::new();
        scratch
            .try_reserve_exact(scratch_length)
            .map_err(|_| AllocationError)?;
        scratch.resize(scratch_length, Complex::new(0.0, 0.0));

        let mut magnitudes = Vec::new();
        magnitudes
            .try_reserve_exact(LENGTH / 2)
            .map_err(|_| AllocationError)?;
        magnitudes.resize(LENGTH / 2, 0.0);

        Ok(Self {
            fft,
            spectrum,
            scratch,
            magnitudes,
            sample_rate,
        })
    }

    /// Width of one spectral bin in Hz. This bounds the accuracy of the
    /// unrefined peak estimate.
    #[must_use]
    pub fn resolution(&self) -> f32 {
        self.sample_rate / LENGTH as f32
    }

    /// Dominant bin within [`F_MIN`, `F_MAX`] and its magnitude.
    pub fn peak_bin(&mut self, samples: &[f32]) -> (usize, f32) {
        for (bin, sample) in self.spectrum.iter_mut().zip(samples) {
            *bin = Complex::new(*sample, 0.0);
        }
        self.fft
            .process_with_scratch(&mut self.spectrum, &mut self.scratch);
        for (magnitude, bin) in self.magnitudes.iter_mut().zip(&self.spectrum) {
            *magnitude = libm::sqrtf(bin.re * bin.re + bin.im * bin.im);
        }

        let (min_bin, max_bin) = self.band();
        let mut peak_bin = min_bin;
        let mut peak_magnitude = 0.0;
        for (i, magnitude) in self.magnitudes[min_bin..=max_bin].iter().enumerate() {
            if *magnitude > peak_magnitude {
                peak_magnitude = *magnitude;
                peak_bin = min_bin + i;
            }
        }
        (peak_bin, peak_magnitude)
    }

    /// Peak frequency refined by a three-point parabolic fit, or 0.0 when
    /// the peak does not rise above the noise threshold.
    ///
    /// The fit is only applied when the peak has a neighbor on each side
    /// within the band; at the band edges the raw bin frequency is used.
    pub fn peak_frequency(&mut self, samples: &[f32], noise_threshold: f32) -> f32 {
        let (peak_bin, peak_magnitude) = self.peak_bin(samples);
        if peak_magnitude < noise_threshold {
            return 0.0;
        }

        let resolution = self.resolution();
        let (min_bin, max_bin) = self.band();
        if peak_bin > min_bin && peak_bin < max_bin {
            let y1 = self.magnitudes[peak_bin - 1];
            let y2 = self.magnitudes[peak_bin];
            let y3 = self.magnitudes[peak_bin + 1];
            let denominator = y1 - 2.0 * y2 + y3;
            // A perfectly flat three-point top would divide by zero.
            if libm::fabsf(denominator) > f32::EPSILON {
                let offset = (y1 - y3) / (2.0 * denominator);
                return (peak_bin as f32 + offset) * resolution;
            }
        }
        peak_bin as f32 * resolution
    }

    fn band(&self) -> (usize, usize) {
        let resolution = self.resolution();
        let min_bin = (F_MIN / resolution) as usize;
        let max_bin = ((F_MAX / resolution) as usize).min(LENGTH / 2 - 1);
        (min_bin, max_bin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::SAMPLE_RATE;
    use core::f32::consts::PI;
    use proptest::prelude::*;

    fn sinusoid(frequency: f32, amplitude: f32) -> Vec<f32> {
        (0..LENGTH)
            .map(|i| amplitude * libm::sinf(2.0 * PI * frequency * i as f32 / SAMPLE_RATE))
            .collect()
    }

    #[test]
    fn unrefined_peak_of_a_sinusoid_is_within_one_bin() {
        let mut analyzer = SpectrumAnalyzer::try_new(SAMPLE_RATE).unwrap();
        let samples = sinusoid(110.0, 1000.0);
        let (peak_bin, _) = analyzer.peak_bin(&samples);
        let error = (peak_bin as f32 * analyzer.resolution() - 110.0).abs();
        assert!(error <= analyzer.resolution());
    }

    #[test]
    fn interpolated_peak_is_tighter_than_the_raw_bin_grid() {
        let mut analyzer = SpectrumAnalyzer::try_new(SAMPLE_RATE).unwrap();
        // 110 Hz falls exactly between two bins of the 4 Hz grid.
        let samples = sinusoid(110.0, 1000.0);
        let frequency = analyzer.peak_frequency(&samples, 15.0);
        assert!((frequency - 110.0).abs() <= analyzer.resolution() / 2.0);
    }

    #[test]
    fn sub_threshold_peak_is_gated_to_zero() {
        let mut analyzer = SpectrumAnalyzer::try_new(SAMPLE_RATE).unwrap();
        let samples = sinusoid(110.0, 0.00001);
        assert_relative_eq!(analyzer.peak_frequency(&samples, 15.0), 0.0);
    }

    #[test]
    fn tone_above_the_band_is_not_reported_as_a_pitch() {
        let mut analyzer = SpectrumAnalyzer::try_new(SAMPLE_RATE).unwrap();
        let samples = sinusoid(2000.0, 1000.0);
        // Only leakage falls inside the band and must stay under the gate.
        assert_relative_eq!(analyzer.peak_frequency(&samples, 10_000.0), 0.0);
    }

    #[test]
    fn band_is_capped_at_nyquist() {
        let analyzer = SpectrumAnalyzer::try_new(SAMPLE_RATE).unwrap();
        let (min_bin, max_bin) = analyzer.band();
        assert!(min_bin < max_bin);
        assert!(max_bin < LENGTH / 2);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn any_in_band_sinusoid_is_recovered_within_resolution(
            frequency in 80.0f32..950.0,
        ) {
            let mut analyzer = SpectrumAnalyzer::try_new(SAMPLE_RATE).unwrap();
            let samples = sinusoid(frequency, 1000.0);

            let (peak_bin, _) = analyzer.peak_bin(&samples);
            let raw_error = (peak_bin as f32 * analyzer.resolution() - frequency).abs();
            prop_assert!(raw_error <= analyzer.resolution());

            let refined = analyzer.peak_frequency(&samples, 15.0);
            let refined_error = (refined - frequency).abs();
            prop_assert!(refined_error <= analyzer.resolution() / 2.0);
        }
    }
}
