//! Hamming window applied before the spectral transform.

use core::f32::consts::PI;

/// Windows the buffer in place and returns its signal level.
///
/// The raised-cosine coefficients taper the window edges to reduce
/// spectral leakage. The signal level is the mean absolute value of the
/// windowed buffer and feeds the detector's silence gate.
pub fn apply(buffer: &mut [f32]) -> f32 {
    let n_minus_1 = (buffer.len() - 1) as f32;
    let mut level = 0.0;
    for (i, x) in buffer.iter_mut().enumerate() {
        let w = 0.54 - 0.46 * libm::cosf(2.0 * PI * i as f32 / n_minus_1);
        *x *= w;
        level += libm::fabsf(*x);
    }
    level / buffer.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_are_attenuated_more_than_the_center() {
        let mut buffer = [1.0; 64];
        apply(&mut buffer);
        assert!(buffer[0] < buffer[32]);
        assert!(buffer[63] < buffer[32]);
        assert_relative_eq!(buffer[0], 0.08, epsilon = 0.001);
    }

    #[test]
    fn window_is_symmetric() {
        let mut buffer = [1.0; 64];
        apply(&mut buffer);
        for i in 0..32 {
            assert_relative_eq!(buffer[i], buffer[63 - i], epsilon = 0.0001);
        }
    }

    #[test]
    fn zero_buffer_has_zero_signal_level() {
        let mut buffer = [0.0; 64];
        let level = apply(&mut buffer);
        assert_relative_eq!(level, 0.0);
    }

    #[test]
    fn signal_level_is_mean_absolute_value_after_windowing() {
        let mut buffer = [2.0; 64];
        let level = apply(&mut buffer);
        let expected: f32 = buffer.iter().map(|x| x.abs()).sum::<f32>() / 64.0;
        assert_relative_eq!(level, expected, epsilon = 0.0001);
    }
}
