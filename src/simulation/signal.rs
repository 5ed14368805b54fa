use std::f64::consts::PI;

use crate::error::Result;
use crate::fixed_point::NumericFormat;
use crate::sample::Sample;

/// `amplitude * sin(2 pi f n / fs)` for `n` in `0..len`.
pub fn sine(len: usize, freq_hz: f64, sample_rate_hz: f64, amplitude: f64) -> Vec<f64> {
    let omega = 2.0 * PI * freq_hz / sample_rate_hz;
    (0..len).map(|n| amplitude * (omega * n as f64).sin()).collect()
}

/// Zeros with `amplitude` at `position`. A position past the end gives all zeros.
pub fn impulse(len: usize, position: usize, amplitude: f64) -> Vec<f64> {
    let mut signal = vec![0.0; len];
    if let Some(s) = signal.get_mut(position) {
        *s = amplitude;
    }
    signal
}

pub fn constant(len: usize, value: f64) -> Vec<f64> {
    vec![value; len]
}

/// Convert a real signal to samples, flooring and saturating fixed formats.
pub fn to_samples<S: Sample>(signal: &[f64], format: NumericFormat) -> Result<Vec<S>> {
    let frac_bits = S::frac_bits(format)?;
    Ok(signal.iter().map(|&x| S::from_real(x, frac_bits)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed_point::QFormat;
    use approx::assert_relative_eq;

    #[test]
    fn test_sine_quarter_period() {
        let s = sine(5, 1000.0, 4000.0, 0.5);
        assert_relative_eq!(s[0], 0.0);
        assert_relative_eq!(s[1], 0.5, epsilon = 1e-12);
        assert_relative_eq!(s[3], -0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_impulse() {
        assert_eq!(impulse(4, 1, 2.0), vec![0.0, 2.0, 0.0, 0.0]);
        assert_eq!(impulse(2, 5, 1.0), vec![0.0, 0.0]);
    }

    #[test]
    fn test_to_samples_saturates() {
        let q: Vec<i16> =
            to_samples(&[1.0, -1.0, 0.5], NumericFormat::Fixed(QFormat::Q1_15)).unwrap();
        assert_eq!(q, vec![32767, -32768, 16384]);
        assert!(to_samples::<f32>(&[0.0], NumericFormat::Fixed(QFormat::Q1_15)).is_err());
    }
}
