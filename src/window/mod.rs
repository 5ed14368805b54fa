//! Window functions.
//!
//! All windows are the symmetric variants: `w[n] == w[N-1-n]`, with the
//! shape spanning `N - 1` intervals so both end points lie on the curve.

mod bessel;
mod kaiser;

pub use bessel::{i0, i0_fixed};
pub use kaiser::{kaiser, kaiser_fixed, kaiser_real};

use crate::error::{DspError, Result};
use crate::fixed_point::NumericFormat;
use crate::kernel::VectorKernel;
use crate::sample::Sample;
use serde::Deserialize;
use std::f64::consts::PI;

/// Window shape
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WindowKind {
    Rectangular,
    /// Triangle reaching zero at both ends
    Bartlett,
    Blackman,
    Hamming,
    Hann,
    /// Gaussian with standard deviation `sigma * (N - 1) / 2`, `0 < sigma <= 0.5`
    Gauss { sigma: f64 },
    /// Kaiser with shape parameter `alpha`; `beta = pi * alpha`
    Kaiser { alpha: f64 },
    /// Parabola reaching zero at both ends
    Welch,
}

fn validate(kind: WindowKind, len: usize) -> Result<()> {
    if len <= 1 {
        return Err(DspError::InvalidWindow(format!(
            "window needs at least 2 points, got {}",
            len
        )));
    }
    match kind {
        WindowKind::Gauss { sigma } if !(sigma > 0.0 && sigma <= 0.5) => Err(
            DspError::InvalidWindow(format!("Gauss sigma must be in (0, 0.5], got {}", sigma)),
        ),
        _ => Ok(()),
    }
}

/// Window of `len` points in `f64`.
///
/// # Errors
/// `DspError::InvalidWindow` for `len <= 1` and out-of-range shape
/// parameters.
pub fn generate(kind: WindowKind, len: usize) -> Result<Vec<f64>> {
    validate(kind, len)?;
    if let WindowKind::Kaiser { alpha } = kind {
        return kaiser_real(len, alpha);
    }

    let span = (len - 1) as f64;
    let half = span / 2.0;
    let mut window = vec![0.0; len];
    for i in 0..len.div_ceil(2) {
        let n = i as f64;
        let phase = 2.0 * PI * n / span;
        let w = match kind {
            WindowKind::Rectangular => 1.0,
            WindowKind::Bartlett => 1.0 - ((n - half) / half).abs(),
            WindowKind::Blackman => 0.42 - 0.5 * phase.cos() + 0.08 * (2.0 * phase).cos(),
            WindowKind::Hamming => 0.54 - 0.46 * phase.cos(),
            WindowKind::Hann => 0.5 - 0.5 * phase.cos(),
            WindowKind::Gauss { sigma } => {
                let x = (n - half) / (sigma * half);
                (-0.5 * x * x).exp()
            }
            WindowKind::Welch => {
                let x = (n - half) / half;
                1.0 - x * x
            }
            WindowKind::Kaiser { .. } => unreachable!("handled above"),
        };
        // Mirror so fixed-point quantization stays symmetric
        window[i] = w;
        window[len - 1 - i] = w;
    }
    Ok(window)
}

/// Window of `len` points in the sample type `S`.
///
/// Kaiser windows in a fixed format are computed by the integer evaluator.
/// Every other shape is computed in `f64` and quantized with floor and
/// saturation, so a peak of 1.0 becomes the format's maximum.
pub fn synthesize<S: Sample>(
    kind: WindowKind,
    len: usize,
    format: NumericFormat,
) -> Result<Vec<S>> {
    if let WindowKind::Kaiser { alpha } = kind {
        return kaiser(len, alpha, format);
    }
    let frac_bits = S::frac_bits(format)?;
    Ok(generate(kind, len)?
        .into_iter()
        .map(|w| S::from_real(w, frac_bits))
        .collect())
}

/// Multiply `signal` by `window` into `dst`.
///
/// Fixed-point products are shifted right by `frac_bits`, the window's
/// fractional bit count; pass 0 for floating point.
pub fn apply_window<S: Sample, K: VectorKernel>(
    kernel: &K,
    dst: &mut [S],
    signal: &[S],
    window: &[S],
    frac_bits: u32,
) -> Result<()> {
    kernel.dot_mul(dst, signal, window, frac_bits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed_point::QFormat;
    use crate::kernel::KernelDispatch;
    use approx::assert_abs_diff_eq;

    const ALL: [WindowKind; 8] = [
        WindowKind::Rectangular,
        WindowKind::Bartlett,
        WindowKind::Blackman,
        WindowKind::Hamming,
        WindowKind::Hann,
        WindowKind::Gauss { sigma: 0.4 },
        WindowKind::Kaiser { alpha: 3.0 },
        WindowKind::Welch,
    ];

    #[test]
    fn test_all_windows_symmetric_and_bounded() {
        for kind in ALL {
            for len in [2, 7, 16, 33] {
                let w = generate(kind, len).unwrap();
                assert_eq!(w.len(), len);
                for n in 0..len {
                    assert_eq!(w[n], w[len - 1 - n]);
                    assert!(
                        (-1e-12..=1.0 + 1e-12).contains(&w[n]),
                        "{:?} out of range at {}: {}",
                        kind,
                        n,
                        w[n]
                    );
                }
            }
        }
    }

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert_abs_diff_eq!(*a, *e, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_known_shapes() {
        let hann = generate(WindowKind::Hann, 5).unwrap();
        assert_close(&hann, &[0.0, 0.5, 1.0, 0.5, 0.0]);

        let bartlett = generate(WindowKind::Bartlett, 5).unwrap();
        assert_close(&bartlett, &[0.0, 0.5, 1.0, 0.5, 0.0]);

        let hamming = generate(WindowKind::Hamming, 3).unwrap();
        assert_close(&hamming, &[0.08, 1.0, 0.08]);

        let welch = generate(WindowKind::Welch, 3).unwrap();
        assert_close(&welch, &[0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_synthesize_fixed_saturates_peak() {
        let w: Vec<i16> =
            synthesize(WindowKind::Hann, 5, NumericFormat::Fixed(QFormat::Q1_15)).unwrap();
        // cos(pi/2) is not exactly zero in f64, so the quarter points floor
        // one LSB under 0.5
        assert_eq!(w, vec![0, 16383, 32767, 16383, 0]);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(generate(WindowKind::Hann, 1).is_err());
        assert!(generate(WindowKind::Gauss { sigma: 0.0 }, 8).is_err());
        assert!(generate(WindowKind::Gauss { sigma: 0.7 }, 8).is_err());
        assert!(generate(WindowKind::Kaiser { alpha: -1.0 }, 8).is_err());
    }

    #[test]
    fn test_apply_window() {
        let kernel = KernelDispatch::default();
        let window: Vec<i16> =
            synthesize(WindowKind::Rectangular, 4, NumericFormat::Fixed(QFormat::Q1_15)).unwrap();
        let signal = [1000i16, -1000, 32767, -32768];
        let mut out = [0i16; 4];
        apply_window(&kernel, &mut out, &signal, &window, 15).unwrap();
        // 32767/32768 gain floors each value down by at most one LSB
        assert_eq!(out, [999, -1000, 32766, -32767]);
    }
}
