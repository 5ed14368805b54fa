//! Low-pass FIR design, coefficient quantization and response measurement.

use super::CoefficientSet;
use crate::error::{DspError, Result};
use crate::fixed_point::NumericFormat;
use crate::sample::Sample;
use crate::window::{self, WindowKind};
use num_complex::Complex64;
use pm_remez::{BandSetting, constant, pm_parameters, pm_remez};
use std::f64::consts::PI;

fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        (PI * x).sin() / (PI * x)
    }
}

fn check_band_edge(cutoff_hz: f64, sample_rate_hz: f64) -> Result<()> {
    if !(sample_rate_hz > 0.0 && cutoff_hz > 0.0 && cutoff_hz <= sample_rate_hz / 2.0) {
        return Err(DspError::FilterDesign(format!(
            "Invalid filter frequencies: cutoff={}, sample_rate={}",
            cutoff_hz, sample_rate_hz
        )));
    }
    Ok(())
}

/// Windowed-sinc low-pass filter, normalized to unity gain at DC.
///
/// # Arguments
/// * `cutoff_hz` - Cutoff frequency in Hz, at most half of `sample_rate_hz`
/// * `sample_rate_hz` - Rate the filter runs at
/// * `num_taps` - Filter length, at least 2
/// * `window` - Window applied to the ideal response
///
/// # Errors
/// Returns `DspError::FilterDesign` for invalid frequencies or length, and
/// `DspError::InvalidWindow` if the window parameters are rejected.
pub fn lowpass_windowed_sinc(
    cutoff_hz: f64,
    sample_rate_hz: f64,
    num_taps: usize,
    window: WindowKind,
) -> Result<Vec<f64>> {
    check_band_edge(cutoff_hz, sample_rate_hz)?;
    if num_taps < 2 {
        return Err(DspError::FilterDesign(format!(
            "windowed sinc needs at least 2 taps, got {}",
            num_taps
        )));
    }

    let w = window::generate(window, num_taps)?;
    let fc = cutoff_hz / sample_rate_hz;
    let centre = (num_taps - 1) as f64 / 2.0;
    let mut taps: Vec<f64> = w
        .iter()
        .enumerate()
        .map(|(i, &w)| 2.0 * fc * sinc(2.0 * fc * (i as f64 - centre)) * w)
        .collect();

    let sum: f64 = taps.iter().sum();
    if sum.abs() < f64::EPSILON {
        return Err(DspError::FilterDesign(
            "windowed sinc has no DC gain to normalize".to_string(),
        ));
    }
    for t in taps.iter_mut() {
        *t /= sum;
    }
    Ok(taps)
}

/// Equiripple low-pass filter designed with Parks-McClellan (Remez).
///
/// The transition band is centred on `cutoff_hz`.
///
/// # Errors
/// Returns `DspError::FilterDesign` if the bands are invalid or the design
/// does not converge.
pub fn lowpass_equiripple(
    cutoff_hz: f64,
    transition_hz: f64,
    sample_rate_hz: f64,
    num_taps: usize,
) -> Result<Vec<f64>> {
    check_band_edge(cutoff_hz, sample_rate_hz)?;
    let pass_end = (cutoff_hz - transition_hz / 2.0) / sample_rate_hz;
    let stop_start = (cutoff_hz + transition_hz / 2.0) / sample_rate_hz;

    if pass_end <= 0.0 || stop_start >= 0.5 || stop_start <= pass_end {
        return Err(DspError::FilterDesign(format!(
            "Invalid filter frequencies: cutoff={}, sample_rate={}, transition={}",
            cutoff_hz, sample_rate_hz, transition_hz
        )));
    }

    let bands = [
        BandSetting::new(0.0, pass_end, constant(1.0))
            .map_err(|e| DspError::FilterDesign(format!("Passband: {:?}", e)))?,
        BandSetting::new(stop_start, 0.5, constant(0.0))
            .map_err(|e| DspError::FilterDesign(format!("Stopband: {:?}", e)))?,
    ];

    let params = pm_parameters(num_taps, &bands)
        .map_err(|e| DspError::FilterDesign(format!("PM parameters: {:?}", e)))?;

    let design =
        pm_remez(&params).map_err(|e| DspError::FilterDesign(format!("PM Remez: {:?}", e)))?;

    Ok(design.impulse_response)
}

/// Quantize real taps into `format`, keeping the DC gain exact.
///
/// Each tap is floored, then the centre tap absorbs the difference between
/// the raw sum and `round(sum(taps) * 2^Q)`. An odd-length symmetric design
/// stays symmetric. For even lengths the correction is split over the two
/// middle taps, with any odd LSB going to the earlier one.
///
/// # Errors
/// `DspError::InvalidCoefficients` if a corrected tap no longer fits the
/// format, and `DspError::FormatMismatch` if `format` does not describe `S`.
pub fn quantize<S: Sample>(taps: &[f64], format: NumericFormat) -> Result<CoefficientSet<S>> {
    let q = match format {
        NumericFormat::Float => return CoefficientSet::from_real(taps, format),
        NumericFormat::Fixed(q) => q,
    };
    S::frac_bits(format)?;
    if taps.is_empty() {
        return CoefficientSet::new(Vec::new());
    }

    let mut raw: Vec<i64> = taps.iter().map(|&t| q.quantize(t)).collect();
    let target = (taps.iter().sum::<f64>() * (1u64 << q.frac_bits()) as f64).round() as i64;
    let diff = target - raw.iter().sum::<i64>();

    let mid = taps.len() / 2;
    if taps.len() % 2 == 1 {
        raw[mid] += diff;
    } else {
        raw[mid - 1] += diff - diff / 2;
        raw[mid] += diff / 2;
    }

    if let Some(bad) = raw.iter().find(|&&r| q.saturate(r) != r) {
        return Err(DspError::InvalidCoefficients(format!(
            "tap {} does not fit {} after DC correction",
            bad, q
        )));
    }
    CoefficientSet::new(raw.into_iter().map(S::from_raw).collect())
}

/// Complex response `H(f) = sum_k h[k] e^{-j 2 pi f k}` at a frequency
/// normalized to the sample rate (0.5 is Nyquist).
pub fn frequency_response(taps: &[f64], normalized_freq: f64) -> Complex64 {
    taps.iter()
        .enumerate()
        .map(|(k, &h)| Complex64::from_polar(h, -2.0 * PI * normalized_freq * k as f64))
        .sum()
}

/// Magnitude response in dB at a normalized frequency.
pub fn magnitude_db(taps: &[f64], normalized_freq: f64) -> f64 {
    20.0 * frequency_response(taps, normalized_freq).norm().log10()
}
