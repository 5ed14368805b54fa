//! Kaiser window synthesis.
//!
//! `w[n] = I0(pi * alpha * sqrt(1 - (2n / (N - 1) - 1)^2)) / I0(pi * alpha)`
//!
//! Only the first half plus the centre is evaluated; the rest is mirrored,
//! so the result is exactly symmetric in every format.

use super::bessel::{i0, i0_fixed};
use crate::constants::{ALPHA_FRAC_BITS, MANTISSA_FRAC_BITS, MAX_KAISER_ALPHA, PI_Q30};
use crate::error::{DspError, Result};
use crate::fixed_point::ops::isqrt;
use crate::fixed_point::scaled::shift_raw;
use crate::fixed_point::{NumericFormat, QFormat, ScaledValue};
use crate::sample::Sample;
use std::f64::consts::PI;

/// Check a Kaiser window request.
///
/// # Errors
/// `DspError::InvalidWindow` when `len <= 1` or `alpha` is negative,
/// non-finite or above [`MAX_KAISER_ALPHA`].
pub fn validate(len: usize, alpha: f64) -> Result<()> {
    if len <= 1 {
        return Err(DspError::InvalidWindow(format!(
            "Kaiser window needs at least 2 points, got {}",
            len
        )));
    }
    if !alpha.is_finite() || !(0.0..=MAX_KAISER_ALPHA).contains(&alpha) {
        return Err(DspError::InvalidWindow(format!(
            "Kaiser alpha must be in [0, {}], got {}",
            MAX_KAISER_ALPHA, alpha
        )));
    }
    Ok(())
}

/// Kaiser window in `f64`.
pub fn kaiser_real(len: usize, alpha: f64) -> Result<Vec<f64>> {
    validate(len, alpha)?;
    let pia = PI * alpha;
    let den = i0(pia);
    let span = (len - 1) as f64;

    let mut out = vec![0.0; len];
    for n in 0..len.div_ceil(2) {
        let r = 2.0 * n as f64 / span - 1.0;
        let w = i0(pia * (1.0 - r * r).max(0.0).sqrt()) / den;
        out[n] = w;
        out[len - 1 - n] = w;
    }
    Ok(out)
}

/// Kaiser window as raw values in `format`, computed entirely in integer
/// arithmetic.
///
/// Each ratio `I0(arg) / I0(pi * alpha)` divides the mantissas in 64 bits,
/// applies the exponent difference, then shifts (truncating) into `format`.
/// Values that would reach 1.0 saturate at the format's maximum.
pub fn kaiser_fixed(len: usize, alpha: f64, format: QFormat) -> Result<Vec<i64>> {
    validate(len, alpha)?;
    let one = 1i64 << MANTISSA_FRAC_BITS;
    let alpha_raw = (alpha * (1u64 << ALPHA_FRAC_BITS) as f64).floor() as i64;
    let pia = ScaledValue::from_fixed(alpha_raw, ALPHA_FRAC_BITS)
        .mul(ScaledValue::from_fixed(PI_Q30, MANTISSA_FRAC_BITS));
    let den = i0_fixed(pia);
    let span = (len - 1) as i64;

    let mut out = vec![0i64; len];
    for n in 0..len.div_ceil(2) {
        // |2n / (N - 1) - 1| in Q30
        let r = ((span - 2 * n as i64) << MANTISSA_FRAC_BITS) / span;
        let r2 = (r * r) >> MANTISSA_FRAC_BITS;
        let root = isqrt(((one - r2) as u64) << MANTISSA_FRAC_BITS) as i64;
        let num = i0_fixed(pia.mul(ScaledValue::from_fixed(root, MANTISSA_FRAC_BITS)));

        let ratio = ((num.mantissa() as i64) << MANTISSA_FRAC_BITS) / den.mantissa() as i64;
        let shift = (num.exponent() - den.exponent()) + format.frac_bits() as i32
            - MANTISSA_FRAC_BITS as i32;
        let w = format.saturate(shift_raw(ratio, shift));
        out[n] = w;
        out[len - 1 - n] = w;
    }
    Ok(out)
}

/// Kaiser window of `len` points in the sample type `S`.
///
/// `NumericFormat::Float` uses the `f64` evaluator; fixed formats use
/// [`kaiser_fixed`].
///
/// # Errors
/// `DspError::InvalidWindow` for the cases listed in [`validate`], and
/// `DspError::FormatMismatch` when `format` does not describe `S`.
pub fn kaiser<S: Sample>(len: usize, alpha: f64, format: NumericFormat) -> Result<Vec<S>> {
    S::frac_bits(format)?;
    match format {
        NumericFormat::Float => Ok(kaiser_real(len, alpha)?
            .into_iter()
            .map(|w| S::from_real(w, 0))
            .collect()),
        NumericFormat::Fixed(q) => Ok(kaiser_fixed(len, alpha, q)?
            .into_iter()
            .map(S::from_raw)
            .collect()),
    }
}
