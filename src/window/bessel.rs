//! Modified Bessel function of the first kind, order zero.
//!
//! The fixed-point evaluator follows Abramowitz & Stegun 9.8.1 and 9.8.2:
//!
//! - `x < 3.75`: polynomial in `(x / 3.75)^2`, evaluated in Q27.
//! - `x >= 3.75`: `I0(x) = e^x / sqrt(x) * P(3.75 / x)`, with `P` evaluated in
//!   Q30. `e^x` alone overflows any fixed word long before Kaiser windows
//!   stop being useful, so the result is carried as a [`ScaledValue`].

use crate::constants::{
    BESSEL_LARGE_Q30, BESSEL_SMALL_Q27, BESSEL_THRESHOLD_Q24, INV_BESSEL_THRESHOLD_Q30,
    MANTISSA_FRAC_BITS,
};
use crate::fixed_point::ScaledValue;

const SMALL_FRAC_BITS: u32 = 27;

/// Fixed-point `I0(x)` for `x >= 0`. Negative inputs are treated as zero.
pub fn i0_fixed(x: ScaledValue) -> ScaledValue {
    if x.mantissa() <= 0 {
        return ScaledValue::ONE;
    }
    if x.to_fixed(24) < BESSEL_THRESHOLD_Q24 {
        small_argument(x)
    } else {
        large_argument(x)
    }
}

fn small_argument(x: ScaledValue) -> ScaledValue {
    let x_q30 = x.to_fixed(MANTISSA_FRAC_BITS);
    let r = (x_q30 * INV_BESSEL_THRESHOLD_Q30) >> MANTISSA_FRAC_BITS;
    let y = (r * r) >> MANTISSA_FRAC_BITS;
    let acc = horner(&BESSEL_SMALL_Q27, y);
    ScaledValue::from_fixed(acc, SMALL_FRAC_BITS)
}

fn large_argument(x: ScaledValue) -> ScaledValue {
    let threshold = ScaledValue::from_fixed(BESSEL_THRESHOLD_Q24, 24);
    let Some(t) = threshold.checked_div(x) else {
        return ScaledValue::ONE;
    };
    let p = horner(&BESSEL_LARGE_Q30, t.to_fixed(MANTISSA_FRAC_BITS));
    let scaled = x.exp().mul(ScaledValue::from_fixed(p, MANTISSA_FRAC_BITS));
    scaled.checked_div(x.sqrt()).unwrap_or(ScaledValue::ZERO)
}

/// `sum coeffs[i] * t^i` with `t` in Q30; the result keeps the coefficients'
/// format.
fn horner(coeffs: &[i64], t: i64) -> i64 {
    coeffs
        .iter()
        .rev()
        .fold(0i64, |acc, &c| ((acc * t) >> MANTISSA_FRAC_BITS) + c)
}

/// Floating-point `I0(x)` by its power series, summed until the next term
/// no longer changes the result.
pub fn i0(x: f64) -> f64 {
    let q = x * x / 4.0;
    let mut sum = 1.0;
    let mut term = 1.0;
    let mut k = 1.0;
    loop {
        term *= q / (k * k);
        sum += term;
        if term < sum * 1e-17 {
            return sum;
        }
        k += 1.0;
    }
}
