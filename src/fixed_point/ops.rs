//! Integer square root and exponential kernels used by the Bessel evaluator.

use crate::constants::MANTISSA_FRAC_BITS;

/// Floor of the square root of `value`.
pub fn isqrt(value: u64) -> u64 {
    if value < 2 {
        return value;
    }
    // Bit-by-bit method: settle one result bit per iteration from the top.
    let mut rem = value;
    let mut root = 0u64;
    let mut bit = 1u64 << ((63 - value.leading_zeros()) & !1);
    while bit != 0 {
        if rem >= root + bit {
            rem -= root + bit;
            root = (root >> 1) + bit;
        } else {
            root >>= 1;
        }
        bit >>= 2;
    }
    root
}

/// Square root of a non-negative raw value, result in the same Q-format.
///
/// Negative inputs return 0. `raw << frac_bits` must fit in 64 bits.
pub fn sqrt_q(raw: i64, frac_bits: u32) -> i64 {
    if raw <= 0 {
        return 0;
    }
    isqrt((raw as u64) << frac_bits) as i64
}

/// `e^u` for `u` in Q30, `0 <= u <= ln 2`. Result in Q30, in `[1, 2]`.
///
/// Taylor series; each term is truncated, so the result is biased low by at
/// most a few LSB.
pub fn exp_q30(u: i64) -> i64 {
    let one = 1i64 << MANTISSA_FRAC_BITS;
    let mut sum = one;
    let mut term = one;
    for k in 1..24 {
        term = ((term * u) >> MANTISSA_FRAC_BITS) / k;
        if term == 0 {
            break;
        }
        sum += term;
    }
    sum
}
