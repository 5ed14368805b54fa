use crate::constants::{LN_2_Q30, LOG2_E_Q30, MANTISSA_FRAC_BITS};
use crate::fixed_point::ops::{exp_q30, isqrt};

/// A fixed-point mantissa paired with a power-of-two exponent.
///
/// Represents `mantissa * 2^-30 * 2^exponent`. A non-zero mantissa is kept
/// normalized so that `2^29 <= |mantissa| < 2^30`, i.e. its magnitude lies in
/// `[0.5, 1)`. Zero is stored as `(0, 0)`.
///
/// This is what lets a 32-bit word carry values such as `I0(600) ~ 1e258`:
/// range lives in the exponent, precision in the mantissa. Every operation
/// widens to 64 bits, works on the mantissas, then renormalizes. Low bits
/// lost while renormalizing are truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaledValue {
    mantissa: i32,
    exponent: i32,
}

const NORM_BITS: u32 = MANTISSA_FRAC_BITS;

impl ScaledValue {
    pub const ZERO: ScaledValue = ScaledValue {
        mantissa: 0,
        exponent: 0,
    };

    pub const ONE: ScaledValue = ScaledValue {
        mantissa: 1 << (NORM_BITS - 1),
        exponent: 1,
    };

    /// Normalize an arbitrary 64-bit mantissa with its exponent.
    pub fn normalize(mantissa: i64, exponent: i32) -> Self {
        if mantissa == 0 {
            return Self::ZERO;
        }
        let negative = mantissa < 0;
        let mut mag = mantissa.unsigned_abs();
        let mut exponent = exponent;
        let bits = 64 - mag.leading_zeros();
        if bits > NORM_BITS {
            let shift = bits - NORM_BITS;
            mag >>= shift;
            exponent += shift as i32;
        } else if bits < NORM_BITS {
            let shift = NORM_BITS - bits;
            mag <<= shift;
            exponent -= shift as i32;
        }
        let mag = mag as i32;
        Self {
            mantissa: if negative { -mag } else { mag },
            exponent,
        }
    }

    /// Build from a raw fixed-point value with `frac_bits` fractional bits.
    pub fn from_fixed(raw: i64, frac_bits: u32) -> Self {
        Self::normalize(raw, NORM_BITS as i32 - frac_bits as i32)
    }

    /// Convert to a raw fixed-point value with `frac_bits` fractional bits.
    ///
    /// Right shifts truncate toward negative infinity. Shifts of 63 bits or
    /// more collapse to `0` (or `-1` for negative values); left shifts that
    /// would overflow saturate.
    pub fn to_fixed(self, frac_bits: u32) -> i64 {
        shift_raw(
            self.mantissa as i64,
            self.exponent - NORM_BITS as i32 + frac_bits as i32,
        )
    }

    pub fn mantissa(&self) -> i32 {
        self.mantissa
    }

    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa == 0
    }

    pub fn mul(self, rhs: Self) -> Self {
        let product = (self.mantissa as i64 * rhs.mantissa as i64) >> NORM_BITS;
        Self::normalize(product, self.exponent + rhs.exponent)
    }

    /// Quotient with the mantissa division done in 64 bits. `None` when
    /// dividing by zero.
    pub fn checked_div(self, rhs: Self) -> Option<Self> {
        if rhs.is_zero() {
            return None;
        }
        let quotient = ((self.mantissa as i64) << NORM_BITS) / rhs.mantissa as i64;
        Some(Self::normalize(quotient, self.exponent - rhs.exponent))
    }

    pub fn add(self, rhs: Self) -> Self {
        if self.is_zero() {
            return rhs;
        }
        if rhs.is_zero() {
            return self;
        }
        let (hi, lo) = if self.exponent >= rhs.exponent {
            (self, rhs)
        } else {
            (rhs, self)
        };
        let aligned = shift_raw(lo.mantissa as i64, lo.exponent - hi.exponent);
        Self::normalize(hi.mantissa as i64 + aligned, hi.exponent)
    }

    /// Square root of a non-negative value. Negative values give zero.
    pub fn sqrt(self) -> Self {
        if self.mantissa <= 0 {
            return Self::ZERO;
        }
        let (mantissa, exponent) = if self.exponent % 2 != 0 {
            ((self.mantissa as u64) << 1, self.exponent - 1)
        } else {
            (self.mantissa as u64, self.exponent)
        };
        let root = isqrt(mantissa << NORM_BITS);
        Self::normalize(root as i64, exponent / 2)
    }

    /// `e^x` for `x >= 0`.
    ///
    /// `x * log2(e)` is split into an integer part `k`, which goes straight
    /// into the exponent, and a fraction `f` for which `2^f = e^(f ln 2)` is
    /// evaluated by the Q30 exponential kernel.
    pub fn exp(self) -> Self {
        if self.mantissa <= 0 {
            return Self::ONE;
        }
        let x_q30 = self.to_fixed(NORM_BITS) as i128;
        let t = (x_q30 * LOG2_E_Q30 as i128) >> NORM_BITS;
        let k = (t >> NORM_BITS) as i32;
        let f = (t & ((1i128 << NORM_BITS) - 1)) as i64;
        let u = (f * LN_2_Q30) >> NORM_BITS;
        let mut result = Self::from_fixed(exp_q30(u), NORM_BITS);
        result.exponent += k;
        result
    }

    /// Approximate real value, for diagnostics and tests.
    pub fn to_f64(self) -> f64 {
        self.mantissa as f64 * 2f64.powi(self.exponent - NORM_BITS as i32)
    }
}

/// Shift left for positive `shift`, arithmetic right for negative.
pub(crate) fn shift_raw(raw: i64, shift: i32) -> i64 {
    if shift >= 0 {
        if shift >= 63 || raw.unsigned_abs().leading_zeros() <= shift as u32 + 1 {
            if raw == 0 {
                0
            } else if raw > 0 {
                i64::MAX
            } else {
                i64::MIN
            }
        } else {
            raw << shift
        }
    } else if shift <= -63 {
        if raw < 0 { -1 } else { 0 }
    } else {
        raw >> (-shift)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalize_invariant() {
        for raw in [1i64, 3, 1 << 29, (1 << 30) - 1, 1 << 40, -7, -(1 << 45)] {
            let v = ScaledValue::from_fixed(raw, 10);
            let mag = v.mantissa().unsigned_abs();
            assert!(
                (1 << 29..1 << 30).contains(&mag),
                "mantissa {} not normalized",
                v.mantissa()
            );
            assert_relative_eq!(v.to_f64(), raw as f64 / 1024.0, max_relative = 1e-8);
        }
        assert!(ScaledValue::from_fixed(0, 12).is_zero());
    }

    #[test]
    fn test_one() {
        assert_eq!(ScaledValue::ONE.to_f64(), 1.0);
        assert_eq!(ScaledValue::from_fixed(1 << 15, 15), ScaledValue::ONE);
        assert_eq!(ScaledValue::ONE.to_fixed(15), 1 << 15);
    }

    #[test]
    fn test_arithmetic() {
        let a = ScaledValue::from_fixed(3 << 20, 20);
        let b = ScaledValue::from_fixed(5 << 18, 20);
        assert_relative_eq!(a.mul(b).to_f64(), 3.75, max_relative = 1e-8);
        assert_relative_eq!(a.checked_div(b).unwrap().to_f64(), 2.4, max_relative = 1e-8);
        assert_relative_eq!(a.add(b).to_f64(), 4.25, max_relative = 1e-8);
        assert!(a.checked_div(ScaledValue::ZERO).is_none());
    }

    #[test]
    fn test_dynamic_range() {
        // 2^200 is far beyond any 64-bit fixed-point word
        let mut v = ScaledValue::ONE;
        let two = ScaledValue::from_fixed(2, 0);
        for _ in 0..200 {
            v = v.mul(two);
        }
        assert_eq!(v.exponent(), 201);
        assert_eq!(v.to_fixed(0), i64::MAX);
        let back = v.checked_div(v).unwrap();
        assert_eq!(back, ScaledValue::ONE);
    }

    #[test]
    fn test_sqrt() {
        for x in [0.25, 2.0, 3.75, 1000.0, 1.0 / 1024.0] {
            let v = ScaledValue::from_fixed((x * (1u64 << 30) as f64) as i64, 30);
            assert_relative_eq!(v.sqrt().to_f64(), x.sqrt(), max_relative = 1e-7);
        }
    }

    #[test]
    fn test_exp() {
        for x in [0.0, 0.5, 1.0, 3.75, 20.0, 100.0, 600.0] {
            let v = ScaledValue::from_fixed((x * (1u64 << 24) as f64) as i64, 24);
            assert_relative_eq!(v.exp().to_f64(), f64::exp(x), max_relative = 2e-7);
        }
    }

    #[test]
    fn test_shift_raw() {
        assert_eq!(shift_raw(5, 2), 20);
        assert_eq!(shift_raw(-5, -1), -3);
        assert_eq!(shift_raw(5, -80), 0);
        assert_eq!(shift_raw(-5, -80), -1);
        assert_eq!(shift_raw(1, 70), i64::MAX);
    }
}
