//! Numeric sample representations.
//!
//! A [`Sample`] ties one storage type to the accumulator its products are
//! summed in and to the overflow policy of its arithmetic. Fixed-point types
//! wrap on overflow and narrow accumulators with a truncating arithmetic
//! shift; floating-point types use native arithmetic and ignore shifts.

use crate::error::{DspError, Result};
use crate::fixed_point::NumericFormat;
use std::fmt::Debug;

pub trait Sample: Copy + Default + PartialOrd + Debug + Send + Sync + 'static {
    /// Widened type products are accumulated in.
    type Acc: Copy + Default + Debug;

    const ZERO: Self;

    /// Storage width in bits, for fixed-point types. Zero for floats.
    const WIDTH: u32;

    fn wrapping_add(self, rhs: Self) -> Self;
    fn wrapping_sub(self, rhs: Self) -> Self;
    fn wrapping_neg(self) -> Self;

    /// `acc + a * b` in the accumulator type, wrapping on overflow.
    fn mac(acc: Self::Acc, a: Self, b: Self) -> Self::Acc;

    /// Narrow an accumulator back to a sample after an arithmetic right
    /// shift by `shift` bits. The narrowing itself wraps.
    fn narrow(acc: Self::Acc, shift: u32) -> Self;

    /// `(self * rhs) >> shift`.
    fn mul_shift(self, rhs: Self, shift: u32) -> Self {
        Self::narrow(Self::mac(Self::Acc::default(), self, rhs), shift)
    }

    /// Convert from a real value: floor, then saturate to the word.
    fn from_real(value: f64, frac_bits: u32) -> Self;

    fn to_real(self, frac_bits: u32) -> f64;

    /// Convert from a raw fixed-point integer, saturating to the word.
    fn from_raw(raw: i64) -> Self;

    /// Fractional bits this type uses under `format`.
    ///
    /// # Errors
    /// `DspError::FormatMismatch` if `format` does not describe this type,
    /// e.g. a Q1.31 format for `i16` samples or a fixed format for `f32`.
    fn frac_bits(format: NumericFormat) -> Result<u32>;
}

macro_rules! impl_fixed_sample {
    ($t:ty, $acc:ty, $width:expr) => {
        impl Sample for $t {
            type Acc = $acc;

            const ZERO: Self = 0;
            const WIDTH: u32 = $width;

            #[inline]
            fn wrapping_add(self, rhs: Self) -> Self {
                <$t>::wrapping_add(self, rhs)
            }

            #[inline]
            fn wrapping_sub(self, rhs: Self) -> Self {
                <$t>::wrapping_sub(self, rhs)
            }

            #[inline]
            fn wrapping_neg(self) -> Self {
                <$t>::wrapping_neg(self)
            }

            #[inline]
            fn mac(acc: $acc, a: Self, b: Self) -> $acc {
                acc.wrapping_add(a as $acc * b as $acc)
            }

            #[inline]
            fn narrow(acc: $acc, shift: u32) -> Self {
                (acc >> shift) as $t
            }

            fn from_real(value: f64, frac_bits: u32) -> Self {
                let raw = (value * (1u64 << frac_bits) as f64).floor();
                raw.clamp(<$t>::MIN as f64, <$t>::MAX as f64) as $t
            }

            fn to_real(self, frac_bits: u32) -> f64 {
                self as f64 / (1u64 << frac_bits) as f64
            }

            fn from_raw(raw: i64) -> Self {
                raw.clamp(<$t>::MIN as i64, <$t>::MAX as i64) as $t
            }

            fn frac_bits(format: NumericFormat) -> Result<u32> {
                match format {
                    NumericFormat::Fixed(q) if q.width() == $width => Ok(q.frac_bits()),
                    other => Err(DspError::FormatMismatch(format!(
                        "{} samples cannot hold {}",
                        stringify!($t),
                        other
                    ))),
                }
            }
        }
    };
}

macro_rules! impl_float_sample {
    ($t:ty) => {
        impl Sample for $t {
            type Acc = $t;

            const ZERO: Self = 0.0;
            const WIDTH: u32 = 0;

            #[inline]
            fn wrapping_add(self, rhs: Self) -> Self {
                self + rhs
            }

            #[inline]
            fn wrapping_sub(self, rhs: Self) -> Self {
                self - rhs
            }

            #[inline]
            fn wrapping_neg(self) -> Self {
                -self
            }

            #[inline]
            fn mac(acc: $t, a: Self, b: Self) -> $t {
                acc + a * b
            }

            #[inline]
            fn narrow(acc: $t, _shift: u32) -> Self {
                acc
            }

            fn from_real(value: f64, _frac_bits: u32) -> Self {
                value as $t
            }

            fn to_real(self, _frac_bits: u32) -> f64 {
                self as f64
            }

            fn from_raw(raw: i64) -> Self {
                raw as $t
            }

            fn frac_bits(format: NumericFormat) -> Result<u32> {
                match format {
                    NumericFormat::Float => Ok(0),
                    other => Err(DspError::FormatMismatch(format!(
                        "{} samples cannot hold {}",
                        stringify!($t),
                        other
                    ))),
                }
            }
        }
    };
}

impl_fixed_sample!(i16, i32, 16);
impl_fixed_sample!(i32, i64, 32);
impl_float_sample!(f32);
impl_float_sample!(f64);
