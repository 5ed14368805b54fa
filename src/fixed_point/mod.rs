//! Q-format definitions and real <-> fixed conversion.
//!
//! A Q-format stores a real value `v` as the integer `floor(v * 2^Q)` in a
//! word of `width` bits, where `Q` is the number of fractional bits.
//!
//! Conversions in this module never report precision loss: `to_fixed`
//! rounds toward negative infinity and `rescale` truncates when it drops
//! fractional bits. Neither checks that the result fits in `width` bits;
//! keeping values in range is the caller's job. Use [`QFormat::saturate`]
//! when clamping is wanted.

pub mod ops;
pub mod scaled;

use crate::error::{DspError, Result};
use std::fmt;

pub use scaled::ScaledValue;

/// A fixed-point format: word width and fractional bit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QFormat {
    width: u32,
    frac_bits: u32,
}

impl QFormat {
    /// 16-bit word, 15 fractional bits. Range `[-1, 1)`.
    pub const Q1_15: QFormat = QFormat {
        width: 16,
        frac_bits: 15,
    };

    /// 32-bit word, 31 fractional bits. Range `[-1, 1)`.
    pub const Q1_31: QFormat = QFormat {
        width: 32,
        frac_bits: 31,
    };

    /// Create a format, checking `2 <= width <= 32` and `frac_bits < width`.
    ///
    /// # Errors
    /// Returns `DspError::InvalidFormat` for any other combination.
    pub fn new(width: u32, frac_bits: u32) -> Result<Self> {
        if !(2..=32).contains(&width) || frac_bits >= width {
            return Err(DspError::InvalidFormat { width, frac_bits });
        }
        Ok(Self { width, frac_bits })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn frac_bits(&self) -> u32 {
        self.frac_bits
    }

    /// Integer bits including the sign bit.
    pub fn int_bits(&self) -> u32 {
        self.width - self.frac_bits
    }

    /// Smallest raw value representable in `width` bits.
    pub fn min_raw(&self) -> i64 {
        -(1i64 << (self.width - 1))
    }

    /// Largest raw value representable in `width` bits.
    pub fn max_raw(&self) -> i64 {
        (1i64 << (self.width - 1)) - 1
    }

    /// Real value of one least-significant bit.
    pub fn resolution(&self) -> f64 {
        1.0 / self.scale()
    }

    /// Smallest representable real value.
    pub fn min_real(&self) -> f64 {
        self.min_raw() as f64 / self.scale()
    }

    /// Largest representable real value.
    pub fn max_real(&self) -> f64 {
        self.max_raw() as f64 / self.scale()
    }

    /// Clamp a raw value into the representable range.
    pub fn saturate(&self, raw: i64) -> i64 {
        raw.clamp(self.min_raw(), self.max_raw())
    }

    /// `to_fixed` followed by `saturate`.
    pub fn quantize(&self, value: f64) -> i64 {
        self.saturate(to_fixed(value, *self))
    }

    fn scale(&self) -> f64 {
        (1u64 << self.frac_bits) as f64
    }
}

impl fmt::Display for QFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}.{}", self.int_bits(), self.frac_bits)
    }
}

/// Numeric representation an operation is configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericFormat {
    /// Integer samples interpreted under a Q-format
    Fixed(QFormat),
    /// Native floating-point samples
    Float,
}

impl fmt::Display for NumericFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericFormat::Fixed(q) => write!(f, "{}", q),
            NumericFormat::Float => write!(f, "float"),
        }
    }
}

/// Convert a real value to raw fixed-point, rounding toward negative infinity.
///
/// `to_fixed(-0.00001, Q1_15)` is `-1`, not `0`. Values outside the
/// format's range are not clamped.
pub fn to_fixed(value: f64, format: QFormat) -> i64 {
    (value * format.scale()).floor() as i64
}

/// Convert a raw fixed-point value to real. Exact for `|raw| < 2^53`.
pub fn to_real(raw: i64, format: QFormat) -> f64 {
    raw as f64 / format.scale()
}

/// Move a raw value from one Q-format to another.
///
/// Gaining fractional bits shifts left. Losing them shifts right
/// arithmetically, which discards the low bits (floor), never rounds.
pub fn rescale(raw: i64, from: QFormat, to: QFormat) -> i64 {
    if to.frac_bits >= from.frac_bits {
        raw << (to.frac_bits - from.frac_bits)
    } else {
        raw >> (from.frac_bits - to.frac_bits)
    }
}
