use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DspError {
    #[error("Buffer length mismatch: expected {expected} samples, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Invalid Q-format: {frac_bits} fractional bits in a {width}-bit word")]
    InvalidFormat { width: u32, frac_bits: u32 },

    #[error("Invalid shift: {shift} bits on a {acc_bits}-bit accumulator")]
    InvalidShift { shift: u32, acc_bits: u32 },

    #[error("Numeric format mismatch: {0}")]
    FormatMismatch(String),

    #[error("Invalid window: {0}")]
    InvalidWindow(String),

    #[error("Invalid sample rate: {0}")]
    InvalidRate(String),

    #[error("Invalid coefficient set: {0}")]
    InvalidCoefficients(String),

    #[error("Output buffer too small: need {needed} samples, have {available}")]
    OutputTooSmall { needed: usize, available: usize },

    #[error("Filter design failed: {0}")]
    FilterDesign(String),
}

pub type Result<T> = std::result::Result<T, DspError>;

/// Fail with `LengthMismatch` unless `actual == expected`.
pub(crate) fn check_len(expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(DspError::LengthMismatch { expected, actual })
    }
}
