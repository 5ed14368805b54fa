//! Numeric constants shared by the fixed-point kernels
//!
//! Raw integer constants carry their Q-format in the name suffix. They were
//! produced by rounding the real value to the nearest representable step.

/// Number of elements processed per iteration by the unrolled kernels.
pub const LANES: usize = 4;

/// Fractional bits of a `ScaledValue` mantissa.
pub const MANTISSA_FRAC_BITS: u32 = 30;

/// Argument at which the I0 evaluator switches from the power-series
/// polynomial to the asymptotic expansion (Abramowitz & Stegun 9.8.1/9.8.2).
pub const BESSEL_THRESHOLD: f64 = 3.75;

/// `BESSEL_THRESHOLD` in Q24.
pub const BESSEL_THRESHOLD_Q24: i64 = 62_914_560;

/// `1 / BESSEL_THRESHOLD` in Q30.
pub const INV_BESSEL_THRESHOLD_Q30: i64 = 286_331_153;

/// Polynomial for `I0(x)`, `x < 3.75`, in powers of `(x / 3.75)^2`. Q27.
pub const BESSEL_SMALL_Q27: [i64; 7] = [
    134_217_728,
    471_858_918,
    414_725_049,
    161_967_136,
    35_698_319,
    4_842_146,
    614_892,
];

/// Polynomial for `sqrt(x) * exp(-x) * I0(x)`, `x >= 3.75`, in powers of
/// `3.75 / x`. Q30.
pub const BESSEL_LARGE_Q30: [i64; 9] = [
    428_361_011,
    14_265_648,
    2_419_344,
    -1_691_841,
    9_838_492,
    -22_094_450,
    28_298_863,
    -17_691_325,
    4_213_116,
];

/// `log2(e)` in Q30.
pub const LOG2_E_Q30: i64 = 1_549_082_005;

/// `ln(2)` in Q30.
pub const LN_2_Q30: i64 = 744_261_118;

/// `pi` in Q30.
pub const PI_Q30: i64 = 3_373_259_426;

/// Fractional bits used when the Kaiser alpha enters the fixed-point domain.
pub const ALPHA_FRAC_BITS: u32 = 24;

/// Largest Kaiser alpha accepted. Beyond this `I0(pi * alpha)` no longer
/// fits an `f64`, so the float reference path would overflow.
pub const MAX_KAISER_ALPHA: f64 = 200.0;

/// Taps per polyphase branch used when no order is configured.
pub const DEFAULT_TAPS_PER_PHASE: usize = 60;
