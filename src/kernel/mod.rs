//! Elementwise vector arithmetic and convolution primitives.
//!
//! Two implementations of [`VectorKernel`] exist: [`GenericKernel`], a
//! plain per-element reference, and [`UnrolledKernel`], which works in groups
//! of [`LANES`](crate::constants::LANES) with an explicit remainder match.
//! Both produce bit-identical output for every input length, floating point
//! included. [`KernelDispatch`] picks one from configuration and is what
//! filters and resamplers hold.
//!
//! Fixed-point arithmetic wraps on overflow. Products are formed in the
//! sample's widened accumulator and narrowed with an arithmetic right shift
//! by `shift` bits, which truncates toward negative infinity. A shift at or
//! beyond the accumulator width is rejected with `DspError::InvalidShift`.
//! Floating-point samples ignore `shift`.

mod generic;
mod unrolled;

pub use generic::GenericKernel;
pub use unrolled::UnrolledKernel;

use crate::config::{Backend, KernelConfig};
use crate::error::{DspError, Result, check_len};
use crate::sample::Sample;

pub trait VectorKernel {
    /// `dst[i] = a[i] + b[i]`
    fn add<S: Sample>(&self, dst: &mut [S], a: &[S], b: &[S]) -> Result<()>;

    /// `dst[i] = a[i] - b[i]`
    fn sub<S: Sample>(&self, dst: &mut [S], a: &[S], b: &[S]) -> Result<()>;

    /// `dst[i] = -src[i]`. The most negative fixed-point value maps to itself.
    fn negate<S: Sample>(&self, dst: &mut [S], src: &[S]) -> Result<()>;

    /// `dst[i] = (src[i] * k) >> shift`
    fn scale<S: Sample>(&self, dst: &mut [S], src: &[S], k: S, shift: u32) -> Result<()>;

    /// `dst[i] = (a[i] * b[i]) >> shift`
    fn dot_mul<S: Sample>(&self, dst: &mut [S], a: &[S], b: &[S], shift: u32) -> Result<()>;

    /// `dst[i] += (a[i] * b[i]) >> shift`
    fn mac<S: Sample>(&self, dst: &mut [S], a: &[S], b: &[S], shift: u32) -> Result<()>;

    /// Valid-region convolution.
    ///
    /// `dst[n] = (sum_k taps[k] * x[n + K - 1 - k]) >> shift` for
    /// `n in 0..x.len() - K + 1`, where `K = taps.len()`. No padding is
    /// applied: `x` must already contain whatever history the caller wants
    /// the first output to see.
    fn convolve_partial<S: Sample>(
        &self,
        dst: &mut [S],
        x: &[S],
        taps: &[S],
        shift: u32,
    ) -> Result<()>;

    /// One convolution output: `(sum_j taps[j] * window[K - 1 - j]) >> shift`.
    ///
    /// `window` holds the `K` most recent inputs, oldest first.
    fn convolve_point<S: Sample>(&self, window: &[S], taps: &[S], shift: u32) -> Result<S>;
}

/// Runtime-selected kernel implementation.
///
/// Resolved once at construction; every call afterwards delegates without
/// re-checking configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelDispatch {
    Generic(GenericKernel),
    Unrolled(UnrolledKernel),
}

impl KernelDispatch {
    /// Create a dispatcher for `backend`, subject to [`Backend::resolve`].
    pub fn new(backend: Backend) -> Self {
        match backend.resolve() {
            Backend::Generic => KernelDispatch::Generic(GenericKernel),
            Backend::Unrolled => KernelDispatch::Unrolled(UnrolledKernel),
        }
    }

    pub fn from_config(config: &KernelConfig) -> Self {
        Self::new(config.backend)
    }

    /// The backend actually in use.
    pub fn backend(&self) -> Backend {
        match self {
            KernelDispatch::Generic(_) => Backend::Generic,
            KernelDispatch::Unrolled(_) => Backend::Unrolled,
        }
    }
}

impl Default for KernelDispatch {
    fn default() -> Self {
        Self::new(Backend::default())
    }
}

impl VectorKernel for KernelDispatch {
    fn add<S: Sample>(&self, dst: &mut [S], a: &[S], b: &[S]) -> Result<()> {
        match self {
            KernelDispatch::Generic(k) => k.add(dst, a, b),
            KernelDispatch::Unrolled(k) => k.add(dst, a, b),
        }
    }

    fn sub<S: Sample>(&self, dst: &mut [S], a: &[S], b: &[S]) -> Result<()> {
        match self {
            KernelDispatch::Generic(k) => k.sub(dst, a, b),
            KernelDispatch::Unrolled(k) => k.sub(dst, a, b),
        }
    }

    fn negate<S: Sample>(&self, dst: &mut [S], src: &[S]) -> Result<()> {
        match self {
            KernelDispatch::Generic(k) => k.negate(dst, src),
            KernelDispatch::Unrolled(k) => k.negate(dst, src),
        }
    }

    fn scale<S: Sample>(&self, dst: &mut [S], src: &[S], k: S, shift: u32) -> Result<()> {
        match self {
            KernelDispatch::Generic(g) => g.scale(dst, src, k, shift),
            KernelDispatch::Unrolled(u) => u.scale(dst, src, k, shift),
        }
    }

    fn dot_mul<S: Sample>(&self, dst: &mut [S], a: &[S], b: &[S], shift: u32) -> Result<()> {
        match self {
            KernelDispatch::Generic(k) => k.dot_mul(dst, a, b, shift),
            KernelDispatch::Unrolled(k) => k.dot_mul(dst, a, b, shift),
        }
    }

    fn mac<S: Sample>(&self, dst: &mut [S], a: &[S], b: &[S], shift: u32) -> Result<()> {
        match self {
            KernelDispatch::Generic(k) => k.mac(dst, a, b, shift),
            KernelDispatch::Unrolled(k) => k.mac(dst, a, b, shift),
        }
    }

    fn convolve_partial<S: Sample>(
        &self,
        dst: &mut [S],
        x: &[S],
        taps: &[S],
        shift: u32,
    ) -> Result<()> {
        match self {
            KernelDispatch::Generic(k) => k.convolve_partial(dst, x, taps, shift),
            KernelDispatch::Unrolled(k) => k.convolve_partial(dst, x, taps, shift),
        }
    }

    fn convolve_point<S: Sample>(&self, window: &[S], taps: &[S], shift: u32) -> Result<S> {
        match self {
            KernelDispatch::Generic(k) => k.convolve_point(window, taps, shift),
            KernelDispatch::Unrolled(k) => k.convolve_point(window, taps, shift),
        }
    }
}

/// `dst[i] = src[i]`
pub fn copy<S: Sample>(dst: &mut [S], src: &[S]) -> Result<()> {
    check_len(dst.len(), src.len())?;
    dst.copy_from_slice(src);
    Ok(())
}

/// Copy `src` into the front of `dst` and zero the rest.
///
/// # Errors
/// `DspError::OutputTooSmall` if `dst` is shorter than `src`.
pub fn zero_pad<S: Sample>(dst: &mut [S], src: &[S]) -> Result<()> {
    if dst.len() < src.len() {
        return Err(DspError::OutputTooSmall {
            needed: src.len(),
            available: dst.len(),
        });
    }
    let (head, tail) = dst.split_at_mut(src.len());
    head.copy_from_slice(src);
    tail.fill(S::ZERO);
    Ok(())
}

/// Smallest element, `None` for an empty buffer.
pub fn min<S: Sample>(src: &[S]) -> Option<S> {
    src.iter()
        .copied()
        .reduce(|m, x| if x < m { x } else { m })
}

/// Largest element, `None` for an empty buffer.
pub fn max<S: Sample>(src: &[S]) -> Option<S> {
    src.iter()
        .copied()
        .reduce(|m, x| if x > m { x } else { m })
}

/// Validate a two-operand elementwise call.
fn check_binary<S>(dst: &[S], a: &[S], b: &[S]) -> Result<()> {
    check_len(dst.len(), a.len())?;
    check_len(dst.len(), b.len())
}

/// Validate a convolution call, returning the tap count.
fn check_convolve<S>(dst: &[S], x: &[S], taps: &[S]) -> Result<usize> {
    if taps.is_empty() {
        return Err(DspError::InvalidCoefficients(
            "convolution needs at least one tap".to_string(),
        ));
    }
    check_len((x.len() + 1).saturating_sub(taps.len()), dst.len())?;
    Ok(taps.len())
}

/// Reject shifts at or beyond the fixed-point accumulator width.
fn check_shift<S: Sample>(shift: u32) -> Result<()> {
    let acc_bits = 2 * S::WIDTH;
    if acc_bits > 0 && shift >= acc_bits {
        return Err(DspError::InvalidShift { shift, acc_bits });
    }
    Ok(())
}

fn check_point<S>(window: &[S], taps: &[S]) -> Result<()> {
    if taps.is_empty() {
        return Err(DspError::InvalidCoefficients(
            "convolution needs at least one tap".to_string(),
        ));
    }
    check_len(taps.len(), window.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_resolves_backend() {
        let generic = KernelDispatch::new(Backend::Generic);
        assert_eq!(generic.backend(), Backend::Generic);

        let unrolled = KernelDispatch::new(Backend::Unrolled);
        let expected = if cfg!(feature = "force-generic") {
            Backend::Generic
        } else {
            Backend::Unrolled
        };
        assert_eq!(unrolled.backend(), expected);
    }

    #[test]
    fn test_length_mismatch() {
        let k = KernelDispatch::default();
        let mut dst = [0i16; 3];
        assert_eq!(
            k.add(&mut dst, &[1, 2, 3], &[1, 2]),
            Err(DspError::LengthMismatch {
                expected: 3,
                actual: 2
            })
        );
        assert!(k.negate(&mut dst, &[1, 2]).is_err());
        assert!(k.convolve_partial(&mut dst, &[1, 2, 3], &[1, 1], 0).is_err());
        assert!(k.convolve_point(&[1, 2], &[] as &[i16], 0).is_err());
    }

    #[test]
    fn test_shift_beyond_accumulator_is_rejected() {
        for backend in [Backend::Generic, Backend::Unrolled] {
            let k = KernelDispatch::new(backend);
            let mut dst = [0i16; 1];
            assert_eq!(
                k.scale(&mut dst, &[100i16], 100, 40),
                Err(DspError::InvalidShift {
                    shift: 40,
                    acc_bits: 32
                })
            );
            assert!(k.dot_mul(&mut dst, &[1], &[1], 32).is_err());
            assert!(k.mac(&mut dst, &[1], &[1], 32).is_err());
            assert!(k.convolve_point(&[1i16], &[1], 32).is_err());
            assert!(k.convolve_partial(&mut dst, &[1i16], &[1], 32).is_err());

            // Largest valid shift still works
            k.scale(&mut dst, &[i16::MIN], i16::MIN, 31).unwrap();
            assert_eq!(dst, [0]);
            let mut wide = [0i32; 1];
            assert!(k.scale(&mut wide, &[1i32], 1, 64).is_err());
            k.scale(&mut wide, &[i32::MIN], -1, 63).unwrap();
            assert_eq!(wide, [0]);

            // Floats ignore the shift
            let mut out = [0.0f32; 1];
            k.scale(&mut out, &[0.5], 2.0, 200).unwrap();
            assert_eq!(out, [1.0]);
        }
    }

    #[test]
    fn test_copy_and_zero_pad() {
        let mut dst = [9i32; 5];
        zero_pad(&mut dst, &[1, 2]).unwrap();
        assert_eq!(dst, [1, 2, 0, 0, 0]);
        assert!(zero_pad(&mut dst[..1], &[1, 2]).is_err());

        let mut out = [0.0f32; 2];
        copy(&mut out, &[0.5, -0.25]).unwrap();
        assert_eq!(out, [0.5, -0.25]);
    }

    #[test]
    fn test_min_max() {
        assert_eq!(min(&[3i16, -7, 12, 0]), Some(-7));
        assert_eq!(max(&[3i16, -7, 12, 0]), Some(12));
        assert_eq!(max::<f32>(&[]), None);
    }
}
