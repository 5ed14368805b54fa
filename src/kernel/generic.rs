use super::{VectorKernel, check_binary, check_convolve, check_point, check_shift};
use crate::error::{Result, check_len};
use crate::sample::Sample;

/// Reference implementation: one element per iteration, no grouping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenericKernel;

impl VectorKernel for GenericKernel {
    fn add<S: Sample>(&self, dst: &mut [S], a: &[S], b: &[S]) -> Result<()> {
        check_binary(dst, a, b)?;
        for ((d, &a), &b) in dst.iter_mut().zip(a).zip(b) {
            *d = a.wrapping_add(b);
        }
        Ok(())
    }

    fn sub<S: Sample>(&self, dst: &mut [S], a: &[S], b: &[S]) -> Result<()> {
        check_binary(dst, a, b)?;
        for ((d, &a), &b) in dst.iter_mut().zip(a).zip(b) {
            *d = a.wrapping_sub(b);
        }
        Ok(())
    }

    fn negate<S: Sample>(&self, dst: &mut [S], src: &[S]) -> Result<()> {
        check_len(dst.len(), src.len())?;
        for (d, &s) in dst.iter_mut().zip(src) {
            *d = s.wrapping_neg();
        }
        Ok(())
    }

    fn scale<S: Sample>(&self, dst: &mut [S], src: &[S], k: S, shift: u32) -> Result<()> {
        check_shift::<S>(shift)?;
        check_len(dst.len(), src.len())?;
        for (d, &s) in dst.iter_mut().zip(src) {
            *d = s.mul_shift(k, shift);
        }
        Ok(())
    }

    fn dot_mul<S: Sample>(&self, dst: &mut [S], a: &[S], b: &[S], shift: u32) -> Result<()> {
        check_shift::<S>(shift)?;
        check_binary(dst, a, b)?;
        for ((d, &a), &b) in dst.iter_mut().zip(a).zip(b) {
            *d = a.mul_shift(b, shift);
        }
        Ok(())
    }

    fn mac<S: Sample>(&self, dst: &mut [S], a: &[S], b: &[S], shift: u32) -> Result<()> {
        check_shift::<S>(shift)?;
        check_binary(dst, a, b)?;
        for ((d, &a), &b) in dst.iter_mut().zip(a).zip(b) {
            *d = d.wrapping_add(a.mul_shift(b, shift));
        }
        Ok(())
    }

    fn convolve_partial<S: Sample>(
        &self,
        dst: &mut [S],
        x: &[S],
        taps: &[S],
        shift: u32,
    ) -> Result<()> {
        check_shift::<S>(shift)?;
        let k = check_convolve(dst, x, taps)?;
        for (n, d) in dst.iter_mut().enumerate() {
            let mut acc = S::Acc::default();
            for (j, &h) in taps.iter().enumerate() {
                acc = S::mac(acc, h, x[n + k - 1 - j]);
            }
            *d = S::narrow(acc, shift);
        }
        Ok(())
    }

    fn convolve_point<S: Sample>(&self, window: &[S], taps: &[S], shift: u32) -> Result<S> {
        check_shift::<S>(shift)?;
        check_point(window, taps)?;
        let last = taps.len() - 1;
        let mut acc = S::Acc::default();
        for (j, &h) in taps.iter().enumerate() {
            acc = S::mac(acc, h, window[last - j]);
        }
        Ok(S::narrow(acc, shift))
    }
}
