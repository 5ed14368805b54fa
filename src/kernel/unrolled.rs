use super::{VectorKernel, check_binary, check_convolve, check_point, check_shift};
use crate::constants::LANES;
use crate::error::{Result, check_len};
use crate::sample::Sample;

/// Grouped implementation: bulk work in blocks of [`LANES`] elements, with
/// the `len % LANES` leftovers handled by a match on the remainder shape.
///
/// The per-element operation is the same closure in both paths, and every
/// convolution accumulator adds its taps in ascending order, so results
/// match [`GenericKernel`](super::GenericKernel) bit for bit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnrolledKernel;

/// Apply `op(dst[i], a[i], b[i])` to every element. Slices must have equal
/// lengths.
#[inline(always)]
fn zip_map<S: Sample>(dst: &mut [S], a: &[S], b: &[S], op: impl Fn(S, S, S) -> S) {
    let bulk = dst.len() - dst.len() % LANES;
    let (d_bulk, d_tail) = dst.split_at_mut(bulk);
    let (a_bulk, a_tail) = a.split_at(bulk);
    let (b_bulk, b_tail) = b.split_at(bulk);

    for ((d, a), b) in d_bulk
        .chunks_exact_mut(LANES)
        .zip(a_bulk.chunks_exact(LANES))
        .zip(b_bulk.chunks_exact(LANES))
    {
        d[0] = op(d[0], a[0], b[0]);
        d[1] = op(d[1], a[1], b[1]);
        d[2] = op(d[2], a[2], b[2]);
        d[3] = op(d[3], a[3], b[3]);
    }

    match (d_tail, a_tail, b_tail) {
        ([], [], []) => {}
        ([d0], [a0], [b0]) => {
            *d0 = op(*d0, *a0, *b0);
        }
        ([d0, d1], [a0, a1], [b0, b1]) => {
            *d0 = op(*d0, *a0, *b0);
            *d1 = op(*d1, *a1, *b1);
        }
        ([d0, d1, d2], [a0, a1, a2], [b0, b1, b2]) => {
            *d0 = op(*d0, *a0, *b0);
            *d1 = op(*d1, *a1, *b1);
            *d2 = op(*d2, *a2, *b2);
        }
        _ => unreachable!("tail is shorter than one lane group"),
    }
}

/// Accumulate one tap against four consecutive inputs.
#[inline(always)]
fn lanes<S: Sample>(acc: &mut [S::Acc; LANES], h: S, x: &[S]) {
    acc[0] = S::mac(acc[0], h, x[0]);
    acc[1] = S::mac(acc[1], h, x[1]);
    acc[2] = S::mac(acc[2], h, x[2]);
    acc[3] = S::mac(acc[3], h, x[3]);
}

/// Four adjacent outputs starting at `n`: taps in groups of four, then the
/// tap remainder.
#[inline(always)]
fn convolve_block<S: Sample>(x: &[S], taps: &[S], n: usize) -> [S::Acc; LANES] {
    let last = taps.len() - 1;
    let mut acc = [S::Acc::default(); LANES];
    let at = |k: usize| n + last - k;

    let groups = taps.chunks_exact(LANES);
    let rem = groups.remainder();
    let mut k = 0;
    for h in groups {
        lanes(&mut acc, h[0], &x[at(k)..]);
        lanes(&mut acc, h[1], &x[at(k + 1)..]);
        lanes(&mut acc, h[2], &x[at(k + 2)..]);
        lanes(&mut acc, h[3], &x[at(k + 3)..]);
        k += LANES;
    }
    match rem {
        [] => {}
        [h0] => {
            lanes(&mut acc, *h0, &x[at(k)..]);
        }
        [h0, h1] => {
            lanes(&mut acc, *h0, &x[at(k)..]);
            lanes(&mut acc, *h1, &x[at(k + 1)..]);
        }
        [h0, h1, h2] => {
            lanes(&mut acc, *h0, &x[at(k)..]);
            lanes(&mut acc, *h1, &x[at(k + 1)..]);
            lanes(&mut acc, *h2, &x[at(k + 2)..]);
        }
        _ => unreachable!("tap remainder is shorter than one lane group"),
    }
    acc
}

/// Single output with taps in groups of four. `window.len() == taps.len()`.
#[inline(always)]
fn convolve_one<S: Sample>(window: &[S], taps: &[S]) -> S::Acc {
    let mut acc = S::Acc::default();
    let tap_groups = taps.chunks_exact(LANES);
    let tap_rem = tap_groups.remainder();
    // Newest inputs sit at the end of the window and pair with the first taps
    let win_groups = window.rchunks_exact(LANES);
    let win_rem = win_groups.remainder();

    for (h, w) in tap_groups.zip(win_groups) {
        acc = S::mac(acc, h[0], w[3]);
        acc = S::mac(acc, h[1], w[2]);
        acc = S::mac(acc, h[2], w[1]);
        acc = S::mac(acc, h[3], w[0]);
    }
    match (tap_rem, win_rem) {
        ([], []) => {}
        ([h0], [w0]) => {
            acc = S::mac(acc, *h0, *w0);
        }
        ([h0, h1], [w0, w1]) => {
            acc = S::mac(acc, *h0, *w1);
            acc = S::mac(acc, *h1, *w0);
        }
        ([h0, h1, h2], [w0, w1, w2]) => {
            acc = S::mac(acc, *h0, *w2);
            acc = S::mac(acc, *h1, *w1);
            acc = S::mac(acc, *h2, *w0);
        }
        _ => unreachable!("tap remainder is shorter than one lane group"),
    }
    acc
}

impl VectorKernel for UnrolledKernel {
    fn add<S: Sample>(&self, dst: &mut [S], a: &[S], b: &[S]) -> Result<()> {
        check_binary(dst, a, b)?;
        zip_map(dst, a, b, |_, a, b| a.wrapping_add(b));
        Ok(())
    }

    fn sub<S: Sample>(&self, dst: &mut [S], a: &[S], b: &[S]) -> Result<()> {
        check_binary(dst, a, b)?;
        zip_map(dst, a, b, |_, a, b| a.wrapping_sub(b));
        Ok(())
    }

    fn negate<S: Sample>(&self, dst: &mut [S], src: &[S]) -> Result<()> {
        check_len(dst.len(), src.len())?;
        zip_map(dst, src, src, |_, s, _| s.wrapping_neg());
        Ok(())
    }

    fn scale<S: Sample>(&self, dst: &mut [S], src: &[S], k: S, shift: u32) -> Result<()> {
        check_shift::<S>(shift)?;
        check_len(dst.len(), src.len())?;
        zip_map(dst, src, src, |_, s, _| s.mul_shift(k, shift));
        Ok(())
    }

    fn dot_mul<S: Sample>(&self, dst: &mut [S], a: &[S], b: &[S], shift: u32) -> Result<()> {
        check_shift::<S>(shift)?;
        check_binary(dst, a, b)?;
        zip_map(dst, a, b, |_, a, b| a.mul_shift(b, shift));
        Ok(())
    }

    fn mac<S: Sample>(&self, dst: &mut [S], a: &[S], b: &[S], shift: u32) -> Result<()> {
        check_shift::<S>(shift)?;
        check_binary(dst, a, b)?;
        zip_map(dst, a, b, |d, a, b| d.wrapping_add(a.mul_shift(b, shift)));
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
        let bulk = dst.len() - dst.len() % LANES;
        let (d_bulk, d_tail) = dst.split_at_mut(bulk);

        for (block, d) in d_bulk.chunks_exact_mut(LANES).enumerate() {
            let acc = convolve_block(x, taps, block * LANES);
            d[0] = S::narrow(acc[0], shift);
            d[1] = S::narrow(acc[1], shift);
            d[2] = S::narrow(acc[2], shift);
            d[3] = S::narrow(acc[3], shift);
        }
        for (i, d) in d_tail.iter_mut().enumerate() {
            let n = bulk + i;
            *d = S::narrow(convolve_one(&x[n..n + k], taps), shift);
        }
        Ok(())
    }

    fn convolve_point<S: Sample>(&self, window: &[S], taps: &[S], shift: u32) -> Result<S> {
        check_shift::<S>(shift)?;
        check_point(window, taps)?;
        Ok(S::narrow(convolve_one(window, taps), shift))
    }
}
