#![allow(dead_code, unused_imports)]

pub mod reference;

use qdsp::fixed_point::NumericFormat;
use qdsp::sample::Sample;

pub use reference::{direct_convolution, resampler_reference};

/// Real values of a sample buffer.
pub fn to_real<S: Sample>(samples: &[S], format: NumericFormat) -> Vec<f64> {
    let frac_bits = S::frac_bits(format).expect("format matches sample type");
    samples.iter().map(|s| s.to_real(frac_bits)).collect()
}

/// Feed `input` through `step` in blocks of the given sizes, cycling through
/// `block_sizes` until the input is used up.
pub fn in_blocks<T: Copy>(
    input: &[T],
    block_sizes: &[usize],
    mut step: impl FnMut(&[T]) -> Vec<T>,
) -> Vec<T> {
    let mut out = Vec::new();
    let mut start = 0;
    for &size in block_sizes.iter().cycle() {
        if start >= input.len() {
            break;
        }
        let end = (start + size).min(input.len());
        out.extend(step(&input[start..end]));
        start = end;
    }
    out
}
