/// Causal FIR output `y[n] = sum_k h[k] x[n - k]` with zero initial state.
pub fn direct_convolution(x: &[f64], taps: &[f64]) -> Vec<f64> {
    (0..x.len())
        .map(|n| {
            taps.iter()
                .enumerate()
                .filter(|&(k, _)| k <= n)
                .map(|(k, &h)| h * x[n - k])
                .sum()
        })
        .collect()
}

/// Upsample by `l`, filter with `prototype`, keep every `m`th sample.
///
/// Output count matches a streaming resampler fed the whole input at once.
pub fn resampler_reference(x: &[f64], prototype: &[f64], l: usize, m: usize) -> Vec<f64> {
    let mut upsampled = vec![0.0; x.len() * l];
    for (i, &v) in x.iter().enumerate() {
        upsampled[i * l] = v;
    }
    direct_convolution(&upsampled, prototype)
        .into_iter()
        .step_by(m)
        .collect()
}
