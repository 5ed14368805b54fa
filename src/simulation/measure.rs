/// Sum of squares.
pub fn energy(signal: &[f64]) -> f64 {
    signal.iter().map(|&x| x * x).sum()
}

/// Mean power. Zero for an empty signal.
pub fn signal_power(signal: &[f64]) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }
    energy(signal) / signal.len() as f64
}

pub fn rms(signal: &[f64]) -> f64 {
    signal_power(signal).sqrt()
}

/// Largest absolute difference over the common prefix of `a` and `b`.
pub fn max_abs_error(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

/// Signal-to-noise ratio of `test` against `reference` in dB, treating the
/// difference as noise. Infinite when they match exactly.
pub fn snr_db(reference: &[f64], test: &[f64]) -> f64 {
    let noise: Vec<f64> = reference.iter().zip(test).map(|(r, t)| t - r).collect();
    10.0 * (energy(reference) / energy(&noise)).log10()
}
