use rand::RngExt;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => rand::make_rng(),
    }
}

/// Uniform white noise in `[-amplitude, amplitude)`.
pub fn white_noise(len: usize, amplitude: f64, seed: Option<u64>) -> Vec<f64> {
    let mut rng = create_rng(seed);
    (0..len)
        .map(|_| amplitude * (2.0 * rng.random::<f64>() - 1.0))
        .collect()
}

/// Sample types that can be drawn at random for conformance testing.
///
/// Integer types cover the whole word, including `MIN`. Floats are uniform
/// in `[-1, 1)`.
pub trait RandomSample: Sized {
    fn random(rng: &mut ChaCha8Rng) -> Self;
}

macro_rules! impl_random_int {
    ($($t:ty),*) => {
        $(impl RandomSample for $t {
            fn random(rng: &mut ChaCha8Rng) -> Self {
                rng.random::<$t>()
            }
        })*
    };
}

impl_random_int!(i16, i32);

impl RandomSample for f32 {
    fn random(rng: &mut ChaCha8Rng) -> Self {
        2.0 * rng.random::<f32>() - 1.0
    }
}

impl RandomSample for f64 {
    fn random(rng: &mut ChaCha8Rng) -> Self {
        2.0 * rng.random::<f64>() - 1.0
    }
}

/// `len` random samples from a seeded generator.
pub fn random_samples<S: RandomSample>(len: usize, seed: u64) -> Vec<S> {
    let mut rng = create_rng(Some(seed));
    (0..len).map(|_| S::random(&mut rng)).collect()
}
