//! Synthetic signals and measurements for tests and demo tools.

mod measure;
mod noise;
mod signal;

pub use measure::{energy, max_abs_error, rms, signal_power, snr_db};
pub use noise::{RandomSample, random_samples, white_noise};
pub use signal::{constant, impulse, sine, to_samples};
