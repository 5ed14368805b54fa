//! Configuration for kernel selection and resampler design.
//!
//! Every struct implements `Default` and `serde::Deserialize`, so a partial
//! TOML file only needs to name the fields it changes:
//!
//! ```toml
//! [kernel]
//! backend = "generic"
//!
//! [resampler]
//! output_rate = "44.1khz"
//! taps_per_phase = 32
//! window = { type = "kaiser", alpha = 4.0 }
//! ```

use crate::constants::DEFAULT_TAPS_PER_PHASE;
use crate::error::DspError;
use crate::window::WindowKind;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Sample rate in Hz
///
/// # Parsing formats
/// - `48000` - rate in Hz (no suffix)
/// - `48000hz` or `48000Hz` - rate in Hz (explicit)
/// - `48k`, `44.1khz` or `44.1kHz` - rate in kHz
///
/// # Example
/// ```
/// use qdsp::config::SampleRate;
///
/// let rate: SampleRate = "44.1khz".parse().unwrap();
/// assert_eq!(rate.as_hz(), 44_100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "RateRepr")]
pub struct SampleRate(u32);

impl SampleRate {
    /// Create from a rate in Hz.
    ///
    /// # Errors
    /// `DspError::InvalidRate` for zero.
    pub fn from_hz(hz: u32) -> crate::error::Result<Self> {
        if hz == 0 {
            return Err(DspError::InvalidRate(
                "sample rate must be positive".to_string(),
            ));
        }
        Ok(Self(hz))
    }

    pub fn as_hz(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for SampleRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}hz", self.0)
    }
}

impl FromStr for SampleRate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let lower = s.to_ascii_lowercase();
        let num = lower.strip_suffix("hz").unwrap_or(&lower).trim();

        let (num, multiplier) = match num.strip_suffix('k') {
            Some(kilo) => (kilo.trim(), 1000.0),
            None => (num, 1.0),
        };

        let value: f64 = num
            .parse()
            .map_err(|_| format!("invalid sample rate: {}", s))?;
        let hz = value * multiplier;
        if !hz.is_finite() || hz < 1.0 || hz > u32::MAX as f64 {
            return Err(format!("sample rate out of range: {}", s));
        }
        // kHz values like 44.1 are not exact in binary
        let whole = hz.round();
        if (hz - whole).abs() > 1e-6 {
            return Err(format!("sample rate must be a whole number of Hz: {}", s));
        }
        Ok(Self(whole as u32))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RateRepr {
    Hz(u32),
    Text(String),
}

impl TryFrom<RateRepr> for SampleRate {
    type Error = String;

    fn try_from(repr: RateRepr) -> Result<Self, Self::Error> {
        match repr {
            RateRepr::Hz(hz) => Self::from_hz(hz).map_err(|e| e.to_string()),
            RateRepr::Text(s) => s.parse(),
        }
    }
}

/// Vector kernel implementation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Portable per-element reference loops
    Generic,
    /// Four-wide grouped loops with remainder handling
    #[default]
    Unrolled,
}

impl Backend {
    /// Backend to actually run. Builds with the `force-generic` feature always
    /// use the reference loops.
    pub fn resolve(self) -> Backend {
        if cfg!(feature = "force-generic") {
            Backend::Generic
        } else {
            self
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Generic => write!(f, "generic"),
            Backend::Unrolled => write!(f, "unrolled"),
        }
    }
}

/// How a designed resampler prototype is scaled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// Prototype sums to the interpolation factor: unity gain at DC
    #[default]
    DcGain,
    /// Largest per-phase absolute tap sum is just under 1.0, so no output
    /// sample can exceed full scale. Costs gain when the phases are uneven.
    Headroom,
}

/// Top-level configuration
///
/// # Example
/// ```
/// use qdsp::config::{Backend, DspConfig};
///
/// let config: DspConfig = toml::from_str("[kernel]\nbackend = \"generic\"").unwrap();
/// assert_eq!(config.kernel.backend, Backend::Generic);
/// assert_eq!(config.resampler.taps_per_phase, 60);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DspConfig {
    /// Vector kernel selection
    pub kernel: KernelConfig,
    /// Resampler design
    pub resampler: ResamplerConfig,
}

/// Vector kernel configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Requested implementation, see [`Backend::resolve`]
    pub backend: Backend,
}

/// Resampler design configuration
///
/// The prototype low-pass filter has `taps_per_phase * L` taps, where `L` is
/// the interpolation factor after reducing the rate ratio.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ResamplerConfig {
    /// Input sample rate
    pub input_rate: SampleRate,
    /// Output sample rate
    pub output_rate: SampleRate,
    /// Taps in each polyphase branch
    pub taps_per_phase: usize,
    /// Window applied to the windowed-sinc prototype
    pub window: WindowKind,
    /// Prototype cutoff in Hz. Defaults to half the lower of the two rates.
    pub cutoff_hz: Option<f64>,
    /// Prototype gain normalization
    pub normalization: Normalization,
}

impl Default for ResamplerConfig {
    fn default() -> Self {
        Self {
            input_rate: SampleRate(48_000),
            output_rate: SampleRate(48_000),
            taps_per_phase: DEFAULT_TAPS_PER_PHASE,
            window: WindowKind::Hann,
            cutoff_hz: None,
            normalization: Normalization::DcGain,
        }
    }
}

impl ResamplerConfig {
    /// Default design for converting between two rates.
    pub fn for_rates(input_rate: SampleRate, output_rate: SampleRate) -> Self {
        Self {
            input_rate,
            output_rate,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_rate_plain() {
        let rate: SampleRate = "48000".parse().unwrap();
        assert_eq!(rate.as_hz(), 48_000);
    }

    #[test]
    fn test_sample_rate_suffixes() {
        assert_eq!("48000hz".parse::<SampleRate>().unwrap().as_hz(), 48_000);
        assert_eq!("48000Hz".parse::<SampleRate>().unwrap().as_hz(), 48_000);
        assert_eq!("48k".parse::<SampleRate>().unwrap().as_hz(), 48_000);
        assert_eq!("44.1khz".parse::<SampleRate>().unwrap().as_hz(), 44_100);
        assert_eq!("22.05kHz".parse::<SampleRate>().unwrap().as_hz(), 22_050);
    }

    #[test]
    fn test_sample_rate_invalid() {
        assert!("abc".parse::<SampleRate>().is_err());
        assert!("0".parse::<SampleRate>().is_err());
        assert!("-8000hz".parse::<SampleRate>().is_err());
        assert!("44.1hz".parse::<SampleRate>().is_err());
    }

    #[test]
    fn test_from_hz_rejects_zero() {
        assert_eq!(SampleRate::from_hz(8_000).unwrap().as_hz(), 8_000);
        assert!(matches!(
            SampleRate::from_hz(0),
            Err(DspError::InvalidRate(_))
        ));
    }

    #[test]
    fn test_backend_default_is_unrolled() {
        assert_eq!(Backend::default(), Backend::Unrolled);
        assert_eq!(Backend::Generic.resolve(), Backend::Generic);
    }

    #[test]
    fn test_deserialize_partial_toml() {
        let config: DspConfig = toml::from_str(
            r#"
            [resampler]
            input_rate = 32000
            output_rate = "48k"
            window = { type = "kaiser", alpha = 4.0 }
            normalization = "headroom"
            "#,
        )
        .unwrap();
        assert_eq!(config.kernel.backend, Backend::Unrolled);
        assert_eq!(config.resampler.input_rate.as_hz(), 32_000);
        assert_eq!(config.resampler.output_rate.as_hz(), 48_000);
        assert_eq!(config.resampler.window, WindowKind::Kaiser { alpha: 4.0 });
        assert_eq!(config.resampler.normalization, Normalization::Headroom);
        assert_eq!(config.resampler.taps_per_phase, DEFAULT_TAPS_PER_PHASE);
    }

    #[test]
    fn test_deserialize_rejects_zero_rate() {
        let result: Result<DspConfig, _> = toml::from_str("[resampler]\ninput_rate = 0\n");
        assert!(result.is_err());
    }
}
