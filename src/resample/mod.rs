//! Polyphase rational-ratio sample-rate conversion.
//!
//! Converting from `R_in` to `R_out` reduces the ratio to `L / M` with
//! `L = R_out / g` and `M = R_in / g`, `g = gcd(R_in, R_out)`. Conceptually
//! the input is upsampled by `L`, low-pass filtered at `R_in * L` and
//! decimated by `M`. The polyphase form skips the zeros: each output sample
//! needs only the `T = N / L` taps of one branch.

mod polyphase;

pub use polyphase::PolyphaseTable;

use crate::config::{DspConfig, Normalization, ResamplerConfig, SampleRate};
use crate::error::{DspError, Result, check_len};
use crate::filters::{CoefficientSet, design};
use crate::fixed_point::NumericFormat;
use crate::kernel::{KernelDispatch, VectorKernel};
use crate::sample::Sample;
use log::{debug, trace};

const HEADROOM_ITERATIONS: usize = 8;

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Interpolation and decimation factors `(L, M)` for a rate pair.
pub fn ratio(input_rate: SampleRate, output_rate: SampleRate) -> (usize, usize) {
    let (fin, fout) = (input_rate.as_hz() as u64, output_rate.as_hz() as u64);
    let g = gcd(fin, fout);
    ((fout / g) as usize, (fin / g) as usize)
}

/// Streaming polyphase resampler
///
/// State between calls is the last `T - 1` inputs, the branch index of the
/// next output and how many inputs of the next block to skip before it.
/// Blocks may have any length; splitting a signal into different block
/// sizes produces the same output stream.
pub struct Resampler<S: Sample> {
    table: PolyphaseTable<S>,
    interpolation: usize,
    decimation: usize,
    shift: u32,
    kernel: KernelDispatch,
    history: Vec<S>,
    scratch: Vec<S>,
    phase: usize,
    carry: usize,
}

impl<S: Sample> Resampler<S> {
    /// Build from an existing prototype filter running at `input_rate * L`.
    ///
    /// # Errors
    /// `DspError::InvalidCoefficients` if the prototype length is not a
    /// multiple of `L`, and `DspError::FormatMismatch` if `format` does not
    /// describe `S`.
    pub fn with_prototype(
        input_rate: SampleRate,
        output_rate: SampleRate,
        prototype: CoefficientSet<S>,
        format: NumericFormat,
        kernel: KernelDispatch,
    ) -> Result<Self> {
        let shift = S::frac_bits(format)?;
        let (interpolation, decimation) = ratio(input_rate, output_rate);
        let table = PolyphaseTable::new(prototype.taps(), interpolation)?;

        debug!(
            "Resampler {} -> {}: L={}, M={}, {} taps per phase, format {}, backend {}",
            input_rate,
            output_rate,
            interpolation,
            decimation,
            table.taps_per_phase(),
            format,
            kernel.backend()
        );

        Ok(Self {
            history: vec![S::ZERO; table.taps_per_phase() - 1],
            table,
            interpolation,
            decimation,
            shift,
            kernel,
            scratch: Vec::new(),
            phase: 0,
            carry: 0,
        })
    }

    /// Design a windowed-sinc prototype from `config` and build on it.
    ///
    /// The prototype has `taps_per_phase * L` taps and its cutoff defaults to
    /// half the lower of the two rates.
    pub fn design(
        config: &ResamplerConfig,
        format: NumericFormat,
        kernel: KernelDispatch,
    ) -> Result<Self> {
        if config.taps_per_phase == 0 {
            return Err(DspError::FilterDesign(
                "taps per phase must be at least 1".to_string(),
            ));
        }
        let (interpolation, _) = ratio(config.input_rate, config.output_rate);
        let fin = config.input_rate.as_hz() as f64;
        let fout = config.output_rate.as_hz() as f64;
        let cutoff = config.cutoff_hz.unwrap_or(fin.min(fout) / 2.0);

        let mut taps = design::lowpass_windowed_sinc(
            cutoff,
            fin * interpolation as f64,
            config.taps_per_phase * interpolation,
            config.window,
        )?;
        let prototype = match config.normalization {
            Normalization::DcGain => {
                for t in taps.iter_mut() {
                    *t *= interpolation as f64;
                }
                design::quantize(&taps, format)?
            }
            Normalization::Headroom => quantize_with_headroom(&taps, interpolation, format)?,
        };
        Self::with_prototype(config.input_rate, config.output_rate, prototype, format, kernel)
    }

    /// [`design`](Self::design) with the kernel chosen by `config.kernel`.
    pub fn from_config(config: &DspConfig, format: NumericFormat) -> Result<Self> {
        Self::design(
            &config.resampler,
            format,
            KernelDispatch::from_config(&config.kernel),
        )
    }

    /// Resample `input` into the front of `output`, returning the number of
    /// samples written.
    ///
    /// # Errors
    /// `DspError::OutputTooSmall` if `output` is shorter than
    /// [`output_len`](Self::output_len) for this input.
    pub fn process(&mut self, input: &[S], output: &mut [S]) -> Result<usize> {
        let needed = self.output_len(input.len());
        if output.len() < needed {
            return Err(DspError::OutputTooSmall {
                needed,
                available: output.len(),
            });
        }

        self.scratch.clear();
        self.scratch.extend_from_slice(&self.history);
        self.scratch.extend_from_slice(input);

        let taps = self.table.taps_per_phase();
        let mut n = self.carry;
        let mut p = self.phase;
        let mut produced = 0;
        while n < input.len() {
            output[produced] = self.kernel.convolve_point(
                &self.scratch[n..n + taps],
                self.table.phase(p),
                self.shift,
            )?;
            produced += 1;
            p += self.decimation;
            n += p / self.interpolation;
            p %= self.interpolation;
        }
        self.carry = n - input.len();
        self.phase = p;

        let keep = self.scratch.len() - self.history.len();
        self.history.copy_from_slice(&self.scratch[keep..]);

        trace!(
            "resampled {} -> {} samples (phase {}, carry {})",
            input.len(),
            produced,
            self.phase,
            self.carry
        );
        Ok(produced)
    }

    /// Exact number of samples the next [`process`](Self::process) call
    /// produces for `input_len` inputs.
    pub fn output_len(&self, input_len: usize) -> usize {
        let start = self.carry * self.interpolation + self.phase;
        let end = input_len * self.interpolation;
        if end > start {
            (end - start).div_ceil(self.decimation)
        } else {
            0
        }
    }

    /// Largest number of samples any call can produce for `input_len` inputs.
    pub fn max_output_len(&self, input_len: usize) -> usize {
        (input_len * self.interpolation).div_ceil(self.decimation)
    }

    /// Clear history and phase, as if freshly constructed.
    pub fn reset(&mut self) {
        self.history.fill(S::ZERO);
        self.phase = 0;
        self.carry = 0;
    }

    /// Pick up the input stream where `previous` left off.
    ///
    /// Copies the input history and the position of the next output, so a
    /// stream can switch to this resampler's output rate between blocks
    /// without a restart transient. The branch index is rescaled from the
    /// previous interpolation factor to this one, truncating.
    ///
    /// # Errors
    /// `DspError::LengthMismatch` if the two resamplers have a different
    /// number of taps per branch.
    pub fn continue_from(&mut self, previous: &Resampler<S>) -> Result<()> {
        check_len(self.history.len(), previous.history.len())?;
        self.history.copy_from_slice(&previous.history);
        self.phase = previous.phase * self.interpolation / previous.interpolation;
        self.carry = previous.carry;
        debug!(
            "Resampler continues stream: phase {} of {} -> {} of {}, carry {}",
            previous.phase, previous.interpolation, self.phase, self.interpolation, self.carry
        );
        Ok(())
    }

    pub fn interpolation(&self) -> usize {
        self.interpolation
    }

    pub fn decimation(&self) -> usize {
        self.decimation
    }

    pub fn table(&self) -> &PolyphaseTable<S> {
        &self.table
    }

    /// Branch used for the next output sample.
    pub fn phase(&self) -> usize {
        self.phase
    }
}

/// Largest `sum |h|` over the polyphase branches of `taps`.
fn max_phase_sum(taps: &[f64], num_phases: usize) -> f64 {
    (0..num_phases)
        .map(|p| {
            taps.iter()
                .skip(p)
                .step_by(num_phases)
                .map(|h| h.abs())
                .sum::<f64>()
        })
        .fold(0.0, f64::max)
}

/// Scale and quantize `taps` so that no branch's absolute tap sum exceeds
/// full scale once quantized.
///
/// Flooring and the DC correction in [`design::quantize`] can each add a
/// few LSBs to a branch, so the gain is refined against the quantized taps.
fn quantize_with_headroom<S: Sample>(
    taps: &[f64],
    num_phases: usize,
    format: NumericFormat,
) -> Result<CoefficientSet<S>> {
    let frac_bits = S::frac_bits(format)?;
    let full_scale = match format {
        NumericFormat::Fixed(q) => 1.0 - q.resolution(),
        NumericFormat::Float => 1.0,
    };

    let mut gain = full_scale / max_phase_sum(taps, num_phases);
    for _ in 0..HEADROOM_ITERATIONS {
        let scaled: Vec<f64> = taps.iter().map(|&t| t * gain).collect();
        let set: CoefficientSet<S> = design::quantize(&scaled, format)?;
        let real: Vec<f64> = set.taps().iter().map(|t| t.to_real(frac_bits)).collect();
        let achieved = max_phase_sum(&real, num_phases);
        if achieved <= full_scale {
            return Ok(set);
        }
        // Overshoot the correction so the next pass lands under the limit
        gain *= full_scale / (2.0 * achieved - full_scale);
    }
    Err(DspError::FilterDesign(format!(
        "could not fit {} prototype taps under full scale",
        taps.len()
    )))
}
