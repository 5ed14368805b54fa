use super::CoefficientSet;
use crate::error::{Result, check_len};
use crate::fixed_point::NumericFormat;
use crate::kernel::{KernelDispatch, VectorKernel};
use crate::sample::Sample;
use log::debug;

/// Direct-form FIR filter with block processing
///
/// Computes `y[n] = sum_k h[k] * x[n - k]` over each input block, where
/// samples before the block come from the filter's history. The history
/// holds the last `K - 1` inputs, starts at zero and is carried from one
/// call to the next, so the first `K - 1` outputs after construction or
/// [`reset`](Self::reset) are the response to a zero past.
///
/// Fixed-point products accumulate in the widened accumulator with
/// wraparound, and the sum is shifted right (truncating) by the
/// coefficients' fractional bit count.
pub struct FirFilter<S: Sample> {
    coefficients: CoefficientSet<S>,
    shift: u32,
    kernel: KernelDispatch,
    history: Vec<S>,
    scratch: Vec<S>,
}

impl<S: Sample> FirFilter<S> {
    /// Create a filter using the default kernel backend.
    ///
    /// `format` describes the coefficients. Inputs and outputs share the
    /// sample type; for fixed point they are read in whatever Q-format the
    /// caller uses, and the output comes back in that same format.
    ///
    /// # Errors
    /// `DspError::FormatMismatch` if `format` does not describe `S`.
    pub fn new(coefficients: CoefficientSet<S>, format: NumericFormat) -> Result<Self> {
        Self::with_kernel(coefficients, format, KernelDispatch::default())
    }

    pub fn with_kernel(
        coefficients: CoefficientSet<S>,
        format: NumericFormat,
        kernel: KernelDispatch,
    ) -> Result<Self> {
        let shift = S::frac_bits(format)?;
        let history_len = coefficients.len() - 1;
        debug!(
            "FIR filter: {} taps, format {}, backend {}",
            coefficients.len(),
            format,
            kernel.backend()
        );
        Ok(Self {
            coefficients,
            shift,
            kernel,
            history: vec![S::ZERO; history_len],
            scratch: Vec::new(),
        })
    }

    /// Filter `input` into `output`; both must have the same length.
    pub fn process(&mut self, input: &[S], output: &mut [S]) -> Result<()> {
        check_len(input.len(), output.len())?;
        self.load_scratch(input);
        self.kernel.convolve_partial(
            output,
            &self.scratch,
            self.coefficients.taps(),
            self.shift,
        )?;
        self.save_history();
        Ok(())
    }

    /// Filter `buffer`, replacing its contents with the output.
    pub fn process_in_place(&mut self, buffer: &mut [S]) -> Result<()> {
        self.load_scratch(buffer);
        self.kernel.convolve_partial(
            buffer,
            &self.scratch,
            self.coefficients.taps(),
            self.shift,
        )?;
        self.save_history();
        Ok(())
    }

    /// Filter one sample.
    pub fn process_sample(&mut self, sample: S) -> Result<S> {
        self.load_scratch(&[sample]);
        let out = self
            .kernel
            .convolve_point(&self.scratch, self.coefficients.taps(), self.shift)?;
        self.save_history();
        Ok(out)
    }

    /// Zero the history, as if freshly constructed.
    pub fn reset(&mut self) {
        self.history.fill(S::ZERO);
    }

    /// The last `K - 1` inputs, oldest first.
    pub fn history(&self) -> &[S] {
        &self.history
    }

    pub fn coefficients(&self) -> &CoefficientSet<S> {
        &self.coefficients
    }

    pub fn num_taps(&self) -> usize {
        self.coefficients.len()
    }

    /// Group delay in samples (half the filter length for linear phase)
    pub fn group_delay_samples(&self) -> usize {
        (self.coefficients.len() - 1) / 2
    }

    pub fn kernel(&self) -> KernelDispatch {
        self.kernel
    }

    fn load_scratch(&mut self, input: &[S]) {
        self.scratch.clear();
        self.scratch.extend_from_slice(&self.history);
        self.scratch.extend_from_slice(input);
    }

    fn save_history(&mut self) {
        let keep = self.scratch.len() - self.history.len();
        self.history.copy_from_slice(&self.scratch[keep..]);
    }
}
