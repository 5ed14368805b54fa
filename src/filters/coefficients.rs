use crate::error::{DspError, Result};
use crate::fixed_point::NumericFormat;
use crate::sample::Sample;

/// Immutable FIR impulse response.
///
/// Linear-phase designs are symmetric, `taps[i] == taps[N-1-i]`; this is
/// reported by [`is_symmetric`](Self::is_symmetric) but never required.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientSet<S> {
    taps: Vec<S>,
}

impl<S: Sample> CoefficientSet<S> {
    /// # Errors
    /// `DspError::InvalidCoefficients` if `taps` is empty.
    pub fn new(taps: Vec<S>) -> Result<Self> {
        if taps.is_empty() {
            return Err(DspError::InvalidCoefficients(
                "coefficient set is empty".to_string(),
            ));
        }
        Ok(Self { taps })
    }

    /// Convert real-valued taps, flooring and saturating into `format`.
    ///
    /// Use [`quantize`](crate::filters::design::quantize) instead when the
    /// DC gain of the quantized set has to match the real one exactly.
    pub fn from_real(taps: &[f64], format: NumericFormat) -> Result<Self> {
        let frac_bits = S::frac_bits(format)?;
        Self::new(taps.iter().map(|&t| S::from_real(t, frac_bits)).collect())
    }

    pub fn taps(&self) -> &[S] {
        &self.taps
    }

    pub fn len(&self) -> usize {
        self.taps.len()
    }

    /// Never true: construction rejects empty sets.
    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }

    pub fn is_symmetric(&self) -> bool {
        self.taps.iter().eq(self.taps.iter().rev())
    }

    pub fn into_taps(self) -> Vec<S> {
        self.taps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed_point::QFormat;

    #[test]
    fn test_rejects_empty() {
        assert!(CoefficientSet::<i16>::new(vec![]).is_err());
    }

    #[test]
    fn test_symmetry() {
        assert!(CoefficientSet::new(vec![1i16, 5, 1]).unwrap().is_symmetric());
        assert!(CoefficientSet::new(vec![2i32, 3, 3, 2]).unwrap().is_symmetric());
        assert!(!CoefficientSet::new(vec![1.0f32, 2.0]).unwrap().is_symmetric());
    }

    #[test]
    fn test_from_real() {
        let set = CoefficientSet::<i16>::from_real(
            &[0.25, -0.5, 1.0],
            NumericFormat::Fixed(QFormat::Q1_15),
        )
        .unwrap();
        assert_eq!(set.taps(), &[8192, -16384, 32767]);
        assert!(
            CoefficientSet::<f32>::from_real(&[0.5], NumericFormat::Fixed(QFormat::Q1_15)).is_err()
        );
    }
}
