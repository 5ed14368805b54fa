use crate::error::{DspError, Result};
use crate::sample::Sample;

/// Prototype FIR split into `L` interleaved branches.
///
/// Branch `p` holds prototype taps `p, p + L, p + 2L, ...`, so every branch
/// has `prototype.len() / L` taps. Stored flat, one branch after another.
#[derive(Debug, Clone, PartialEq)]
pub struct PolyphaseTable<S> {
    taps: Vec<S>,
    num_phases: usize,
    taps_per_phase: usize,
}

impl<S: Sample> PolyphaseTable<S> {
    /// # Errors
    /// `DspError::InvalidCoefficients` if `num_phases` is zero or does not
    /// divide the prototype length, or the prototype is empty.
    pub fn new(prototype: &[S], num_phases: usize) -> Result<Self> {
        if num_phases == 0 || prototype.is_empty() || prototype.len() % num_phases != 0 {
            return Err(DspError::InvalidCoefficients(format!(
                "{} prototype taps cannot be split into {} phases",
                prototype.len(),
                num_phases
            )));
        }
        let taps_per_phase = prototype.len() / num_phases;
        let mut taps = Vec::with_capacity(prototype.len());
        for phase in 0..num_phases {
            taps.extend(prototype.iter().skip(phase).step_by(num_phases).copied());
        }
        Ok(Self {
            taps,
            num_phases,
            taps_per_phase,
        })
    }

    /// Taps of branch `phase`. Panics if `phase >= num_phases()`.
    pub fn phase(&self, phase: usize) -> &[S] {
        let start = phase * self.taps_per_phase;
        &self.taps[start..start + self.taps_per_phase]
    }

    pub fn num_phases(&self) -> usize {
        self.num_phases
    }

    pub fn taps_per_phase(&self) -> usize {
        self.taps_per_phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_decomposition() {
        let prototype: Vec<i32> = (0..12).collect();
        let table = PolyphaseTable::new(&prototype, 3).unwrap();
        assert_eq!(table.taps_per_phase(), 4);
        assert_eq!(table.phase(0), &[0, 3, 6, 9]);
        assert_eq!(table.phase(1), &[1, 4, 7, 10]);
        assert_eq!(table.phase(2), &[2, 5, 8, 11]);
    }

    #[test]
    fn test_rejects_uneven_split() {
        let prototype = [1.0f32; 10];
        assert!(PolyphaseTable::new(&prototype, 3).is_err());
        assert!(PolyphaseTable::new(&prototype, 0).is_err());
        assert!(PolyphaseTable::<f32>::new(&[], 1).is_err());
    }
}
