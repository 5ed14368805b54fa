//! Fixed-point and floating-point DSP kernels: vector arithmetic, FIR
//! filtering, Kaiser and classic windows, and polyphase resampling.
//!
//! All processing is generic over [`Sample`]: `i16` and `i32` for Q-format
//! fixed point, `f32` and `f64` for floating point.

pub mod config;
pub mod constants;
pub mod error;
pub mod filters;
pub mod fixed_point;
pub mod kernel;
pub mod resample;
pub mod sample;
pub mod window;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use config::{Backend, DspConfig, Normalization, SampleRate};
pub use error::{DspError, Result};
pub use filters::{CoefficientSet, FirFilter};
pub use fixed_point::{NumericFormat, QFormat, ScaledValue};
pub use kernel::{KernelDispatch, VectorKernel};
pub use resample::Resampler;
pub use sample::Sample;
pub use window::WindowKind;
