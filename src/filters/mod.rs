mod coefficients;
pub mod design;
mod fir;

pub use coefficients::CoefficientSet;
pub use design::{
    frequency_response, lowpass_equiripple, lowpass_windowed_sinc, magnitude_db, quantize,
};
pub use fir::FirFilter;
