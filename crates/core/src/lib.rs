//! ofdm-core - complex sample buffers and FFT primitives
//!
//! This crate has no notion of subcarriers, pilots, or cyclic prefixes; it
//! only provides the value types and the forward/inverse DFT that the
//! `ofdm-codec` crate builds the OFDM frame on top of.

pub mod buffer;
pub mod error;
pub mod fft;

pub use buffer::{Complex, ComplexBuffer, SampleBuffer};
pub use error::{CoreError, Result};
pub use fft::{FftConfig, FftProcessor};

/// Re-exported for convenience at the workspace boundary.
pub mod prelude {
    pub use crate::buffer::{Complex, ComplexBuffer, SampleBuffer};
    pub use crate::error::{CoreError, Result};
    pub use crate::fft::{FftConfig, FftProcessor};
}
