//! Error types for ofdm-core

use thiserror::Error;

/// Core error types
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("invalid FFT size: {size}")]
    InvalidFftSize { size: usize },

    #[error("buffer size mismatch: expected {expected}, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("invalid sample rate: {rate}")]
    InvalidSampleRate { rate: f64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ofdm-core operations
pub type Result<T> = std::result::Result<T, CoreError>;
