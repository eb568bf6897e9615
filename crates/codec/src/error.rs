//! Error types for ofdm-codec (taxonomy from spec §7)

use thiserror::Error;

/// Error kinds the OFDM codec can raise
#[derive(Error, Debug)]
pub enum OfdmError {
    #[error("invalid OFDM configuration: {msg}")]
    ConfigInvalid { msg: String },

    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("symbol-start synchronisation failed: no coarse peak found in {search_window} samples")]
    SyncFailed { search_window: usize },

    #[error("insufficient samples: fine search needed {needed} more sample(s) past the buffer end")]
    InsufficientSamples { needed: usize },

    #[error("FFT/buffer error: {0}")]
    Core(#[from] ofdm_core::CoreError),
}

/// Result type for ofdm-codec operations
pub type Result<T> = std::result::Result<T, OfdmError>;
