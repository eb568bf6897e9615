//! CLI tools for the OFDM codec

pub mod analyze;
pub mod common;
pub mod decode;
pub mod encode;

pub use analyze::{AnalyzeConfig, SignalAnalyzer, SyncReport};
pub use common::{AudioFormat, GlobalConfig, ProgressReporter};
pub use decode::{DecodeConfig, Decoder};
pub use encode::{EncodeConfig, Encoder};
