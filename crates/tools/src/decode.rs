//! Decoder configuration and implementation

use anyhow::{bail, Result};
use clap::Parser;
use ofdm_codec::prelude::*;
use std::path::PathBuf;

use crate::common::{self, AudioFormat, GlobalConfig};

/// Decode one captured OFDM symbol back into payload bytes.
#[derive(Debug, Clone, Parser)]
#[command(name = "ofdm-decode")]
#[command(about = "Decode a captured OFDM symbol into payload bytes")]
pub struct DecodeConfig {
    #[command(flatten)]
    pub global: GlobalConfig,

    /// Input file path (capture)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output file path; defaults to stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Reference profile: "legacy" or "modern"
    #[arg(long, default_value = "modern")]
    pub profile: String,

    /// Search window (in samples) for coarse symbol-start synchronisation
    #[arg(long, default_value = "512")]
    pub search_window: usize,

    /// Fine-search half-width (in samples) around the coarse peak
    #[arg(long, default_value = "8")]
    pub fine_range: usize,
}

/// An OFDM decoder bound to one configuration.
pub struct Decoder {
    config: DecodeConfig,
    codec: OfdmCodec,
}

impl Decoder {
    pub fn new(config: DecodeConfig) -> Result<Self> {
        let ofdm_config = match config.profile.as_str() {
            "legacy" => OfdmConfig::legacy_default(),
            "modern" => OfdmConfig::modern_default(),
            other => bail!("unknown profile: {} (expected \"legacy\" or \"modern\")", other),
        };
        let codec = OfdmCodec::new(ofdm_config)?;
        Ok(Self { config, codec })
    }

    /// Locate, decode, and write the payload recovered from
    /// `config.input`.
    pub fn run(&self) -> Result<()> {
        let (payload, pilot_score) = match self.codec.config().domain {
            SignalDomain::Complex => {
                let samples = common::read_complex_samples(&self.config.input)?;
                let sync = self.codec.find_symbol_start(&samples, self.config.search_window, self.config.fine_range)?;
                tracing::info!(start = sync.start, coarse_peak = sync.coarse_peak, metric = sync.metric, "synchronised");
                let cp = self.codec.config().cyclic_len();
                let body = self.codec.config().n;
                let framed = &samples[sync.start..sync.start + cp + body];
                self.codec.decode(framed)?
            }
            SignalDomain::Real => {
                let format = AudioFormat::from_path(&self.config.input);
                let samples = common::read_real_samples(&self.config.input, format)?;
                let sync =
                    self.codec.find_symbol_start_real(&samples, self.config.search_window, self.config.fine_range)?;
                tracing::info!(start = sync.start, coarse_peak = sync.coarse_peak, metric = sync.metric, "synchronised");
                let framed = &samples[sync.start..sync.start + self.codec.config().framed_len()];
                self.codec.decode_real(framed)?
            }
        };
        tracing::info!(bytes = payload.len(), pilot_score, "decoded symbol");

        match &self.config.output {
            Some(path) => std::fs::write(path, &payload)?,
            None => {
                use std::io::Write;
                std::io::stdout().write_all(&payload)?;
            }
        }
        Ok(())
    }
}
