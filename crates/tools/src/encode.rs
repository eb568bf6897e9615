//! Encoder configuration and implementation

use anyhow::{bail, Context, Result};
use clap::Parser;
use ofdm_codec::prelude::*;
use std::path::PathBuf;

use crate::common::{self, AudioFormat, GlobalConfig};

/// Encode one payload into one OFDM symbol.
#[derive(Debug, Clone, Parser)]
#[command(name = "ofdm-encode")]
#[command(about = "Encode a payload into one OFDM symbol")]
pub struct EncodeConfig {
    #[command(flatten)]
    pub global: GlobalConfig,

    /// Output file path
    #[arg(short, long)]
    pub output: PathBuf,

    /// Input file path; payload bytes are read, zero-padded or truncated
    /// to fit one symbol
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Inline text payload, used when `--input` is not given
    #[arg(short, long)]
    pub text: Option<String>,

    /// Reference profile: "legacy" or "modern"
    #[arg(long, default_value = "modern")]
    pub profile: String,

    /// Sample rate used only when writing a WAV file
    #[arg(long, default_value = "48000")]
    pub sample_rate: u32,
}

/// An OFDM encoder bound to one configuration.
pub struct Encoder {
    config: EncodeConfig,
    codec: OfdmCodec,
}

impl Encoder {
    pub fn new(config: EncodeConfig) -> Result<Self> {
        let ofdm_config = match config.profile.as_str() {
            "legacy" => OfdmConfig::legacy_default(),
            "modern" => OfdmConfig::modern_default(),
            other => bail!("unknown profile: {} (expected \"legacy\" or \"modern\")", other),
        };
        let codec = OfdmCodec::new(ofdm_config)?;
        Ok(Self { config, codec })
    }

    fn payload(&self) -> Result<Vec<u8>> {
        let n_data = self.codec.config().n_data;
        let mut payload = if let Some(path) = &self.config.input {
            std::fs::read(path).with_context(|| format!("reading {:?}", path))?
        } else if let Some(text) = &self.config.text {
            text.clone().into_bytes()
        } else {
            bail!("either --input or --text must be given");
        };

        if payload.len() > n_data {
            bail!("payload is {} bytes, but this symbol only carries {}", payload.len(), n_data);
        }
        payload.resize(n_data, 0);
        Ok(payload)
    }

    /// Encode the configured payload and write it to `config.output`.
    pub fn run(&self) -> Result<()> {
        let payload = self.payload()?;
        tracing::info!(bytes = payload.len(), profile = %self.config.profile, "encoding symbol");

        match self.codec.encode_auto(&payload)? {
            EncodedSymbol::Complex(samples) => {
                common::write_complex_samples(&self.config.output, &samples)?;
            }
            EncodedSymbol::Real(samples) => {
                let format = AudioFormat::from_path(&self.config.output);
                common::write_real_samples(&self.config.output, &samples, self.config.sample_rate, format)?;
            }
        }
        tracing::info!(output = ?self.config.output, "wrote symbol");
        Ok(())
    }
}
