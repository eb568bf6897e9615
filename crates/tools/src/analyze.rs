//! Signal analysis: symbol-start synchronisation diagnostics

use anyhow::{bail, Result};
use clap::Parser;
use ofdm_codec::prelude::*;
use serde::Serialize;
use std::path::PathBuf;

use crate::common::{self, AudioFormat, GlobalConfig};

/// Report where `find_symbol_start` locates the next symbol in a capture.
#[derive(Debug, Clone, Parser)]
#[command(name = "ofdm-analyze")]
#[command(about = "Report symbol-start synchronisation diagnostics for a capture")]
pub struct AnalyzeConfig {
    #[command(flatten)]
    pub global: GlobalConfig,

    /// Input file path (capture)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Reference profile: "legacy" or "modern"
    #[arg(long, default_value = "modern")]
    pub profile: String,

    #[arg(long, default_value = "512")]
    pub search_window: usize,

    #[arg(long, default_value = "8")]
    pub fine_range: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub start: usize,
    pub coarse_peak: usize,
    pub metric: f64,
}

/// A signal analyzer bound to one configuration.
pub struct SignalAnalyzer {
    config: AnalyzeConfig,
    codec: OfdmCodec,
}

impl SignalAnalyzer {
    pub fn new(config: AnalyzeConfig) -> Result<Self> {
        let ofdm_config = match config.profile.as_str() {
            "legacy" => OfdmConfig::legacy_default(),
            "modern" => OfdmConfig::modern_default(),
            other => bail!("unknown profile: {} (expected \"legacy\" or \"modern\")", other),
        };
        let codec = OfdmCodec::new(ofdm_config)?;
        Ok(Self { config, codec })
    }

    /// Locate the next symbol start and return the report (also printed
    /// as JSON by the `ofdm-analyze` binary).
    pub fn analyze(&self) -> Result<SyncReport> {
        let outcome = match self.codec.config().domain {
            SignalDomain::Complex => {
                let samples = common::read_complex_samples(&self.config.input)?;
                self.codec.find_symbol_start(&samples, self.config.search_window, self.config.fine_range)?
            }
            SignalDomain::Real => {
                let format = AudioFormat::from_path(&self.config.input);
                let samples = common::read_real_samples(&self.config.input, format)?;
                self.codec.find_symbol_start_real(&samples, self.config.search_window, self.config.fine_range)?
            }
        };
        Ok(SyncReport {
            start: outcome.start,
            coarse_peak: outcome.coarse_peak,
            metric: outcome.metric,
        })
    }
}
