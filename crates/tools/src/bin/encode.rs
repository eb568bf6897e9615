//! ofdm-encode - encode a payload into one OFDM symbol

use anyhow::Result;
use clap::Parser;
use ofdm_tools::{common, EncodeConfig, Encoder};

fn main() -> Result<()> {
    let config = EncodeConfig::parse();
    common::init_logging(&config.global)?;

    let encoder = Encoder::new(config)?;
    encoder.run()
}
