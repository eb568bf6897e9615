//! ofdm-decode - decode a captured OFDM symbol into payload bytes

use anyhow::Result;
use clap::Parser;
use ofdm_tools::{common, DecodeConfig, Decoder};

fn main() -> Result<()> {
    let config = DecodeConfig::parse();
    common::init_logging(&config.global)?;

    let decoder = Decoder::new(config)?;
    decoder.run()
}
