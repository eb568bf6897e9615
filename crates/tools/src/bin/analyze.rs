//! ofdm-analyze - report symbol-start synchronisation diagnostics

use anyhow::Result;
use clap::Parser;
use ofdm_tools::{common, AnalyzeConfig, SignalAnalyzer};

fn main() -> Result<()> {
    let config = AnalyzeConfig::parse();
    common::init_logging(&config.global)?;

    let analyzer = SignalAnalyzer::new(config)?;
    let report = analyzer.analyze()?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
