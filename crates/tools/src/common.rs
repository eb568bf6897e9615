//! Common utilities and configuration shared by the CLI tools

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global configuration options
#[derive(Debug, Clone, Serialize, Deserialize, clap::Parser)]
pub struct GlobalConfig {
    /// Configuration file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            config: None,
            debug: false,
            log_level: "info".to_string(),
        }
    }
}

/// Which container a signal file is read from or written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    /// A mono WAV file of real samples (the Nyquist-folded real domain).
    Wav,
    /// Raw little-endian `f64` samples, no header.
    Raw,
    /// Raw little-endian interleaved `(re, im)` `f64` pairs (complex
    /// baseband domain).
    Complex,
}

impl AudioFormat {
    /// Detect format from file extension
    pub fn from_path(path: &PathBuf) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("wav") => AudioFormat::Wav,
            Some("raw") => AudioFormat::Raw,
            Some("iq") | Some("complex") => AudioFormat::Complex,
            _ => AudioFormat::Raw,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "wav",
            AudioFormat::Raw => "raw",
            AudioFormat::Complex => "iq",
        }
    }
}

/// Progress reporter for long-running (multi-symbol) operations
pub struct ProgressReporter {
    total: usize,
    current: usize,
    last_percent: u8,
    verbose: bool,
}

impl ProgressReporter {
    pub fn new(total: usize, verbose: bool) -> Self {
        Self {
            total,
            current: 0,
            last_percent: 0,
            verbose,
        }
    }

    pub fn update(&mut self, current: usize) {
        self.current = current;

        if self.verbose && self.total > 0 {
            let percent = ((self.current * 100) / self.total) as u8;
            if percent != self.last_percent && percent % 10 == 0 {
                tracing::info!(percent, "progress");
                self.last_percent = percent;
            }
        }
    }

    pub fn complete(&mut self) {
        if self.verbose {
            tracing::info!(current = self.current, total = self.total, "complete");
        }
    }
}

/// Initialize the `tracing` subscriber from a `GlobalConfig`. `--debug`
/// overrides `--log-level` to `debug`.
pub fn init_logging(config: &GlobalConfig) -> Result<()> {
    let level = if config.debug { "debug" } else { config.log_level.as_str() };
    let filter = tracing_subscriber::EnvFilter::try_new(level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).try_init().ok();
    Ok(())
}

/// Load a `T` from a JSON or TOML file, sniffed by content rather than
/// extension so `--config foo` works either way.
pub fn load_config<T: for<'a> Deserialize<'a>>(path: &PathBuf) -> Result<T> {
    let content = std::fs::read_to_string(path)?;

    if let Ok(config) = serde_json::from_str(&content) {
        return Ok(config);
    }

    match toml::from_str(&content) {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("failed to parse config file: {}", e),
    }
}

/// Save a `T` to a file, choosing JSON or TOML by extension (TOML by
/// default).
pub fn save_config<T: Serialize>(config: &T, path: &PathBuf) -> Result<()> {
    let content = if path.extension().and_then(|s| s.to_str()) == Some("json") {
        serde_json::to_string_pretty(config)?
    } else {
        toml::to_string_pretty(config)?
    };

    std::fs::write(path, content)?;
    Ok(())
}

/// Write a real (Nyquist-folded) symbol to disk, as a mono WAV or as raw
/// little-endian `f64` samples depending on `format`.
pub fn write_real_samples(path: &PathBuf, samples: &[f64], sample_rate: u32, format: AudioFormat) -> Result<()> {
    match format {
        AudioFormat::Wav => {
            let spec = hound::WavSpec {
                channels: 1,
                sample_rate,
                bits_per_sample: 32,
                sample_format: hound::SampleFormat::Float,
            };
            let mut writer = hound::WavWriter::create(path, spec)?;
            for &s in samples {
                writer.write_sample(s as f32)?;
            }
            writer.finalize()?;
        }
        AudioFormat::Raw | AudioFormat::Complex => {
            let mut bytes = Vec::with_capacity(samples.len() * 8);
            for &s in samples {
                bytes.extend_from_slice(&s.to_le_bytes());
            }
            std::fs::write(path, bytes)?;
        }
    }
    Ok(())
}

/// Read a real (Nyquist-folded) symbol stream back from a WAV or raw
/// `f64` file.
pub fn read_real_samples(path: &PathBuf, format: AudioFormat) -> Result<Vec<f64>> {
    match format {
        AudioFormat::Wav => {
            let mut reader = hound::WavReader::open(path)?;
            let samples: Result<Vec<f64>, hound::Error> = match reader.spec().sample_format {
                hound::SampleFormat::Float => {
                    reader.samples::<f32>().map(|s| s.map(|v| v as f64)).collect()
                }
                hound::SampleFormat::Int => {
                    let max = (1i64 << (reader.spec().bits_per_sample - 1)) as f64;
                    reader
                        .samples::<i32>()
                        .map(|s| s.map(|v| v as f64 / max))
                        .collect()
                }
            };
            Ok(samples?)
        }
        AudioFormat::Raw | AudioFormat::Complex => {
            let bytes = std::fs::read(path)?;
            Ok(bytes
                .chunks_exact(8)
                .map(|c| f64::from_le_bytes(c.try_into().unwrap()))
                .collect())
        }
    }
}

/// Write a complex symbol as raw interleaved little-endian `(re, im)`
/// `f64` pairs.
pub fn write_complex_samples(path: &PathBuf, samples: &[ofdm_core::Complex]) -> Result<()> {
    let mut bytes = Vec::with_capacity(samples.len() * 16);
    for c in samples {
        bytes.extend_from_slice(&c.real.to_le_bytes());
        bytes.extend_from_slice(&c.imag.to_le_bytes());
    }
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Read back a raw interleaved `(re, im)` `f64` complex sample file.
pub fn read_complex_samples(path: &PathBuf) -> Result<Vec<ofdm_core::Complex>> {
    let bytes = std::fs::read(path)?;
    Ok(bytes
        .chunks_exact(16)
        .map(|c| {
            let re = f64::from_le_bytes(c[0..8].try_into().unwrap());
            let im = f64::from_le_bytes(c[8..16].try_into().unwrap());
            ofdm_core::Complex::new(re, im)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_format_detection() {
        assert_eq!(AudioFormat::from_path(&PathBuf::from("test.wav")), AudioFormat::Wav);
        assert_eq!(AudioFormat::from_path(&PathBuf::from("test.raw")), AudioFormat::Raw);
        assert_eq!(AudioFormat::from_path(&PathBuf::from("test.iq")), AudioFormat::Complex);
        assert_eq!(AudioFormat::from_path(&PathBuf::from("test.unknown")), AudioFormat::Raw);
    }

    #[test]
    fn test_progress_reporter() {
        let mut reporter = ProgressReporter::new(100, false);
        reporter.update(50);
        assert_eq!(reporter.current, 50);
        reporter.complete();
    }

    #[test]
    fn round_trips_through_toml() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("ofdm-tools-test-{}.toml", std::process::id()));
        let config = GlobalConfig {
            config: None,
            debug: true,
            log_level: "debug".into(),
        };
        save_config(&config, &path).unwrap();
        let loaded: GlobalConfig = load_config(&path).unwrap();
        assert_eq!(loaded.debug, config.debug);
        assert_eq!(loaded.log_level, config.log_level);
        std::fs::remove_file(&path).ok();
    }
}
