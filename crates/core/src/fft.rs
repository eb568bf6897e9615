//! FFT processing wrapper (C4 of the OFDM codec)
//!
//! Forward and inverse DFT of a fixed length `N`. The convention matches
//! the OFDM codec's needs: the inverse transform scales by `1/N`, the
//! forward transform does not scale at all. `N` need not be a power of two
//! - `rustfft`'s planner picks a mixed-radix or Bluestein plan as needed -
//! though power-of-two sizes are the expected case and the cheapest to
//! plan.

use crate::{buffer::Complex, CoreError, Result};
use rustfft::{num_complex::Complex64, FftPlanner};
use std::sync::Arc;

/// FFT configuration
#[derive(Debug, Clone)]
pub struct FftConfig {
    pub size: usize,
}

impl FftConfig {
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(CoreError::InvalidFftSize { size });
        }
        Ok(Self { size })
    }
}

/// Forward/inverse DFT processor for a fixed transform length
pub struct FftProcessor {
    config: FftConfig,
    fft: Arc<dyn rustfft::Fft<f64>>,
    ifft: Arc<dyn rustfft::Fft<f64>>,
}

impl FftProcessor {
    /// Create a new FFT processor for `config.size`-point transforms
    pub fn new(config: FftConfig) -> Result<Self> {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(config.size);
        let ifft = planner.plan_fft_inverse(config.size);

        Ok(Self { config, fft, ifft })
    }

    pub fn config(&self) -> &FftConfig {
        &self.config
    }

    pub fn size(&self) -> usize {
        self.config.size
    }

    /// Forward DFT: `output = FFT(input)`, unscaled
    pub fn fft(&self, input: &[Complex], output: &mut [Complex]) -> Result<()> {
        self.check_lengths(input.len(), output.len())?;

        let mut buffer: Vec<Complex64> =
            input.iter().map(|c| Complex64::new(c.real, c.imag)).collect();
        self.fft.process(&mut buffer);

        for (dst, src) in output.iter_mut().zip(buffer.iter()) {
            *dst = Complex::new(src.re, src.im);
        }
        Ok(())
    }

    /// Inverse DFT: `output = IFFT(input)`, scaled by `1/size`
    pub fn ifft(&self, input: &[Complex], output: &mut [Complex]) -> Result<()> {
        self.check_lengths(input.len(), output.len())?;

        let mut buffer: Vec<Complex64> =
            input.iter().map(|c| Complex64::new(c.real, c.imag)).collect();
        self.ifft.process(&mut buffer);

        let scale = 1.0 / self.config.size as f64;
        for (dst, src) in output.iter_mut().zip(buffer.iter()) {
            *dst = Complex::new(src.re * scale, src.im * scale);
        }
        Ok(())
    }

    fn check_lengths(&self, input_len: usize, output_len: usize) -> Result<()> {
        if input_len != self.config.size {
            return Err(CoreError::BufferSizeMismatch {
                expected: self.config.size,
                actual: input_len,
            });
        }
        if output_len != self.config.size {
            return Err(CoreError::BufferSizeMismatch {
                expected: self.config.size,
                actual: output_len,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fft_config_creation() {
        let config = FftConfig::new(1024).unwrap();
        assert_eq!(config.size, 1024);
    }

    #[test]
    fn test_fft_config_rejects_zero() {
        assert!(FftConfig::new(0).is_err());
    }

    #[test]
    fn test_fft_non_power_of_two() {
        let config = FftConfig::new(12).unwrap();
        let processor = FftProcessor::new(config).unwrap();
        assert_eq!(processor.size(), 12);
    }

    #[test]
    fn test_fft_roundtrip() {
        let config = FftConfig::new(8).unwrap();
        let processor = FftProcessor::new(config).unwrap();

        let input = vec![
            Complex::new(1.0, 0.0),
            Complex::new(0.3, -0.2),
            Complex::new(-0.5, 0.1),
            Complex::new(0.0, 0.0),
            Complex::new(2.0, 1.0),
            Complex::new(0.0, -1.0),
            Complex::new(-1.0, -1.0),
            Complex::new(0.4, 0.4),
        ];

        let mut fft_output = vec![Complex::default(); 8];
        let mut ifft_output = vec![Complex::default(); 8];

        processor.fft(&input, &mut fft_output).unwrap();
        processor.ifft(&fft_output, &mut ifft_output).unwrap();

        for (original, recovered) in input.iter().zip(ifft_output.iter()) {
            assert!((original.real - recovered.real).abs() < 1e-10);
            assert!((original.imag - recovered.imag).abs() < 1e-10);
        }
    }

    #[test]
    fn test_fft_length_mismatch() {
        let config = FftConfig::new(8).unwrap();
        let processor = FftProcessor::new(config).unwrap();
        let input = vec![Complex::default(); 4];
        let mut output = vec![Complex::default(); 8];
        assert!(processor.fft(&input, &mut output).is_err());
    }
}
