//! Nyquist quadrature (de)modulation (C6)
//!
//! Folds one complex OFDM symbol into a real sample stream at twice the
//! sample count by alternating real and imaginary parts, flipping sign
//! every complex sample so the real stream's own spectrum stays centred
//! on the Nyquist frequency. Used by the legacy profile to carry a
//! baseband complex symbol over a single real channel (spec §4.6).

use crate::error::{OfdmError, Result};
use ofdm_core::Complex;

/// `Complex` symbol -> real stream, `2*N` real samples out of `N` complex
/// samples in.
pub fn modulate(symbol: &[Complex]) -> Vec<f64> {
    let mut out = Vec::with_capacity(symbol.len() * 2);
    let mut sign = 1.0;
    for c in symbol {
        out.push(c.real * sign);
        out.push(c.imag * sign);
        sign = -sign;
    }
    out
}

/// Real stream -> `Complex` symbol, the exact inverse of `modulate`.
pub fn demodulate(samples: &[f64]) -> Result<Vec<Complex>> {
    if samples.len() % 2 != 0 {
        return Err(OfdmError::LengthMismatch {
            expected: samples.len() + 1,
            actual: samples.len(),
        });
    }
    let mut out = Vec::with_capacity(samples.len() / 2);
    let mut sign = 1.0;
    for pair in samples.chunks(2) {
        out.push(Complex::new(pair[0] * sign, pair[1] * sign));
        sign = -sign;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_is_exact() {
        let symbol = vec![
            Complex::new(1.0, -2.0),
            Complex::new(0.0, 3.5),
            Complex::new(-1.25, -1.25),
        ];
        let real = modulate(&symbol);
        assert_eq!(real.len(), symbol.len() * 2);
        let recovered = demodulate(&real).unwrap();
        assert_eq!(recovered, symbol);
    }

    #[test]
    fn odd_length_is_rejected() {
        assert!(demodulate(&[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn sign_alternates_per_complex_sample() {
        let symbol = vec![Complex::new(1.0, 1.0), Complex::new(1.0, 1.0)];
        let real = modulate(&symbol);
        assert_eq!(real, vec![1.0, 1.0, -1.0, -1.0]);
    }
}
