//! Two-stage symbol-start synchronisation (C7)
//!
//! Stage one is coarse: the cyclic prefix is a copy of the symbol body's
//! tail, so correlating a candidate window against the samples one body
//! length later peaks at the true symbol start. Stage two is fine: around
//! that coarse peak, demodulate each candidate and pick the one whose
//! pilot subcarrier(s) come back closest to purely real - a misaligned
//! FFT window rotates the pilot phase and leaks energy into its imaginary
//! part (spec §4.7).

use crate::config::{OfdmConfig, Profile};
use crate::error::{OfdmError, Result};
use crate::subcarrier;
use ofdm_core::{Complex, FftProcessor};

/// Result of a completed two-stage search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncOutcome {
    /// Index of the first cyclic-prefix sample (i.e. the frame start).
    pub start: usize,
    /// Coarse-stage estimate, before fine pilot refinement.
    pub coarse_peak: usize,
    /// Fine-stage pilot metric at `start` (lower is better alignment).
    pub metric: f64,
}

/// Locate a symbol start in a complex baseband stream.
pub fn find_symbol_start_complex(
    config: &OfdmConfig,
    fft: &FftProcessor,
    signal: &[Complex],
    search_window: usize,
    fine_range: usize,
) -> Result<SyncOutcome> {
    let cp = config.cyclic_len();
    let body = config.body_len();
    let coarse_peak = coarse_peak_complex(signal, cp, body, search_window)?;
    fine_search(config, fft, coarse_peak, fine_range, cp, body, signal.len(), |start| {
        demodulate_complex_body(signal, start, cp, body)
    })
}

/// Locate a symbol start in a real, Nyquist-folded stream.
pub fn find_symbol_start_real(
    config: &OfdmConfig,
    fft: &FftProcessor,
    signal: &[f64],
    search_window: usize,
    fine_range: usize,
) -> Result<SyncOutcome> {
    let cp = config.cyclic_len();
    let body = config.body_len();
    let coarse_peak = coarse_peak_real(signal, cp, body, search_window)?;
    fine_search(config, fft, coarse_peak, fine_range, cp, body, signal.len(), |start| {
        demodulate_real_body(signal, start, cp, body)
    })
}

fn coarse_peak_complex(signal: &[Complex], cp: usize, body: usize, search_window: usize) -> Result<usize> {
    let frame = cp + body;
    if signal.len() < frame {
        return Err(OfdmError::SyncFailed { search_window });
    }
    let last = (signal.len() - frame).min(search_window.saturating_sub(1));
    (0..=last)
        .max_by(|&a, &b| {
            cp_correlation_complex(signal, a, cp, body)
                .partial_cmp(&cp_correlation_complex(signal, b, cp, body))
                .unwrap()
        })
        .ok_or(OfdmError::SyncFailed { search_window })
}

fn cp_correlation_complex(signal: &[Complex], offset: usize, cp: usize, body: usize) -> f64 {
    let mut acc = Complex::ZERO;
    for j in 0..cp {
        acc = acc + signal[offset + j].conj() * signal[offset + j + body];
    }
    acc.magnitude()
}

fn coarse_peak_real(signal: &[f64], cp: usize, body: usize, search_window: usize) -> Result<usize> {
    let frame = cp + body;
    if signal.len() < frame {
        return Err(OfdmError::SyncFailed { search_window });
    }
    let last = (signal.len() - frame).min(search_window.saturating_sub(1));
    (0..=last)
        .max_by(|&a, &b| {
            cp_correlation_real(signal, a, cp, body)
                .partial_cmp(&cp_correlation_real(signal, b, cp, body))
                .unwrap()
        })
        .ok_or(OfdmError::SyncFailed { search_window })
}

fn cp_correlation_real(signal: &[f64], offset: usize, cp: usize, body: usize) -> f64 {
    let mut acc = 0.0;
    for j in 0..cp {
        acc += signal[offset + j] * signal[offset + j + body];
    }
    acc.abs()
}

fn demodulate_complex_body(signal: &[Complex], start: usize, cp: usize, body: usize) -> Option<Vec<Complex>> {
    let body_start = start + cp;
    if body_start + body > signal.len() {
        return None;
    }
    Some(signal[body_start..body_start + body].to_vec())
}

fn demodulate_real_body(signal: &[f64], start: usize, cp: usize, body: usize) -> Option<Vec<Complex>> {
    let body_start = start + cp;
    if body_start + body > signal.len() {
        return None;
    }
    crate::nyquist::demodulate(&signal[body_start..body_start + body]).ok()
}

fn fine_search(
    config: &OfdmConfig,
    fft: &FftProcessor,
    coarse_peak: usize,
    fine_range: usize,
    cp: usize,
    body: usize,
    signal_len: usize,
    body_at: impl Fn(usize) -> Option<Vec<Complex>>,
) -> Result<SyncOutcome> {
    let low = coarse_peak.saturating_sub(fine_range);
    let high = coarse_peak + fine_range;

    let mut best: Option<(usize, f64)> = None;
    for candidate in low..=high {
        let Some(time_domain) = body_at(candidate) else {
            continue;
        };
        if time_domain.len() != fft.size() {
            continue;
        }
        let mut spectrum = vec![Complex::ZERO; fft.size()];
        fft.fft(&time_domain, &mut spectrum)?;
        let (_, pilots) = subcarrier::extract_spectrum(config, &spectrum)?;
        let metric = pilot_metric(config.profile, &pilots);
        if best.map(|(_, m)| metric < m).unwrap_or(true) {
            best = Some((candidate, metric));
        }
    }

    let needed = (high + cp + body).saturating_sub(signal_len);
    let (start, metric) = best.ok_or(OfdmError::InsufficientSamples { needed })?;

    Ok(SyncOutcome { start, coarse_peak, metric })
}

pub(crate) fn pilot_metric(profile: Profile, pilots: &[Complex]) -> f64 {
    match profile {
        Profile::Legacy => pilots.iter().map(|p| p.imag.abs()).sum(),
        Profile::Modern => pilots.iter().map(|p| p.imag * p.imag).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{codec::OfdmCodec, config::OfdmConfig};

    #[test]
    fn finds_exact_symbol_start_in_complex_domain() {
        let config = OfdmConfig::modern_default();
        let codec = OfdmCodec::new(config.clone()).unwrap();
        let payload = vec![0xAAu8; config.n_data];
        let symbol = codec.encode(&payload).unwrap();

        let leading_silence = vec![Complex::ZERO; 5];
        let mut stream = leading_silence.clone();
        stream.extend(symbol.iter().copied());

        let outcome =
            find_symbol_start_complex(&config, codec.fft(), &stream, 20, 3).unwrap();
        assert_eq!(outcome.start, 5);
        assert!(outcome.metric < 1e-6);
    }

    #[test]
    fn finds_exact_symbol_start_in_real_domain() {
        let config = OfdmConfig::legacy_default();
        let codec = OfdmCodec::new(config.clone()).unwrap();
        let payload = vec![0x5Au8; config.n_data];
        let symbol = codec.encode_real(&payload).unwrap();

        let leading_silence = vec![0.0; 7];
        let mut stream = leading_silence.clone();
        stream.extend(symbol.iter().copied());

        let outcome =
            find_symbol_start_real(&config, codec.fft(), &stream, 40, 3).unwrap();
        assert_eq!(outcome.start, 7);
    }
}
