//! `OfdmCodec`: the façade that wires C1-C7 into one encode/decode API.

use crate::config::{OfdmConfig, SignalDomain};
use crate::error::{OfdmError, Result};
use crate::qam::SquareQam;
use crate::{cyclic_prefix, nyquist, scrambler, subcarrier, sync};
use ofdm_core::{Complex, FftConfig, FftProcessor};

/// A configured OFDM encoder/decoder for one symbol at a time.
///
/// One `OfdmCodec` is built per `OfdmConfig` and reused across symbols -
/// the FFT plan and QAM table it holds are immutable and safe to share.
pub struct OfdmCodec {
    config: OfdmConfig,
    fft: FftProcessor,
    qam: SquareQam,
}

impl OfdmCodec {
    pub fn new(config: OfdmConfig) -> Result<Self> {
        let fft = FftProcessor::new(FftConfig::new(config.n)?)?;
        let normalize = matches!(config.profile, crate::config::Profile::Modern);
        let qam = SquareQam::new(config.m_qam, normalize);
        Ok(Self { config, fft, qam })
    }

    pub fn config(&self) -> &OfdmConfig {
        &self.config
    }

    pub fn fft(&self) -> &FftProcessor {
        &self.fft
    }

    /// Encode one symbol's worth of payload into the complex domain
    /// (cyclic prefix + IFFT body, no Nyquist folding). Used by the
    /// modern profile directly, and as the inner stage of `encode_real`.
    pub fn encode(&self, payload: &[u8]) -> Result<Vec<Complex>> {
        let spectrum = self.assemble(payload)?;
        let mut body = vec![Complex::ZERO; self.config.n];
        self.fft.ifft(&spectrum, &mut body)?;
        cyclic_prefix::prepend(&body, self.config.cyclic_len())
    }

    /// Decode one complex-domain framed symbol back into payload bytes and
    /// the pilot alignment metric `P` (spec §4.7/§4.8; lower is better).
    pub fn decode(&self, framed: &[Complex]) -> Result<(Vec<u8>, f64)> {
        let body = cyclic_prefix::strip(framed, self.config.cyclic_len())?;
        self.disassemble(body)
    }

    /// Encode one symbol's worth of payload into a real sample stream:
    /// IFFT, Nyquist-fold to real samples, then prepend the cyclic prefix
    /// in the real domain (spec §4.5's ordering for the legacy profile).
    pub fn encode_real(&self, payload: &[u8]) -> Result<Vec<f64>> {
        let spectrum = self.assemble(payload)?;
        let mut body = vec![Complex::ZERO; self.config.n];
        self.fft.ifft(&spectrum, &mut body)?;
        let real_body = nyquist::modulate(&body);
        cyclic_prefix::prepend(&real_body, self.config.cyclic_len())
    }

    /// Decode one real, Nyquist-folded framed symbol back into payload
    /// bytes and the pilot alignment metric `P`.
    pub fn decode_real(&self, framed: &[f64]) -> Result<(Vec<u8>, f64)> {
        let real_body = cyclic_prefix::strip(framed, self.config.cyclic_len())?;
        let body = nyquist::demodulate(real_body)?;
        self.disassemble(&body)
    }

    /// Encode using whichever domain `config.domain` names.
    pub fn encode_auto(&self, payload: &[u8]) -> Result<EncodedSymbol> {
        match self.config.domain {
            SignalDomain::Complex => Ok(EncodedSymbol::Complex(self.encode(payload)?)),
            SignalDomain::Real => Ok(EncodedSymbol::Real(self.encode_real(payload)?)),
        }
    }

    /// Encode an arbitrary-length payload as a sequence of symbols: split
    /// into `n_data`-byte chunks, zero-padding the final chunk, encode each
    /// chunk independently, and concatenate the framed symbols back to back
    /// in transmission order (spec §4.8/§6).
    pub fn encode_stream(&self, payload: &[u8]) -> Result<EncodedStream> {
        match self.config.domain {
            SignalDomain::Complex => {
                let mut out = Vec::with_capacity(self.stream_capacity(payload.len()));
                for chunk in self.chunks(payload) {
                    out.extend(self.encode(&chunk)?);
                }
                Ok(EncodedStream::Complex(out))
            }
            SignalDomain::Real => {
                let mut out = Vec::with_capacity(self.stream_capacity(payload.len()));
                for chunk in self.chunks(payload) {
                    out.extend(self.encode_real(&chunk)?);
                }
                Ok(EncodedStream::Real(out))
            }
        }
    }

    /// Begin a stateful decode over a complex-domain capture, starting the
    /// cursor at `start` (typically `find_symbol_start`'s result).
    pub fn init_decode<'a>(&'a self, signal: &'a [Complex], start: usize) -> StreamDecoder<'a> {
        StreamDecoder { codec: self, signal, cursor: start }
    }

    /// Begin a stateful decode over a real, Nyquist-folded capture.
    pub fn init_decode_real<'a>(&'a self, signal: &'a [f64], start: usize) -> RealStreamDecoder<'a> {
        RealStreamDecoder { codec: self, signal, cursor: start }
    }

    /// Split `payload` into `n_data`-byte chunks, zero-padding the last one.
    fn chunks(&self, payload: &[u8]) -> Vec<Vec<u8>> {
        let n_data = self.config.n_data;
        if payload.is_empty() {
            return vec![vec![0u8; n_data]];
        }
        payload
            .chunks(n_data)
            .map(|chunk| {
                let mut padded = chunk.to_vec();
                padded.resize(n_data, 0);
                padded
            })
            .collect()
    }

    fn stream_capacity(&self, payload_len: usize) -> usize {
        let symbols = payload_len.div_ceil(self.config.n_data.max(1)).max(1);
        symbols * self.config.framed_len()
    }

    /// Locate the next symbol start in a complex-domain capture.
    pub fn find_symbol_start(
        &self,
        signal: &[Complex],
        search_window: usize,
        fine_range: usize,
    ) -> Result<sync::SyncOutcome> {
        sync::find_symbol_start_complex(&self.config, &self.fft, signal, search_window, fine_range)
    }

    /// Locate the next symbol start in a real, Nyquist-folded capture.
    pub fn find_symbol_start_real(
        &self,
        signal: &[f64],
        search_window: usize,
        fine_range: usize,
    ) -> Result<sync::SyncOutcome> {
        sync::find_symbol_start_real(&self.config, &self.fft, signal, search_window, fine_range)
    }

    fn assemble(&self, payload: &[u8]) -> Result<Vec<Complex>> {
        if payload.len() != self.config.n_data {
            return Err(OfdmError::LengthMismatch {
                expected: self.config.n_data,
                actual: payload.len(),
            });
        }
        let mut bytes = payload.to_vec();
        scrambler::for_profile(self.config.profile, self.config.scrambler_seed).apply(&mut bytes);
        let bits = bytes_to_bits(&bytes);
        let points = self.qam.map(&bits);
        subcarrier::assemble_spectrum(&self.config, &points)
    }

    fn disassemble(&self, body: &[Complex]) -> Result<(Vec<u8>, f64)> {
        if body.len() != self.config.n {
            return Err(OfdmError::LengthMismatch {
                expected: self.config.n,
                actual: body.len(),
            });
        }
        let mut spectrum = vec![Complex::ZERO; self.config.n];
        self.fft.fft(body, &mut spectrum)?;
        let (points, pilots) = subcarrier::extract_spectrum(&self.config, &spectrum)?;
        let pilot_score = sync::pilot_metric(self.config.profile, &pilots);
        let bits = self.qam.demap(&points);
        let mut bytes = bits_to_bytes(&bits);
        scrambler::for_profile(self.config.profile, self.config.scrambler_seed).apply(&mut bytes);
        Ok((bytes, pilot_score))
    }
}

/// Either domain a symbol can come out of `encode_auto` in.
pub enum EncodedSymbol {
    Complex(Vec<Complex>),
    Real(Vec<f64>),
}

/// Either domain a multi-symbol payload can come out of `encode_stream` in.
pub enum EncodedStream {
    Complex(Vec<Complex>),
    Real(Vec<f64>),
}

/// A stateful decode cursor over a captured complex-domain stream (spec
/// §4.8). Each `decode` call consumes one framed symbol (`C + N'` samples)
/// starting at the cursor, advances the cursor past it, and returns the
/// recovered bytes alongside the pilot alignment metric `P`.
pub struct StreamDecoder<'a> {
    codec: &'a OfdmCodec,
    signal: &'a [Complex],
    cursor: usize,
}

impl<'a> StreamDecoder<'a> {
    /// Current cursor position, in samples from the start of the capture.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// True once fewer than one full framed symbol remains in the capture.
    pub fn is_exhausted(&self) -> bool {
        self.cursor + self.codec.config.framed_len() > self.signal.len()
    }

    /// Decode the symbol at the cursor and advance it by `C + N'`.
    pub fn decode(&mut self) -> Result<(Vec<u8>, f64)> {
        let framed_len = self.codec.config.framed_len();
        if self.cursor + framed_len > self.signal.len() {
            return Err(OfdmError::InsufficientSamples {
                needed: self.cursor + framed_len - self.signal.len(),
            });
        }
        let framed = &self.signal[self.cursor..self.cursor + framed_len];
        let result = self.codec.decode(framed)?;
        self.cursor += framed_len;
        Ok(result)
    }
}

/// `StreamDecoder`'s real, Nyquist-folded counterpart.
pub struct RealStreamDecoder<'a> {
    codec: &'a OfdmCodec,
    signal: &'a [f64],
    cursor: usize,
}

impl<'a> RealStreamDecoder<'a> {
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor + self.codec.config.framed_len() > self.signal.len()
    }

    pub fn decode(&mut self) -> Result<(Vec<u8>, f64)> {
        let framed_len = self.codec.config.framed_len();
        if self.cursor + framed_len > self.signal.len() {
            return Err(OfdmError::InsufficientSamples {
                needed: self.cursor + framed_len - self.signal.len(),
            });
        }
        let framed = &self.signal[self.cursor..self.cursor + framed_len];
        let result = self.codec.decode_real(framed)?;
        self.cursor += framed_len;
        Ok(result)
    }
}

fn bytes_to_bits(bytes: &[u8]) -> Vec<bool> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for &byte in bytes {
        for i in 0..8 {
            bits.push((byte >> i) & 1 == 1);
        }
    }
    bits
}

fn bits_to_bytes(bits: &[bool]) -> Vec<u8> {
    bits.chunks(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0u8, |acc, (i, &b)| acc | ((b as u8) << i))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modern_complex_roundtrip() {
        let config = OfdmConfig::modern_default();
        let codec = OfdmCodec::new(config.clone()).unwrap();
        let payload: Vec<u8> = (0..config.n_data as u8).collect();
        let framed = codec.encode(&payload).unwrap();
        assert_eq!(framed.len(), config.complex_symbol_len());
        let (recovered, pilot_score) = codec.decode(&framed).unwrap();
        assert_eq!(recovered, payload);
        assert!(pilot_score < 1e-6);
    }

    #[test]
    fn legacy_real_roundtrip() {
        let config = OfdmConfig::legacy_default();
        let codec = OfdmCodec::new(config.clone()).unwrap();
        let payload: Vec<u8> = (0..config.n_data).map(|i| (i * 37 % 256) as u8).collect();
        let framed = codec.encode_real(&payload).unwrap();
        assert_eq!(framed.len(), config.framed_len());
        let (recovered, _pilot_score) = codec.decode_real(&framed).unwrap();
        assert_eq!(recovered, payload);
    }

    #[test]
    fn encode_stream_pads_final_chunk_and_decodes_back() {
        let config = OfdmConfig::modern_default();
        let codec = OfdmCodec::new(config.clone()).unwrap();
        // Two and a half symbols' worth of payload; the last chunk is
        // zero-padded up to n_data.
        let payload: Vec<u8> = (0..(config.n_data * 2 + config.n_data / 2) as u32)
            .map(|i| (i % 256) as u8)
            .collect();

        let stream = match codec.encode_stream(&payload).unwrap() {
            EncodedStream::Complex(samples) => samples,
            EncodedStream::Real(_) => panic!("expected complex stream"),
        };
        assert_eq!(stream.len(), 3 * config.complex_symbol_len());

        let mut decoder = codec.init_decode(&stream, 0);
        let mut recovered = Vec::new();
        while !decoder.is_exhausted() {
            let (bytes, pilot_score) = decoder.decode().unwrap();
            assert!(pilot_score < 1e-6);
            recovered.extend(bytes);
        }
        assert_eq!(&recovered[..payload.len()], payload.as_slice());
        assert!(recovered[payload.len()..].iter().all(|&b| b == 0));
    }

    #[test]
    fn stream_decoder_reports_insufficient_samples_past_the_end() {
        let config = OfdmConfig::modern_default();
        let codec = OfdmCodec::new(config.clone()).unwrap();
        let payload = vec![0u8; config.n_data];
        let framed = codec.encode(&payload).unwrap();

        let mut decoder = codec.init_decode(&framed, 0);
        decoder.decode().unwrap();
        assert!(decoder.is_exhausted());
        assert!(decoder.decode().is_err());
    }

    #[test]
    fn rejects_wrong_payload_length() {
        let config = OfdmConfig::modern_default();
        let codec = OfdmCodec::new(config).unwrap();
        assert!(codec.encode(&[0u8; 3]).is_err());
    }

    #[test]
    fn sixteen_qam_modern_roundtrip() {
        let config = OfdmConfig::new(
            64,
            crate::config::Profile::Modern,
            SignalDomain::Complex,
            crate::config::PilotLayout::Explicit { bins: vec![-21, -7, 7, 21], amplitude: 1.0 },
            24,
            crate::config::CyclicPrefixLen::Fraction(0.25),
            4,
            1,
        )
        .unwrap();
        let codec = OfdmCodec::new(config.clone()).unwrap();
        let payload: Vec<u8> = (0..config.n_data as u8).collect();
        let framed = codec.encode(&payload).unwrap();
        let (recovered, _pilot_score) = codec.decode(&framed).unwrap();
        assert_eq!(recovered, payload);
    }
}
