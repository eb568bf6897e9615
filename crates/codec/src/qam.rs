//! QAM bit packing / mapping / demapping (C2)
//!
//! A single function family, `SquareQam`, covers both profiles: the legacy
//! profile is `SquareQam::new(2, false)` (unnormalised QPSK, matching
//! `original_source/ofdm_codec.py`'s bare `+-1 +- 1j` points), the modern
//! profile is `SquareQam::new(m, true)` for any even `m` (Gray-coded,
//! energy-normalised square constellation, spec §4.2).

use ofdm_core::Complex;

/// A square, Gray-coded M-QAM constellation for even `m` (`M = 2^m`).
pub struct SquareQam {
    /// Bits per complex symbol.
    m: u32,
    /// Levels per axis, `2^(m/2)`.
    levels: u32,
    /// Per-axis normalisation applied after Gray-coded level assignment.
    /// `1.0` reproduces the legacy profile's unnormalised QPSK.
    sigma: f64,
}

impl SquareQam {
    pub fn new(m: u32, normalize: bool) -> Self {
        assert!(m > 0 && m % 2 == 0, "square QAM requires an even m");
        let levels = 1u32 << (m / 2);
        let sigma = if normalize {
            energy_normalisation(m)
        } else {
            1.0
        };
        Self { m, levels, sigma }
    }

    /// Bits carried by one complex symbol.
    pub fn bits_per_symbol(&self) -> u32 {
        self.m
    }

    /// Map a bit buffer (bit `i` is `(bits >> i) & 1`, LSB-first within
    /// each group of `m` bits) into `bits.len() / m` complex points.
    pub fn map(&self, bits: &[bool]) -> Vec<Complex> {
        bits.chunks(self.m as usize)
            .map(|chunk| self.map_one(chunk))
            .collect()
    }

    fn map_one(&self, chunk: &[bool]) -> Complex {
        let half = (self.m / 2) as usize;
        let i_bits = bits_to_u32(&chunk[..half]);
        let q_bits = bits_to_u32(&chunk[half..]);
        Complex::new(self.level(i_bits), self.level(q_bits))
    }

    fn level(&self, natural: u32) -> f64 {
        let gray = natural ^ (natural >> 1);
        (2 * gray as i64 - (self.levels as i64 - 1)) as f64 * self.sigma
    }

    /// Demap complex points back into bits, nearest-level decisioning on
    /// each axis independently.
    pub fn demap(&self, points: &[Complex]) -> Vec<bool> {
        let half = (self.m / 2) as usize;
        let mut bits = Vec::with_capacity(points.len() * self.m as usize);
        for p in points {
            bits.extend(u32_to_bits(self.nearest_natural(p.real), half));
            bits.extend(u32_to_bits(self.nearest_natural(p.imag), half));
        }
        bits
    }

    fn nearest_natural(&self, axis_value: f64) -> u32 {
        let scaled = axis_value / self.sigma;
        let raw_level = ((scaled + self.levels as f64 - 1.0) / 2.0).round();
        let gray = raw_level.clamp(0.0, self.levels as f64 - 1.0) as u32;
        gray_to_binary(gray)
    }
}

fn bits_to_u32(bits: &[bool]) -> u32 {
    bits.iter()
        .enumerate()
        .fold(0u32, |acc, (i, &b)| acc | ((b as u32) << i))
}

fn u32_to_bits(value: u32, count: usize) -> Vec<bool> {
    (0..count).map(|i| (value >> i) & 1 == 1).collect()
}

fn gray_to_binary(gray: u32) -> u32 {
    let mut binary = gray;
    let mut shift = 1;
    while shift < 32 {
        binary ^= binary >> shift;
        shift <<= 1;
    }
    binary
}

/// `sigma = sqrt(2^(2 - m/2) / sum_{i=1,3,..,2^(m/2)-1} i^2)`, the per-axis
/// scale that normalises average symbol energy to 1.
fn energy_normalisation(m: u32) -> f64 {
    let levels = 1u32 << (m / 2);
    let sum: f64 = (1..levels).step_by(2).map(|i| (i * i) as f64).sum();
    (2f64.powi(2 - (m / 2) as i32) / sum).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_qpsk_is_unnormalised() {
        let qam = SquareQam::new(2, false);
        let points = qam.map(&[false, false, true, false, false, true, true, true]);
        assert_eq!(points.len(), 4);
        for p in &points {
            assert!((p.real.abs() - 1.0).abs() < 1e-12);
            assert!((p.imag.abs() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn qpsk_roundtrip() {
        let qam = SquareQam::new(2, false);
        let bits = vec![true, false, false, true, true, true, false, false];
        let points = qam.map(&bits);
        let recovered = qam.demap(&points);
        assert_eq!(bits, recovered);
    }

    #[test]
    fn sixteen_qam_is_energy_normalised() {
        let qam = SquareQam::new(4, true);
        assert!((qam.sigma - 1.0 / 10f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn sixteen_qam_roundtrip() {
        let qam = SquareQam::new(4, true);
        let bits: Vec<bool> = (0..64).map(|i| i % 3 == 0).collect();
        let points = qam.map(&bits);
        let recovered = qam.demap(&points);
        assert_eq!(bits, recovered);
    }

    #[test]
    fn sixty_four_qam_roundtrip() {
        let qam = SquareQam::new(6, true);
        let bits: Vec<bool> = (0..120).map(|i| (i * 7) % 5 < 2).collect();
        let points = qam.map(&bits);
        let recovered = qam.demap(&points);
        assert_eq!(bits, recovered);
    }
}
