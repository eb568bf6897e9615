//! OFDM configuration (spec §3 data model)
//!
//! `OfdmConfig` is immutable once built; `OfdmConfig::new` performs every
//! `ConfigInvalid` check up front so that `OfdmCodec` can assume a valid
//! layout for the lifetime of the session, mirroring the teacher's
//! `ModulationConfig::new` / `FftConfig::new` validated-constructor style.

use crate::error::{OfdmError, Result};
use serde::{Deserialize, Serialize};

/// Which reference variant this configuration follows.
///
/// The legacy profile matches `original_source/ofdm_codec.py`: unnormalised
/// QPSK, LSB-first bit packing, the distance-based pilot schedule, and the
/// `sum |Im|` pilot metric. The modern profile is the general, Gray-coded,
/// energy-normalised square-QAM scheme of spec.md §4.2/§4.3 with an
/// explicit pilot-index list and a `sum Im^2` pilot metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Profile {
    Legacy,
    Modern,
}

/// Whether a symbol occupies the complex baseband domain or has been
/// folded through the Nyquist quadrature modulator (C6) into a real
/// passband-or-baseband stream at twice the sample count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalDomain {
    Complex,
    Real,
}

/// Pilot subcarrier placement (spec §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PilotLayout {
    /// One pilot every `distance`-th active bin, starting from a countdown
    /// of `distance / 2`. Requires `distance >= 2` (spec §9 Open Question).
    Distance { distance: usize, amplitude: f64 },
    /// An explicit, caller-supplied set of signed bin indices (negative
    /// means below DC), all sharing one amplitude.
    Explicit { bins: Vec<i64>, amplitude: f64 },
}

/// Cyclic prefix length, either a literal sample count or a fraction of
/// `N`. Both are interpreted in whatever domain the prefix is actually
/// applied to - see `OfdmCodec`'s encode/decode ordering for why that
/// domain differs between profiles (DESIGN.md Open Question 4).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum CyclicPrefixLen {
    Absolute(usize),
    Fraction(f64),
}

/// Immutable OFDM codec configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfdmConfig {
    /// FFT length / subcarrier count.
    pub n: usize,
    pub profile: Profile,
    pub domain: SignalDomain,
    pub pilot_layout: PilotLayout,
    /// Payload bytes per OFDM symbol.
    pub n_data: usize,
    pub cyclic: CyclicPrefixLen,
    /// Bits per QAM symbol (`M = 2^m_qam`).
    pub m_qam: u32,
    /// Energy-dispersal scrambler seed. Defaults to 1, matching the
    /// original reference's `random.seed(1)`.
    pub scrambler_seed: u64,
}

impl OfdmConfig {
    /// Validate and construct a configuration.
    pub fn new(
        n: usize,
        profile: Profile,
        domain: SignalDomain,
        pilot_layout: PilotLayout,
        n_data: usize,
        cyclic: CyclicPrefixLen,
        m_qam: u32,
        scrambler_seed: u64,
    ) -> Result<Self> {
        if n == 0 {
            return Err(OfdmError::ConfigInvalid {
                msg: "N must be positive".into(),
            });
        }

        match profile {
            Profile::Legacy => {
                if m_qam != 2 {
                    return Err(OfdmError::ConfigInvalid {
                        msg: "the legacy profile is fixed at m=2 (QPSK)".into(),
                    });
                }
                if !matches!(pilot_layout, PilotLayout::Distance { .. }) {
                    return Err(OfdmError::ConfigInvalid {
                        msg: "the legacy profile requires a Distance pilot layout".into(),
                    });
                }
            }
            Profile::Modern => {
                if m_qam == 0 || m_qam % 2 != 0 {
                    return Err(OfdmError::ConfigInvalid {
                        msg: format!("square QAM requires an even m, got {}", m_qam),
                    });
                }
                if !matches!(pilot_layout, PilotLayout::Explicit { .. }) {
                    return Err(OfdmError::ConfigInvalid {
                        msg: "the modern profile requires an Explicit pilot layout".into(),
                    });
                }
            }
        }

        let config = Self {
            n,
            profile,
            domain,
            pilot_layout,
            n_data,
            cyclic,
            m_qam,
            scrambler_seed,
        };

        config.validate_layout()?;
        Ok(config)
    }

    /// `N=64`, `m=2`, pilots at `{-21,-7,7,21}`, `A=1`, cyclic fraction
    /// `0.25`, `nData=12`, complex baseband (spec §6 modern default).
    pub fn modern_default() -> Self {
        Self::new(
            64,
            Profile::Modern,
            SignalDomain::Complex,
            PilotLayout::Explicit {
                bins: vec![-21, -7, 7, 21],
                amplitude: 1.0,
            },
            12,
            CyclicPrefixLen::Fraction(0.25),
            2,
            1,
        )
        .expect("modern_default is a known-valid configuration")
    }

    /// `N=2048`, `d=16`, `A=2`, `nData=256`, `C=N/2` real samples, real
    /// passband domain (spec §6 legacy default).
    pub fn legacy_default() -> Self {
        Self::new(
            2048,
            Profile::Legacy,
            SignalDomain::Real,
            PilotLayout::Distance {
                distance: 16,
                amplitude: 2.0,
            },
            256,
            CyclicPrefixLen::Absolute(2048 / 2),
            2,
            1,
        )
        .expect("legacy_default is a known-valid configuration")
    }

    /// Number of complex QAM points carried by one OFDM symbol's payload.
    pub fn qam_points_per_symbol(&self) -> usize {
        (8 * self.n_data) / self.m_qam as usize
    }

    /// Cyclic prefix length resolved to an absolute sample count, in
    /// whichever domain it is applied to (see `CyclicPrefixLen`'s docs).
    pub fn cyclic_len(&self) -> usize {
        match self.cyclic {
            CyclicPrefixLen::Absolute(c) => c,
            CyclicPrefixLen::Fraction(f) => (f * self.n as f64).round() as usize,
        }
    }

    /// Samples occupied by one framed (CP + body) symbol in the complex
    /// domain, before any Nyquist modulation.
    pub fn complex_symbol_len(&self) -> usize {
        self.n + self.cyclic_len()
    }

    /// Samples occupied by one framed (CP + body) symbol in whichever
    /// domain this configuration actually transmits: `N + C` complex
    /// samples, or `2N + C` real samples once Nyquist-folded.
    pub fn framed_len(&self) -> usize {
        match self.domain {
            SignalDomain::Complex => self.n + self.cyclic_len(),
            SignalDomain::Real => 2 * self.n + self.cyclic_len(),
        }
    }

    /// Body length (no CP) in whichever domain this configuration
    /// transmits.
    pub fn body_len(&self) -> usize {
        match self.domain {
            SignalDomain::Complex => self.n,
            SignalDomain::Real => 2 * self.n,
        }
    }

    /// `k_start` for the legacy distance-based layout: the first bin the
    /// traversal writes to (spec §4.3).
    pub(crate) fn legacy_k_start(&self, distance: usize) -> usize {
        let n = self.n;
        n - n / (2 * distance) - 2 * self.n_data
    }

    /// `k_start` (half-width, in bins on each side of DC) for the explicit
    /// pilot-index layout (spec §4.3).
    pub(crate) fn explicit_k_start(&self, pilot_count: usize) -> usize {
        (self.qam_points_per_symbol() + pilot_count) / 2
    }

    fn validate_layout(&self) -> Result<()> {
        match &self.pilot_layout {
            PilotLayout::Distance { distance, .. } => {
                if *distance < 2 {
                    return Err(OfdmError::ConfigInvalid {
                        msg: "pilot distance must be >= 2 (spec §9 Open Question)".into(),
                    });
                }
                let span = legacy_active_span(self.n_data, *distance);
                let k_start = self.legacy_k_start(*distance);
                if k_start == 0 || k_start + span > self.n {
                    return Err(OfdmError::ConfigInvalid {
                        msg: format!(
                            "nData={} does not fit in the active band for N={}, distance={}",
                            self.n_data, self.n, distance
                        ),
                    });
                }
            }
            PilotLayout::Explicit { bins, .. } => {
                if self.m_qam == 0 || (8 * self.n_data) % self.m_qam as usize != 0 {
                    return Err(OfdmError::ConfigInvalid {
                        msg: "nData*8 must be a multiple of m_qam".into(),
                    });
                }
                let data_count = self.qam_points_per_symbol();
                if (data_count + bins.len()) % 2 != 0 {
                    return Err(OfdmError::ConfigInvalid {
                        msg: "data bin count + pilot count must be even for a symmetric layout"
                            .into(),
                    });
                }
                let k_start = self.explicit_k_start(bins.len());
                if k_start == 0 || k_start >= self.n / 2 {
                    return Err(OfdmError::ConfigInvalid {
                        msg: format!(
                            "nData={} with {} pilots does not fit in the active band for N={}",
                            self.n_data,
                            bins.len(),
                            self.n
                        ),
                    });
                }
                for &b in bins {
                    if b == 0 || b.unsigned_abs() as usize > k_start {
                        return Err(OfdmError::ConfigInvalid {
                            msg: format!("pilot bin {} is outside the active band", b),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

/// Number of spectrum bins the legacy writer consumes for a symbol's
/// worth of data, including the pilots inserted along the way. Used both
/// to validate the configuration and (by the subcarrier assembler) to
/// know where to stop.
pub(crate) fn legacy_active_span(n_data: usize, distance: usize) -> usize {
    let qam_points = n_data * 4; // 8 bits / 2 bits-per-QPSK-symbol
    let mut countdown = distance / 2;
    let mut steps = 0usize;
    for _ in 0..qam_points {
        countdown -= 1;
        if countdown == 0 {
            countdown = distance;
            steps += 1; // the pilot bin itself
        }
        steps += 1; // the data bin
    }
    steps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modern_default_is_valid() {
        let config = OfdmConfig::modern_default();
        assert_eq!(config.n, 64);
        assert_eq!(config.qam_points_per_symbol(), 48);
        assert_eq!(config.cyclic_len(), 16);
    }

    #[test]
    fn legacy_default_is_valid() {
        let config = OfdmConfig::legacy_default();
        assert_eq!(config.n, 2048);
        assert_eq!(config.cyclic_len(), 1024);
    }

    #[test]
    fn rejects_zero_n() {
        assert!(OfdmConfig::new(
            0,
            Profile::Modern,
            SignalDomain::Complex,
            PilotLayout::Explicit { bins: vec![1], amplitude: 1.0 },
            1,
            CyclicPrefixLen::Fraction(0.25),
            2,
            1,
        )
        .is_err());
    }

    #[test]
    fn rejects_pilot_distance_of_one() {
        assert!(OfdmConfig::new(
            2048,
            Profile::Legacy,
            SignalDomain::Real,
            PilotLayout::Distance { distance: 1, amplitude: 2.0 },
            256,
            CyclicPrefixLen::Absolute(1024),
            2,
            1,
        )
        .is_err());
    }

    #[test]
    fn rejects_oversized_payload() {
        assert!(OfdmConfig::new(
            64,
            Profile::Modern,
            SignalDomain::Complex,
            PilotLayout::Explicit { bins: vec![-21, -7, 7, 21], amplitude: 1.0 },
            1000,
            CyclicPrefixLen::Fraction(0.25),
            2,
            1,
        )
        .is_err());
    }

    #[test]
    fn rejects_odd_m_for_modern_profile() {
        assert!(OfdmConfig::new(
            64,
            Profile::Modern,
            SignalDomain::Complex,
            PilotLayout::Explicit { bins: vec![-21, -7, 7, 21], amplitude: 1.0 },
            12,
            CyclicPrefixLen::Fraction(0.25),
            3,
            1,
        )
        .is_err());
    }
}
