//! Subcarrier assembly and disassembly (C3)
//!
//! Both pilot layouts reduce to the same shape: a deterministic list of
//! data-bin indices (in emission order) and pilot-bin indices, computed
//! once per configuration and then reused by both the modulator (to place
//! points and pilots) and the demodulator (to read them back out).

use crate::config::{OfdmConfig, PilotLayout};
use crate::error::{OfdmError, Result};
use ofdm_core::Complex;
use std::collections::HashSet;

/// Precomputed bin placement for one configuration.
pub struct LayoutPlan {
    /// Spectrum indices carrying data, in the order QAM points are placed.
    pub data_bins: Vec<usize>,
    /// Spectrum indices carrying the pilot tone.
    pub pilot_bins: Vec<usize>,
}

impl LayoutPlan {
    pub fn build(config: &OfdmConfig) -> Result<Self> {
        match &config.pilot_layout {
            PilotLayout::Distance { distance, .. } => Ok(legacy_plan(config, *distance)),
            PilotLayout::Explicit { bins, .. } => Ok(explicit_plan(config, bins)),
        }
    }
}

fn legacy_plan(config: &OfdmConfig, distance: usize) -> LayoutPlan {
    let n = config.n;
    let total_qam = config.qam_points_per_symbol();
    let mut k = config.legacy_k_start(distance);
    let mut countdown = distance / 2;
    let mut data_bins = Vec::with_capacity(total_qam);
    let mut pilot_bins = Vec::new();

    for _ in 0..total_qam {
        countdown -= 1;
        if countdown == 0 {
            pilot_bins.push(k);
            k = (k + 1) % n;
            countdown = distance;
        }
        data_bins.push(k);
        k = (k + 1) % n;
    }

    LayoutPlan { data_bins, pilot_bins }
}

fn explicit_plan(config: &OfdmConfig, bins: &[i64]) -> LayoutPlan {
    let n = config.n as i64;
    let k_start = config.explicit_k_start(bins.len()) as i64;
    let pilot_set: HashSet<i64> = bins.iter().copied().collect();

    let mut data_bins = Vec::new();
    let mut pilot_bins = Vec::new();
    for k in (-k_start..0).chain(1..=k_start) {
        let idx = if k < 0 { (n + k) as usize } else { k as usize };
        if pilot_set.contains(&k) {
            pilot_bins.push(idx);
        } else {
            data_bins.push(idx);
        }
    }

    LayoutPlan { data_bins, pilot_bins }
}

/// Write `qam_points` and the pilot tone(s) into a fresh, zero-filled
/// length-`N` spectrum. DC and every bin outside the active band are left
/// at zero (spec §3 Invariant-1).
pub fn assemble_spectrum(config: &OfdmConfig, qam_points: &[Complex]) -> Result<Vec<Complex>> {
    let plan = LayoutPlan::build(config)?;
    if qam_points.len() != plan.data_bins.len() {
        return Err(OfdmError::LengthMismatch {
            expected: plan.data_bins.len(),
            actual: qam_points.len(),
        });
    }

    let amplitude = match &config.pilot_layout {
        PilotLayout::Distance { amplitude, .. } => *amplitude,
        PilotLayout::Explicit { amplitude, .. } => *amplitude,
    };

    let mut spectrum = vec![Complex::ZERO; config.n];
    for (&bin, &point) in plan.data_bins.iter().zip(qam_points) {
        spectrum[bin] = point;
    }
    for &bin in &plan.pilot_bins {
        spectrum[bin] = Complex::new(amplitude, 0.0);
    }
    Ok(spectrum)
}

/// Read a received spectrum back into its data points (in the same order
/// they were placed) and the raw received pilot values, used by the fine
/// synchroniser's pilot metric.
pub fn extract_spectrum(config: &OfdmConfig, spectrum: &[Complex]) -> Result<(Vec<Complex>, Vec<Complex>)> {
    if spectrum.len() != config.n {
        return Err(OfdmError::LengthMismatch {
            expected: config.n,
            actual: spectrum.len(),
        });
    }
    let plan = LayoutPlan::build(config)?;
    let data_points = plan.data_bins.iter().map(|&b| spectrum[b]).collect();
    let pilot_values = plan.pilot_bins.iter().map(|&b| spectrum[b]).collect();
    Ok((data_points, pilot_values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CyclicPrefixLen;
    use crate::config::Profile;
    use crate::config::SignalDomain;

    #[test]
    fn legacy_layout_never_touches_dc() {
        let config = OfdmConfig::legacy_default();
        let plan = LayoutPlan::build(&config).unwrap();
        assert!(!plan.data_bins.contains(&0));
        assert!(!plan.pilot_bins.contains(&0));
    }

    #[test]
    fn explicit_layout_matches_configured_pilots() {
        let config = OfdmConfig::modern_default();
        let plan = LayoutPlan::build(&config).unwrap();
        assert_eq!(plan.pilot_bins.len(), 4);
        assert_eq!(plan.data_bins.len(), config.qam_points_per_symbol());
    }

    #[test]
    fn assemble_then_extract_roundtrips_data_points() {
        let config = OfdmConfig::modern_default();
        let points: Vec<Complex> = (0..config.qam_points_per_symbol())
            .map(|i| Complex::new(i as f64, -(i as f64)))
            .collect();
        let spectrum = assemble_spectrum(&config, &points).unwrap();
        let (data, pilots) = extract_spectrum(&config, &spectrum).unwrap();
        assert_eq!(data, points);
        assert_eq!(pilots.len(), 4);
        for p in pilots {
            assert_eq!(p.real, 1.0);
            assert_eq!(p.imag, 0.0);
        }
    }

    #[test]
    fn assemble_rejects_wrong_point_count() {
        let config = OfdmConfig::modern_default();
        let points = vec![Complex::ZERO; 3];
        assert!(assemble_spectrum(&config, &points).is_err());
    }

    #[test]
    fn small_custom_layout_is_symmetric_around_dc() {
        let config = OfdmConfig::new(
            16,
            Profile::Modern,
            SignalDomain::Complex,
            PilotLayout::Explicit { bins: vec![-3, 3], amplitude: 1.0 },
            1,
            CyclicPrefixLen::Fraction(0.25),
            2,
            1,
        )
        .unwrap();
        let plan = LayoutPlan::build(&config).unwrap();
        assert_eq!(plan.pilot_bins.len(), 2);
        assert!(plan.data_bins.iter().all(|&b| b != 0));
    }
}
