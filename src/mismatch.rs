//! The mismatch-and-correction pipeline as plain functions.
//!
//! `generate` samples the same tone on the nominal and on the perturbed
//! clock, `reconstruct` maps the perturbed capture back onto the nominal
//! grid, and `compare_spectra` / `reconstruction_error` / `time_view` give
//! the downstream views. Every call recomputes from its inputs.

use crate::config::{Band, MismatchConfig, ReconstructionPolicy, SpectrumOptions};
use crate::core::error::{ensure_non_empty, PreconditionError, Result};
use crate::dsp::spectrum::{frequency_bins, peak_bin};
use crate::dsp::{interp_linear, magnitude_spectrum_db, resample_fourier, TimeGrid};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Both samplings of the tone for one configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capture {
    pub config: MismatchConfig,
    pub nominal: TimeGrid,
    pub reference: Vec<f64>,
    pub mismatch: TimeGrid,
    pub mismatched: Vec<f64>,
}

impl Capture {
    /// Reconstruct with the policy named in the capture's own config
    pub fn reconstruct(&self) -> Result<Reconstruction> {
        reconstruct(self, self.config.policy)
    }
}

/// Sample the tone on the nominal grid and on the mismatched grid.
pub fn generate(config: &MismatchConfig) -> Result<Capture> {
    config.validate()?;

    let nominal = TimeGrid::uniform(config.duration, config.nominal_rate)?;
    let mismatch = TimeGrid::uniform(config.duration, config.actual_rate())?;
    let reference = nominal.sample_tone(config.f_signal);
    let mismatched = mismatch.sample_tone(config.f_signal);

    debug!(
        nominal_samples = nominal.len(),
        mismatched_samples = mismatch.len(),
        actual_rate = config.actual_rate(),
        "generated capture"
    );

    Ok(Capture {
        config: *config,
        nominal,
        reference,
        mismatch,
        mismatched,
    })
}

/// Corrected signal aligned to the nominal grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reconstruction {
    pub policy: ReconstructionPolicy,
    pub corrected: Vec<f64>,
}

pub fn reconstruct(capture: &Capture, policy: ReconstructionPolicy) -> Result<Reconstruction> {
    let corrected = reconstruct_samples(
        capture.nominal.timestamps(),
        capture.mismatch.timestamps(),
        &capture.mismatched,
        policy,
    )?;
    Ok(Reconstruction { policy, corrected })
}

/// Map `mismatched` (sampled at `t_mismatch`) onto `t_nominal`.
///
/// The result always has `t_nominal.len()` samples. `Resample` only reads the
/// length of `t_nominal`.
pub fn reconstruct_samples(
    t_nominal: &[f64],
    t_mismatch: &[f64],
    mismatched: &[f64],
    policy: ReconstructionPolicy,
) -> Result<Vec<f64>> {
    ensure_non_empty(t_nominal, "nominal grid")?;
    ensure_non_empty(mismatched, "mismatched signal")?;

    let corrected = match policy {
        ReconstructionPolicy::Interpolate => interp_linear(t_mismatch, mismatched, t_nominal)?,
        ReconstructionPolicy::Resample => resample_fourier(mismatched, t_nominal.len())?,
    };

    debug!(%policy, from = mismatched.len(), to = corrected.len(), "reconstructed");
    Ok(corrected)
}

/// Which of the three sequences a spectral query refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trace {
    Reference,
    Mismatched,
    Corrected,
}

/// dB magnitude spectra of the three sequences over a shared axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectralComparison {
    pub freqs_hz: Vec<f64>,
    pub reference_db: Vec<f64>,
    pub mismatched_db: Vec<f64>,
    pub corrected_db: Vec<f64>,
}

impl SpectralComparison {
    pub fn len(&self) -> usize {
        self.freqs_hz.len()
    }

    pub fn is_empty(&self) -> bool {
        self.freqs_hz.is_empty()
    }

    pub fn trace(&self, which: Trace) -> &[f64] {
        match which {
            Trace::Reference => &self.reference_db,
            Trace::Mismatched => &self.mismatched_db,
            Trace::Corrected => &self.corrected_db,
        }
    }

    /// Keep only the bins inside `band`
    pub fn band(&self, band: Band) -> Self {
        let keep: Vec<usize> = self
            .freqs_hz
            .iter()
            .enumerate()
            .filter(|(_, f)| band.contains(**f))
            .map(|(i, _)| i)
            .collect();
        let pick = |values: &[f64]| keep.iter().map(|&i| values[i]).collect::<Vec<_>>();

        Self {
            freqs_hz: pick(&self.freqs_hz),
            reference_db: pick(&self.reference_db),
            mismatched_db: pick(&self.mismatched_db),
            corrected_db: pick(&self.corrected_db),
        }
    }

    pub fn peak_frequency_hz(&self, which: Trace) -> Option<f64> {
        peak_bin(self.trace(which)).map(|i| self.freqs_hz[i])
    }
}

/// Magnitude spectra of reference, mismatched and corrected sequences.
///
/// The transform length N is the reference length. The mismatched sequence
/// is cut to N, or zero padded when it is shorter; the corrected sequence
/// must already have N samples.
pub fn compare_spectra(
    reference: &[f64],
    mismatched: &[f64],
    corrected: &[f64],
    nominal_rate: f64,
    options: &SpectrumOptions,
) -> Result<SpectralComparison> {
    ensure_non_empty(reference, "spectral comparison reference")?;
    ensure_non_empty(mismatched, "spectral comparison mismatched")?;
    ensure_non_empty(corrected, "spectral comparison corrected")?;
    if !nominal_rate.is_finite() || nominal_rate <= 0.0 {
        return Err(PreconditionError::invalid_config(
            "nominal_rate",
            format!("must be a positive finite rate, got {}", nominal_rate),
        ));
    }

    let n = reference.len();
    if corrected.len() != n {
        return Err(PreconditionError::length_mismatch(
            "corrected spectrum",
            n,
            corrected.len(),
        ));
    }

    let mut mismatched_n = mismatched[..mismatched.len().min(n)].to_vec();
    mismatched_n.resize(n, 0.0);

    let comparison = SpectralComparison {
        freqs_hz: frequency_bins(n, nominal_rate),
        reference_db: magnitude_spectrum_db(reference, options.window, options.floor)?,
        mismatched_db: magnitude_spectrum_db(&mismatched_n, options.window, options.floor)?,
        corrected_db: magnitude_spectrum_db(corrected, options.window, options.floor)?,
    };

    Ok(match options.band {
        Some(band) => comparison.band(band),
        None => comparison,
    })
}

/// Pointwise difference between corrected and reference signals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorFigures {
    pub max_abs: f64,
    pub rms: f64,
}

pub fn reconstruction_error(reference: &[f64], corrected: &[f64]) -> Result<ErrorFigures> {
    ensure_non_empty(reference, "reconstruction error")?;
    if corrected.len() != reference.len() {
        return Err(PreconditionError::length_mismatch(
            "reconstruction error",
            reference.len(),
            corrected.len(),
        ));
    }

    let (max_abs, sum_sq) = reference
        .iter()
        .zip(corrected)
        .map(|(r, c)| c - r)
        .fold((0.0_f64, 0.0_f64), |(max, sum), d| (max.max(d.abs()), sum + d * d));

    Ok(ErrorFigures {
        max_abs,
        rms: (sum_sq / reference.len() as f64).sqrt(),
    })
}

/// Leading slice of every sequence for a time-domain overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeView {
    pub t_nominal: Vec<f64>,
    pub reference: Vec<f64>,
    pub t_mismatch: Vec<f64>,
    pub mismatched: Vec<f64>,
    pub corrected: Vec<f64>,
}

/// Number of leading nominal instants inside the first `cycles` periods of
/// an `f_signal` tone, i.e. strictly before `cycles / f_signal`.
pub fn leading_cycle_count(t_nominal: &[f64], f_signal: f64, cycles: f64) -> Result<usize> {
    if !cycles.is_finite() || cycles <= 0.0 {
        return Err(PreconditionError::invalid_config(
            "cycles",
            format!("must be a positive finite count, got {}", cycles),
        ));
    }
    if !f_signal.is_finite() || f_signal <= 0.0 {
        return Err(PreconditionError::invalid_config(
            "f_signal",
            "a time view in cycles needs a non-zero tone",
        ));
    }
    let limit = cycles / f_signal;
    Ok(t_nominal.partition_point(|&t| t < limit))
}

/// Keep the first `cycles` periods of the tone.
///
/// The mismatched sequence contributes the same number of leading samples as
/// the nominal ones, or all it has.
pub fn time_view(capture: &Capture, reconstruction: &Reconstruction, cycles: f64) -> Result<TimeView> {
    if reconstruction.corrected.len() != capture.reference.len() {
        return Err(PreconditionError::length_mismatch(
            "time view corrected",
            capture.reference.len(),
            reconstruction.corrected.len(),
        ));
    }

    let count = leading_cycle_count(capture.nominal.timestamps(), capture.config.f_signal, cycles)?;
    let mis_count = count.min(capture.mismatched.len());

    Ok(TimeView {
        t_nominal: capture.nominal.timestamps()[..count].to_vec(),
        reference: capture.reference[..count].to_vec(),
        t_mismatch: capture.mismatch.timestamps()[..mis_count].to_vec(),
        mismatched: capture.mismatched[..mis_count].to_vec(),
        corrected: reconstruction.corrected[..count].to_vec(),
    })
}
