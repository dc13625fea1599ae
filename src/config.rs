//! Run configuration for the mismatch-and-correction pipeline.
//!
//! Every field defaults to the scenario the lab scripts were written around:
//! a 200 MHz tone sampled at 2 GS/s for 25 ns with a +200 ppm clock offset.

use crate::core::PreconditionError;
use crate::dsp::grid;
use crate::dsp::spectrum::Window;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Largest grid the generator will allocate.
pub const MAX_GRID_SAMPLES: usize = 1 << 24;

/// Additive magnitude floor applied before converting spectra to dB.
pub const DEFAULT_SPECTRAL_FLOOR: f64 = 1e-12;

/// How the mismatched capture is mapped back onto the nominal grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconstructionPolicy {
    /// Piecewise-linear interpolation evaluated at the nominal timestamps,
    /// extrapolating linearly past either end of the mismatched span.
    #[default]
    Interpolate,

    /// Fourier-domain resampling to the nominal sample count.
    ///
    /// Only the cardinality is matched: the new samples are assumed to be
    /// uniformly spread over the nominal span and the actual timestamps are
    /// ignored. Fidelity degrades once the two grids' implicit spacings drift
    /// far enough apart that matching the count misaligns phase.
    Resample,
}

impl ReconstructionPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Interpolate => "interpolate",
            Self::Resample => "resample",
        }
    }
}

impl fmt::Display for ReconstructionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReconstructionPolicy {
    type Err = PreconditionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "interpolate" | "interp" | "linear" => Ok(Self::Interpolate),
            "resample" | "fourier" => Ok(Self::Resample),
            other => Err(PreconditionError::invalid_config(
                "policy",
                format!("'{}' is not one of interpolate, resample", other),
            )),
        }
    }
}

/// Scalar inputs of a mismatch run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MismatchConfig {
    /// Tone frequency in Hz, below the nominal Nyquist limit
    pub f_signal: f64,

    /// Reference sampling rate in Hz
    pub nominal_rate: f64,

    /// Signed clock offset in parts per million
    pub ppm_error: i32,

    /// Captured span in seconds
    pub duration: f64,

    pub policy: ReconstructionPolicy,
}

impl Default for MismatchConfig {
    fn default() -> Self {
        Self {
            f_signal: 200e6,
            nominal_rate: 2e9,
            ppm_error: 200,
            duration: 25e-9,
            policy: ReconstructionPolicy::Interpolate,
        }
    }
}

impl MismatchConfig {
    pub fn with_ppm_error(mut self, ppm_error: i32) -> Self {
        self.ppm_error = ppm_error;
        self
    }

    pub fn with_policy(mut self, policy: ReconstructionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Rate of the perturbed clock: nominal · (1 + ppm·1e-6)
    pub fn actual_rate(&self) -> f64 {
        self.nominal_rate * (1.0 + f64::from(self.ppm_error) * 1e-6)
    }

    pub fn nyquist(&self) -> f64 {
        self.nominal_rate / 2.0
    }

    /// Check every constraint before anything is generated.
    pub fn validate(&self) -> std::result::Result<(), PreconditionError> {
        if !self.nominal_rate.is_finite() || self.nominal_rate <= 0.0 {
            return Err(PreconditionError::invalid_config(
                "nominal_rate",
                format!("must be a positive finite rate, got {}", self.nominal_rate),
            ));
        }
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(PreconditionError::invalid_config(
                "duration",
                format!("must be a positive finite span, got {}", self.duration),
            ));
        }
        if !self.f_signal.is_finite() || self.f_signal < 0.0 {
            return Err(PreconditionError::invalid_config(
                "f_signal",
                format!("must be a non-negative finite frequency, got {}", self.f_signal),
            ));
        }
        if self.f_signal >= self.nyquist() {
            return Err(PreconditionError::invalid_config(
                "f_signal",
                format!(
                    "{} Hz is at or above the Nyquist limit of {} Hz",
                    self.f_signal,
                    self.nyquist()
                ),
            ));
        }

        let actual_rate = self.actual_rate();
        if !actual_rate.is_finite() || actual_rate <= 0.0 {
            return Err(PreconditionError::invalid_config(
                "ppm_error",
                format!("{} ppm leaves a non-positive actual rate", self.ppm_error),
            ));
        }

        for (field, rate) in [("nominal_rate", self.nominal_rate), ("ppm_error", actual_rate)] {
            let samples = grid::sample_count(self.duration, rate);
            if samples > MAX_GRID_SAMPLES as f64 {
                return Err(PreconditionError::invalid_config(
                    field,
                    format!(
                        "grid of {} samples exceeds the {} sample limit",
                        samples, MAX_GRID_SAMPLES
                    ),
                ));
            }
        }

        Ok(())
    }

    /// Load a config from a JSON file; absent keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }
}

/// Frequency window kept by a zoomed spectral view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub center_hz: f64,
    pub half_width_hz: f64,
}

impl Band {
    pub fn contains(&self, freq_hz: f64) -> bool {
        (freq_hz - self.center_hz).abs() <= self.half_width_hz
    }
}

/// Options of the spectral comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrumOptions {
    pub window: Window,

    /// Added to each normalised magnitude so silent bins stay finite in dB
    pub floor: f64,

    /// Restrict the reported bins to this band
    pub band: Option<Band>,
}

impl Default for SpectrumOptions {
    fn default() -> Self {
        Self {
            window: Window::Rectangular,
            floor: DEFAULT_SPECTRAL_FLOOR,
            band: None,
        }
    }
}
