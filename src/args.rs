//! clockskew CLI arguments.

use crate::config::{Band, MismatchConfig, ReconstructionPolicy, SpectrumOptions};
use crate::dsp::Window;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// clockskew CLI arguments.
#[derive(Parser, Debug, Clone, PartialEq)]
#[clap(author, version, about = "Simulate clock ppm mismatch on a sampled tone and correct it", long_about = None)]
pub struct Args {
    /// JSON file holding a mismatch config; flags override its values
    #[clap(long, conflicts_with = "pipeline")]
    pub config: Option<PathBuf>,

    /// JSON pipeline document ({"nodes": [...], "connections": [...]})
    #[clap(long)]
    pub pipeline: Option<PathBuf>,

    /// Tone frequency in Hz
    #[clap(long, conflicts_with = "pipeline")]
    pub f_signal: Option<f64>,

    /// Nominal sampling rate in Hz
    #[clap(long, conflicts_with = "pipeline")]
    pub nominal_rate: Option<f64>,

    /// Signed clock offset in ppm
    #[clap(long, allow_negative_numbers = true, conflicts_with = "pipeline")]
    pub ppm_error: Option<i32>,

    /// Captured span in seconds
    #[clap(long, conflicts_with = "pipeline")]
    pub duration: Option<f64>,

    /// Reconstruction policy: interpolate or resample
    #[clap(long, conflicts_with = "pipeline")]
    pub policy: Option<ReconstructionPolicy>,

    /// Spectral window: rectangular or hann
    #[clap(long, default_value = "rectangular", conflicts_with = "pipeline")]
    pub window: Window,

    /// Only report spectral bins around this frequency (Hz)
    #[clap(long, requires = "band_half_width_hz", conflicts_with = "pipeline")]
    pub band_center_hz: Option<f64>,

    /// Half width of the reported band (Hz)
    #[clap(long, requires = "band_center_hz", conflicts_with = "pipeline")]
    pub band_half_width_hz: Option<f64>,

    /// Print the final frame as JSON instead of a summary
    #[clap(long)]
    pub json: bool,
}

impl Args {
    /// Config file (or defaults) with the command line flags applied on top
    pub fn mismatch_config(&self) -> Result<MismatchConfig> {
        let mut config = match &self.config {
            Some(path) => MismatchConfig::from_json_file(path)?,
            None => MismatchConfig::default(),
        };

        if let Some(f_signal) = self.f_signal {
            config.f_signal = f_signal;
        }
        if let Some(nominal_rate) = self.nominal_rate {
            config.nominal_rate = nominal_rate;
        }
        if let Some(ppm_error) = self.ppm_error {
            config.ppm_error = ppm_error;
        }
        if let Some(duration) = self.duration {
            config.duration = duration;
        }
        if let Some(policy) = self.policy {
            config.policy = policy;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn spectrum_options(&self) -> SpectrumOptions {
        let band = match (self.band_center_hz, self.band_half_width_hz) {
            (Some(center_hz), Some(half_width_hz)) => Some(Band {
                center_hz,
                half_width_hz,
            }),
            _ => None,
        };
        SpectrumOptions {
            window: self.window,
            band,
            ..SpectrumOptions::default()
        }
    }
}
