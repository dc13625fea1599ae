use crate::config::MismatchConfig;
use crate::core::params::{ensure_known_keys, f64_param, i32_param};
use crate::core::{channels, ProcessingStage, SignalFrame};
use crate::mismatch::generate;
use anyhow::Result;
use clockskew_macros::PipelineStage;
use serde_json::Value;
use tracing::debug;

/// Samples the tone on the nominal clock and on the ppm-shifted clock.
#[derive(PipelineStage, Debug, Clone)]
#[stage_meta(
    name = "Tone Generator",
    category = "Sources",
    writes = "t_nominal, reference, t_mismatch, mismatched"
)]
pub struct ToneGenerator {
    #[param(default = "200e6", min = 0.0)]
    pub f_signal: f64,

    #[param(default = "2e9")]
    pub nominal_rate: f64,

    #[param(default = "200")]
    pub ppm_error: i32,

    #[param(default = "25e-9")]
    pub duration: f64,
}

impl Default for ToneGenerator {
    fn default() -> Self {
        let config = MismatchConfig::default();
        Self {
            f_signal: config.f_signal,
            nominal_rate: config.nominal_rate,
            ppm_error: config.ppm_error,
            duration: config.duration,
        }
    }
}

impl ToneGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generator for a validated config
    pub fn from_config(config: &MismatchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            f_signal: config.f_signal,
            nominal_rate: config.nominal_rate,
            ppm_error: config.ppm_error,
            duration: config.duration,
        })
    }

    pub fn config(&self) -> MismatchConfig {
        MismatchConfig {
            f_signal: self.f_signal,
            nominal_rate: self.nominal_rate,
            ppm_error: self.ppm_error,
            duration: self.duration,
            ..MismatchConfig::default()
        }
    }
}

impl ProcessingStage for ToneGenerator {
    fn on_create(&mut self, config: Value) -> Result<()> {
        ensure_known_keys(&config, &["f_signal", "nominal_rate", "ppm_error", "duration"])?;

        let mut next = self.config();
        if let Some(freq) = f64_param(&config, "f_signal")? {
            next.f_signal = freq;
        }
        if let Some(rate) = f64_param(&config, "nominal_rate")? {
            next.nominal_rate = rate;
        }
        if let Some(ppm) = i32_param(&config, "ppm_error")? {
            next.ppm_error = ppm;
        }
        if let Some(duration) = f64_param(&config, "duration")? {
            next.duration = duration;
        }

        // Reject bad parameters when the pipeline is built, not when it runs
        *self = Self::from_config(&next)?;
        debug!(config = ?next, "tone generator configured");
        Ok(())
    }

    fn process(&mut self, mut input: SignalFrame) -> Result<SignalFrame> {
        let config = self.config();
        let capture = generate(&config)?;

        input.insert_channel(channels::T_NOMINAL, capture.nominal.into_timestamps());
        input.insert_channel(channels::REFERENCE, capture.reference);
        input.insert_channel(channels::T_MISMATCH, capture.mismatch.into_timestamps());
        input.insert_channel(channels::MISMATCHED, capture.mismatched);

        input.set_meta("f_signal", config.f_signal);
        input.set_meta("nominal_rate", config.nominal_rate);
        input.set_meta("actual_rate", config.actual_rate());
        input.set_meta("ppm_error", config.ppm_error);
        input.set_meta("duration", config.duration);
        Ok(input)
    }
}
