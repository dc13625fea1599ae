use crate::config::{Band, SpectrumOptions, DEFAULT_SPECTRAL_FLOOR};
use crate::core::params::{ensure_known_keys, f64_param, str_param};
use crate::core::{channels, ProcessingStage, SignalFrame};
use crate::dsp::Window;
use crate::mismatch::{compare_spectra, Trace};
use anyhow::{bail, Result};
use clockskew_macros::PipelineStage;
use serde_json::Value;

/// Magnitude spectra (dB) of the reference, mismatched and corrected
/// channels, optionally narrowed to a band.
#[derive(PipelineStage, Debug, Clone)]
#[stage_meta(
    name = "Spectrum Analyzer",
    category = "Analysis",
    reads = "reference, mismatched, corrected",
    writes = "freq_hz, reference_db, mismatched_db, corrected_db"
)]
pub struct SpectrumAnalyzer {
    #[param(default = "\"rectangular\"")]
    pub window: Window,

    #[param(default = "1e-12", min = 0.0)]
    pub floor: f64,

    #[param(default = "null")]
    pub band_center_hz: Option<f64>,

    #[param(default = "null", min = 0.0)]
    pub band_half_width_hz: Option<f64>,
}

impl Default for SpectrumAnalyzer {
    fn default() -> Self {
        Self {
            window: Window::Rectangular,
            floor: DEFAULT_SPECTRAL_FLOOR,
            band_center_hz: None,
            band_half_width_hz: None,
        }
    }
}

impl SpectrumAnalyzer {
    pub fn new(options: &SpectrumOptions) -> Self {
        Self {
            window: options.window,
            floor: options.floor,
            band_center_hz: options.band.map(|b| b.center_hz),
            band_half_width_hz: options.band.map(|b| b.half_width_hz),
        }
    }

    pub fn options(&self) -> Result<SpectrumOptions> {
        let band = match (self.band_center_hz, self.band_half_width_hz) {
            (Some(center_hz), Some(half_width_hz)) => Some(Band {
                center_hz,
                half_width_hz,
            }),
            (None, None) => None,
            _ => bail!("band_center_hz and band_half_width_hz must be given together"),
        };
        Ok(SpectrumOptions {
            window: self.window,
            floor: self.floor,
            band,
        })
    }
}

impl ProcessingStage for SpectrumAnalyzer {
    fn on_create(&mut self, config: Value) -> Result<()> {
        ensure_known_keys(
            &config,
            &["window", "floor", "band_center_hz", "band_half_width_hz"],
        )?;

        if let Some(window) = str_param(&config, "window")? {
            self.window = window.parse()?;
        }
        if let Some(floor) = f64_param(&config, "floor")? {
            if floor < 0.0 {
                bail!("floor must be non-negative, got {}", floor);
            }
            self.floor = floor;
        }
        if let Some(center) = f64_param(&config, "band_center_hz")? {
            self.band_center_hz = Some(center);
        }
        if let Some(half_width) = f64_param(&config, "band_half_width_hz")? {
            if half_width < 0.0 {
                bail!("band_half_width_hz must be non-negative, got {}", half_width);
            }
            self.band_half_width_hz = Some(half_width);
        }

        self.options().map(|_| ())
    }

    fn process(&mut self, mut input: SignalFrame) -> Result<SignalFrame> {
        let options = self.options()?;
        let nominal_rate = input.meta_f64("nominal_rate")?;

        let comparison = compare_spectra(
            input.channel(channels::REFERENCE)?,
            input.channel(channels::MISMATCHED)?,
            input.channel(channels::CORRECTED)?,
            nominal_rate,
            &options,
        )?;

        for (key, which) in [
            ("reference_peak_hz", Trace::Reference),
            ("mismatched_peak_hz", Trace::Mismatched),
            ("corrected_peak_hz", Trace::Corrected),
        ] {
            // A band with no bins leaves the peaks unset
            if let Some(peak) = comparison.peak_frequency_hz(which) {
                input.set_meta(key, peak);
            }
        }

        input.insert_channel(channels::FREQ_HZ, comparison.freqs_hz);
        input.insert_channel(channels::REFERENCE_DB, comparison.reference_db);
        input.insert_channel(channels::MISMATCHED_DB, comparison.mismatched_db);
        input.insert_channel(channels::CORRECTED_DB, comparison.corrected_db);
        Ok(input)
    }
}
