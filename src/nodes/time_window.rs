use crate::core::params::{ensure_known_keys, f64_param};
use crate::core::{channels, ProcessingStage, SignalFrame};
use crate::mismatch::leading_cycle_count;
use anyhow::{bail, Result};
use clockskew_macros::PipelineStage;
use serde_json::Value;
use std::sync::Arc;

/// Cuts the time-domain channels down to the first few tone periods.
///
/// Spectra computed after this stage see the shortened signals, so it
/// normally sits at the end of a chain.
#[derive(PipelineStage, Debug, Clone)]
#[stage_meta(
    name = "Time Window",
    category = "Analysis",
    reads = "t_nominal, reference, t_mismatch, mismatched, corrected",
    writes = "t_nominal, reference, t_mismatch, mismatched, corrected"
)]
pub struct TimeWindow {
    #[param(default = "1.5", min = 0.0)]
    pub cycles: f64,
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self { cycles: 1.5 }
    }
}

impl TimeWindow {
    pub fn new(cycles: f64) -> Self {
        Self { cycles }
    }
}

fn truncate(frame: &mut SignalFrame, name: &str, len: usize) {
    if let Some(samples) = frame.channels.get_mut(name) {
        if samples.len() > len {
            *samples = Arc::new(samples[..len].to_vec());
        }
    }
}

impl ProcessingStage for TimeWindow {
    fn on_create(&mut self, config: Value) -> Result<()> {
        ensure_known_keys(&config, &["cycles"])?;
        if let Some(cycles) = f64_param(&config, "cycles")? {
            if !cycles.is_finite() || cycles <= 0.0 {
                bail!("cycles must be positive, got {}", cycles);
            }
            self.cycles = cycles;
        }
        Ok(())
    }

    fn process(&mut self, mut input: SignalFrame) -> Result<SignalFrame> {
        let f_signal = input.meta_f64("f_signal")?;
        let count = leading_cycle_count(input.channel(channels::T_NOMINAL)?, f_signal, self.cycles)?;

        for name in [
            channels::T_NOMINAL,
            channels::REFERENCE,
            channels::T_MISMATCH,
            channels::MISMATCHED,
            channels::CORRECTED,
        ] {
            truncate(&mut input, name, count);
        }

        input.set_meta("window_cycles", self.cycles);
        input.set_meta("window_samples", count);
        Ok(input)
    }
}
