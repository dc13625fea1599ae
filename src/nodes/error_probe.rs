use crate::core::params::ensure_known_keys;
use crate::core::{channels, ProcessingStage, SignalFrame};
use crate::mismatch::reconstruction_error;
use anyhow::Result;
use clockskew_macros::PipelineStage;
use serde_json::Value;

/// Records how far the corrected signal strays from the reference.
#[derive(PipelineStage, Debug, Clone, Default)]
#[stage_meta(name = "Error Probe", category = "Analysis", reads = "reference, corrected")]
pub struct ErrorProbe;

impl ProcessingStage for ErrorProbe {
    fn on_create(&mut self, config: Value) -> Result<()> {
        ensure_known_keys(&config, &[])
    }

    fn process(&mut self, mut input: SignalFrame) -> Result<SignalFrame> {
        let figures = reconstruction_error(
            input.channel(channels::REFERENCE)?,
            input.channel(channels::CORRECTED)?,
        )?;

        input.set_meta("max_abs_error", figures.max_abs);
        input.set_meta("rms_error", figures.rms);
        Ok(input)
    }
}
