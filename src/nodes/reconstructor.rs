use crate::config::ReconstructionPolicy;
use crate::core::params::{ensure_known_keys, str_param};
use crate::core::{channels, ProcessingStage, SignalFrame};
use crate::mismatch::reconstruct_samples;
use anyhow::Result;
use clockskew_macros::PipelineStage;
use serde_json::Value;

/// Maps the mismatched capture back onto the nominal grid.
#[derive(PipelineStage, Debug, Clone, Default)]
#[stage_meta(
    name = "Reconstructor",
    category = "Correction",
    reads = "t_nominal, t_mismatch, mismatched",
    writes = "corrected"
)]
pub struct Reconstructor {
    #[param(default = "\"interpolate\"")]
    pub policy: ReconstructionPolicy,
}

impl Reconstructor {
    pub fn new(policy: ReconstructionPolicy) -> Self {
        Self { policy }
    }
}

impl ProcessingStage for Reconstructor {
    fn on_create(&mut self, config: Value) -> Result<()> {
        ensure_known_keys(&config, &["policy"])?;
        if let Some(name) = str_param(&config, "policy")? {
            self.policy = name.parse()?;
        }
        Ok(())
    }

    fn process(&mut self, mut input: SignalFrame) -> Result<SignalFrame> {
        let corrected = reconstruct_samples(
            input.channel(channels::T_NOMINAL)?,
            input.channel(channels::T_MISMATCH)?,
            input.channel(channels::MISMATCHED)?,
            self.policy,
        )?;

        input.insert_channel(channels::CORRECTED, corrected);
        input.set_meta("policy", self.policy);
        Ok(input)
    }
}
