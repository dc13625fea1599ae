use crate::core::params::{ensure_known_keys, str_param};
use crate::core::{ProcessingStage, SignalFrame};
use anyhow::Result;
use clockskew_macros::PipelineStage;
use serde_json::Value;
use tracing::info;

/// Per-channel statistics of a frame
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelStats {
    pub channel: String,
    pub len: usize,
    pub mean: f64,
    pub rms: f64,
}

impl ChannelStats {
    pub fn of(channel: &str, data: &[f64]) -> Self {
        let (mean, rms) = if data.is_empty() {
            (0.0, 0.0)
        } else {
            let n = data.len() as f64;
            let mean = data.iter().sum::<f64>() / n;
            let rms = (data.iter().map(|x| x * x).sum::<f64>() / n).sqrt();
            (mean, rms)
        };
        Self {
            channel: channel.to_string(),
            len: data.len(),
            mean,
            rms,
        }
    }

    /// Stats for every channel in the frame, ordered by channel name
    pub fn for_frame(frame: &SignalFrame) -> Vec<Self> {
        let mut stats: Vec<Self> = frame
            .channels
            .iter()
            .map(|(name, data)| Self::of(name, data))
            .collect();
        stats.sort_by(|a, b| a.channel.cmp(&b.channel));
        stats
    }
}

/// Logs a frame's channels and metadata, passing the frame through unchanged.
#[derive(PipelineStage, Debug, Clone)]
#[stage_meta(name = "Summary", category = "Sinks")]
pub struct Summary {
    #[param(default = "\"Summary\"")]
    pub label: String,
}

impl Default for Summary {
    fn default() -> Self {
        Self {
            label: "Summary".to_string(),
        }
    }
}

impl ProcessingStage for Summary {
    fn on_create(&mut self, config: Value) -> Result<()> {
        ensure_known_keys(&config, &["label"])?;
        if let Some(label) = str_param(&config, "label")? {
            self.label = label.to_string();
        }
        Ok(())
    }

    fn process(&mut self, input: SignalFrame) -> Result<SignalFrame> {
        info!(label = %self.label, run = input.sequence_id, "frame summary");

        for stats in ChannelStats::for_frame(&input) {
            info!(
                label = %self.label,
                channel = %stats.channel,
                len = stats.len,
                mean = stats.mean,
                rms = stats.rms,
                "channel"
            );
        }

        let mut metadata: Vec<_> = input.metadata.iter().collect();
        metadata.sort();
        for (key, value) in metadata {
            info!(label = %self.label, %key, %value, "metadata");
        }

        Ok(input)
    }
}
