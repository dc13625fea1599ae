use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Well known channel names written by the built-in stages
pub mod channels {
    pub const T_NOMINAL: &str = "t_nominal";
    pub const REFERENCE: &str = "reference";
    pub const T_MISMATCH: &str = "t_mismatch";
    pub const MISMATCHED: &str = "mismatched";
    pub const CORRECTED: &str = "corrected";
    pub const FREQ_HZ: &str = "freq_hz";
    pub const REFERENCE_DB: &str = "reference_db";
    pub const MISMATCHED_DB: &str = "mismatched_db";
    pub const CORRECTED_DB: &str = "corrected_db";
}

/// Basic data unit passed between pipeline stages
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignalFrame {
    /// Sequential run number
    pub sequence_id: u64,

    /// Named numeric sequences (grids, signals, spectra)
    pub channels: HashMap<String, Arc<Vec<f64>>>,

    /// Side-channel scalars such as sample rates and error figures
    pub metadata: HashMap<String, String>,
}

impl SignalFrame {
    pub fn new(sequence_id: u64) -> Self {
        Self {
            sequence_id,
            channels: HashMap::new(),
            metadata: HashMap::new(),
        }
    }

    pub fn insert_channel(&mut self, name: impl Into<String>, samples: Vec<f64>) {
        self.channels.insert(name.into(), Arc::new(samples));
    }

    /// Borrow a channel, failing with the channel name when it is absent
    pub fn channel(&self, name: &str) -> Result<&[f64]> {
        self.channels
            .get(name)
            .map(|samples| samples.as_slice())
            .ok_or_else(|| anyhow!("Frame is missing channel '{}'", name))
    }

    pub fn set_meta(&mut self, key: impl Into<String>, value: impl ToString) {
        self.metadata.insert(key.into(), value.to_string());
    }

    /// Parse a metadata entry as f64
    pub fn meta_f64(&self, key: &str) -> Result<f64> {
        let raw = self
            .metadata
            .get(key)
            .ok_or_else(|| anyhow!("Frame is missing metadata '{}'", key))?;
        raw.parse::<f64>()
            .map_err(|e| anyhow!("Metadata '{}' is not a number ({}): {}", key, raw, e))
    }

    /// Total number of samples across every channel
    pub fn total_samples(&self) -> usize {
        self.channels.values().map(|c| c.len()).sum()
    }
}
