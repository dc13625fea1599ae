use crate::core::error::{PreconditionError, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Relative slack used when `duration · rate` lands on an integer.
const COUNT_TOLERANCE: f64 = 1e-9;

/// Number of samples of a uniform grid over `[0, duration)`, as f64 so the
/// caller can bound it before allocating.
///
/// This is `ceil(duration · rate)`, except that a product within a relative
/// 1e-9 of a positive integer counts as that integer: 25 ns at 2 GS/s is 50
/// samples, not 51. Any positive product yields at least one sample.
pub fn sample_count(duration: f64, rate: f64) -> f64 {
    let exact = duration * rate;
    let nearest = exact.round();
    if nearest >= 1.0 && (exact - nearest).abs() <= COUNT_TOLERANCE * nearest {
        nearest
    } else {
        exact.ceil().max(0.0)
    }
}

/// Uniformly spaced sampling instants starting at t = 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeGrid {
    rate: f64,
    timestamps: Vec<f64>,
}

impl TimeGrid {
    /// Grid covering `[0, duration)` at `rate` samples per second.
    pub fn uniform(duration: f64, rate: f64) -> Result<Self> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(PreconditionError::invalid_config(
                "rate",
                format!("must be a positive finite rate, got {}", rate),
            ));
        }
        if !duration.is_finite() || duration <= 0.0 {
            return Err(PreconditionError::invalid_config(
                "duration",
                format!("must be a positive finite span, got {}", duration),
            ));
        }

        let len = sample_count(duration, rate) as usize;
        let timestamps = (0..len).map(|k| k as f64 / rate).collect();
        Ok(Self { rate, timestamps })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn spacing(&self) -> f64 {
        1.0 / self.rate
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }

    pub fn into_timestamps(self) -> Vec<f64> {
        self.timestamps
    }

    /// Evaluate sin(2π·f·t) at every instant of the grid
    pub fn sample_tone(&self, frequency: f64) -> Vec<f64> {
        self.timestamps
            .iter()
            .map(|&t| (2.0 * PI * frequency * t).sin())
            .collect()
    }
}
