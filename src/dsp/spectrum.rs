use crate::core::error::{ensure_non_empty, Result};
use rustfft::{num_complex::Complex, FftPlanner};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::core::PreconditionError;

/// Taper applied before the transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Window {
    #[default]
    Rectangular,
    Hann,
}

impl Window {
    pub fn coefficients(&self, size: usize) -> Vec<f64> {
        match self {
            Self::Rectangular => vec![1.0; size],
            Self::Hann => create_hann_window(size),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Rectangular => "rectangular",
            Self::Hann => "hann",
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Window {
    type Err = PreconditionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rectangular" | "rect" | "none" => Ok(Self::Rectangular),
            "hann" | "hanning" => Ok(Self::Hann),
            other => Err(PreconditionError::invalid_config(
                "window",
                format!("'{}' is not one of rectangular, hann", other),
            )),
        }
    }
}

fn create_hann_window(size: usize) -> Vec<f64> {
    if size <= 1 {
        return vec![1.0; size];
    }
    (0..size)
        .map(|i| 0.5 * (1.0 - ((2.0 * PI * i as f64) / (size - 1) as f64).cos()))
        .collect()
}

/// Centre frequency of each positive-half bin of an `n` point transform.
pub fn frequency_bins(n: usize, rate: f64) -> Vec<f64> {
    (0..n / 2).map(|k| k as f64 * rate / n as f64).collect()
}

/// Positive-half magnitude spectrum in dB.
///
/// Each of the `n / 2` bins is `20·log10(|X[k]| / n + floor)`.
pub fn magnitude_spectrum_db(samples: &[f64], window: Window, floor: f64) -> Result<Vec<f64>> {
    ensure_non_empty(samples, "magnitude spectrum")?;

    let n = samples.len();
    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n);

    let mut buffer: Vec<Complex<f64>> = samples
        .iter()
        .zip(window.coefficients(n))
        .map(|(&s, w)| Complex::new(s * w, 0.0))
        .collect();
    fft.process(&mut buffer);

    let norm = n as f64;
    Ok(buffer
        .iter()
        .take(n / 2)
        .map(|bin| 20.0 * (bin.norm() / norm + floor).log10())
        .collect())
}

/// Index of the loudest bin, `None` for an empty spectrum
pub fn peak_bin(spectrum_db: &[f64]) -> Option<usize> {
    spectrum_db
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
}
