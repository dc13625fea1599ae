//! Clock-mismatch simulation and correction for sampled tones.
//!
//! A tone is sampled once on a nominal clock and once on a clock that is off
//! by some parts per million; the mismatched capture is then reconstructed on
//! the nominal grid and compared against the reference in time and
//! frequency. The [`mismatch`] module holds the operations as plain
//! functions, while [`engine::Pipeline`] chains the same work as registered
//! stages configured from JSON.

pub mod args;
pub mod config;
pub mod core;
pub mod dsp;
pub mod engine;
pub mod mismatch;
pub mod nodes;
pub mod observability;
pub mod registry;

pub use config::{Band, MismatchConfig, ReconstructionPolicy, SpectrumOptions};
pub use core::PreconditionError;
pub use mismatch::{
    compare_spectra, generate, reconstruct, reconstruction_error, time_view, Capture,
    ErrorFigures, Reconstruction, SpectralComparison, TimeView, Trace,
};
