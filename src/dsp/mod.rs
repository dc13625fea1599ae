//! Numeric building blocks: uniform grids, reconstruction kernels and
//! magnitude spectra. Everything here is a pure function over slices.

pub mod grid;
pub mod interpolate;
pub mod resample;
pub mod spectrum;

pub use grid::TimeGrid;
pub use interpolate::interp_linear;
pub use resample::resample_fourier;
pub use spectrum::{magnitude_spectrum_db, Window};
