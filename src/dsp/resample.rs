use crate::core::error::{ensure_non_empty, PreconditionError, Result};
use rustfft::{num_complex::Complex, FftPlanner};

/// Change the sample count of `samples` to `target_len` in the frequency
/// domain.
///
/// The full spectrum keeps its lowest `min(len, target_len)` bins; an even
/// count folds (downsampling) or splits (upsampling) the Nyquist bin. The
/// inverse transform is scaled by `1 / len`, which preserves amplitude across
/// the change of length. Only the real part is returned.
///
/// The input is treated as one period of a periodic signal, and the output
/// assumes uniform spacing over the same span.
pub fn resample_fourier(samples: &[f64], target_len: usize) -> Result<Vec<f64>> {
    ensure_non_empty(samples, "fourier resampling")?;
    if target_len == 0 {
        return Err(PreconditionError::empty_input("fourier resampling target"));
    }

    let len = samples.len();
    if len == target_len {
        return Ok(samples.to_vec());
    }

    let mut planner = FftPlanner::<f64>::new();

    let mut spectrum: Vec<Complex<f64>> =
        samples.iter().map(|&s| Complex::new(s, 0.0)).collect();
    planner.plan_fft_forward(len).process(&mut spectrum);

    let kept = len.min(target_len);
    let nyq = kept / 2 + 1;
    let mut resized = vec![Complex::new(0.0, 0.0); target_len];

    // Non-negative frequencies, Nyquist included when present
    resized[..nyq].copy_from_slice(&spectrum[..nyq]);

    // Negative frequencies
    let negative = kept - nyq;
    if negative > 0 {
        resized[target_len - negative..].copy_from_slice(&spectrum[len - negative..]);
    }

    if kept % 2 == 0 {
        let half = kept / 2;
        if target_len < len {
            resized[half] += spectrum[len - half];
        } else {
            resized[half] *= 0.5;
            resized[target_len - half] = resized[half];
        }
    }

    planner.plan_fft_inverse(target_len).process(&mut resized);

    let scale = 1.0 / len as f64;
    Ok(resized.iter().map(|c| c.re * scale).collect())
}
