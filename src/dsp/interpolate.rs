use crate::core::error::{ensure_non_empty, PreconditionError, Result};

/// Piecewise-linear interpolation of `(xs, ys)` evaluated at `queries`.
///
/// `xs` must be strictly increasing. Queries before the first or after the
/// last support point are extrapolated along the nearest end segment; they
/// are never clamped.
pub fn interp_linear(xs: &[f64], ys: &[f64], queries: &[f64]) -> Result<Vec<f64>> {
    if xs.len() != ys.len() {
        return Err(PreconditionError::length_mismatch(
            "interpolation support",
            xs.len(),
            ys.len(),
        ));
    }
    if xs.len() < 2 {
        return Err(PreconditionError::InsufficientSupport {
            required: 2,
            available: xs.len(),
        });
    }
    ensure_non_empty(queries, "interpolation queries")?;

    let last_segment = xs.len() - 2;
    let values = queries
        .iter()
        .map(|&t| {
            // Index of the segment [xs[i], xs[i + 1]] used for t
            let i = xs
                .partition_point(|&x| x <= t)
                .saturating_sub(1)
                .min(last_segment);
            let frac = (t - xs[i]) / (xs[i + 1] - xs[i]);
            // Exact at both ends of the segment
            (1.0 - frac) * ys[i] + frac * ys[i + 1]
        })
        .collect();

    Ok(values)
}
