//! Logarithmic value warp.
//!
//! `transform(v, c) = c * ln(1 + v / c)` is monotonically increasing and
//! concave, with slope 1 at the origin and `transform(v) <= v`. Small values
//! are kept nearly linear while large ones are compressed, so radius
//! differences stay legible. `c` is the compression factor: the smaller it
//! is, the harder large values are flattened.
//!
//! The formula itself stays finite for any `v >= 0`; the domain
//! `0 <= v < c` is a contract of the chart rather than a singularity.
//! Values at or above the ceiling are a caller error and are rejected, not
//! clamped.

use crate::error::TransformError;

/// Apply the warp, validating the domain.
pub fn transform(value: f64, compression_factor: f64) -> Result<f64, TransformError> {
    if !compression_factor.is_finite() || compression_factor <= 1.0 {
        return Err(TransformError::InvalidFactor(compression_factor));
    }
    if !value.is_finite() || value < 0.0 || value >= compression_factor {
        return Err(TransformError::OutOfDomain {
            value,
            ceiling: compression_factor,
        });
    }
    Ok(compression_factor * (value / compression_factor).ln_1p())
}
