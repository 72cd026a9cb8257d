//! Error types for the chart pipeline.
//!
//! Errors never cross the WASM boundary from `update`: the surface logs them
//! and renders an empty frame instead.

use thiserror::Error;

/// Domain violation in the value transform.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// The compression factor must be finite and greater than 1.
    #[error("compression factor must be finite and > 1, got {0}")]
    InvalidFactor(f64),
    /// The value lies outside `[0, compression_factor)`.
    #[error("value {value} is outside the transform domain [0, {ceiling})")]
    OutOfDomain { value: f64, ceiling: f64 },
}

/// Invalid configuration field.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("marginPercent must be in [0, 100), got {0}")]
    Margin(f64),
    #[error("transformCompressionFactor must be > 1, got {0}")]
    CompressionFactor(f64),
    #[error("angleOffsetDegrees must be finite, got {0}")]
    AngleOffset(f64),
    #[error("legendFontScale must be finite and > 0, got {0}")]
    LegendFontScale(f64),
    #[error("minBubbleRadiusPercent must be in [0, 50], got {0}")]
    MinBubbleRadius(f64),
}

/// Failure of a render pass.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error("viewport must be finite and non-negative, got {width}x{height}")]
    InvalidViewport { width: f64, height: f64 },
    #[error("category {label:?} cannot be transformed: {source}")]
    Transform {
        label: String,
        #[source]
        source: TransformError,
    },
}
