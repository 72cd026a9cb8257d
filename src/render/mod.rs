//! Render projection: resolved points to per-layer visual attributes.

pub mod label;
pub mod projection;

pub use label::{EstimatedTextMeasurer, TextMeasurer, format_percent};
pub use projection::{
    CircleMark, RenderFrame, TextAnchor, TextMark, VerticalAnchor, bubble_radius, project,
};
