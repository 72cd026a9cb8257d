//! Chart data model and engine.
//!
//! This module provides:
//! - The host dataset shape and its ingestion into categories
//! - Resolved data points carrying layout and selection state
//! - The engine tying layout, rendering and interaction together

mod dataset;
mod engine;
mod point;

pub use dataset::{CategoricalDataset, MeasureColumn, ingest};
pub use engine::{ChartEngine, resolve_points};
pub use point::{Category, DataPoint, Overrides, SelectionKey};
