//! Spatial indexing for bubble hit testing.
//!
//! This module provides an R-tree based index over the bubble circles of the
//! current frame for point-in-bubble queries.

mod rtree;

pub use rtree::SpatialIndex;
