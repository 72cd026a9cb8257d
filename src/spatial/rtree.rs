//! R-tree based spatial index using the rstar crate.
//!
//! Stores one circle per bubble and answers point-in-bubble queries, so a
//! host can turn a raw pointer position into a selection key.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

/// A bubble circle in the spatial index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BubbleCircle {
    /// Position in the bubble layer; later entries are drawn on top.
    pub slot: usize,
    /// Center X coordinate.
    pub x: f64,
    /// Center Y coordinate.
    pub y: f64,
    /// Radius.
    pub r: f64,
}

impl BubbleCircle {
    /// Create a new BubbleCircle.
    pub fn new(slot: usize, x: f64, y: f64, r: f64) -> Self {
        Self { slot, x, y, r }
    }
}

impl RTreeObject for BubbleCircle {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.x - self.r, self.y - self.r], [self.x + self.r, self.y + self.r])
    }
}

impl PointDistance for BubbleCircle {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.x - point[0];
        let dy = self.y - point[1];
        let edge = ((dx * dx + dy * dy).sqrt() - self.r).max(0.0);
        edge * edge
    }

    fn contains_point(&self, point: &[f64; 2]) -> bool {
        let dx = self.x - point[0];
        let dy = self.y - point[1];
        dx * dx + dy * dy <= self.r * self.r
    }
}

/// Spatial index over the bubbles of the current frame.
pub struct SpatialIndex {
    tree: RTree<BubbleCircle>,
}

impl SpatialIndex {
    /// Create a new empty spatial index.
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Topmost bubble containing the point.
    pub fn hit(&self, x: f64, y: f64) -> Option<usize> {
        self.tree
            .locate_all_at_point(&[x, y])
            .map(|circle| circle.slot)
            .max()
    }

    /// Rebuild the index from a list of (x, y, r) circles in draw order.
    pub fn rebuild(&mut self, circles: impl IntoIterator<Item = (f64, f64, f64)>) {
        let circles: Vec<_> = circles
            .into_iter()
            .enumerate()
            .filter(|(_, (x, y, r))| x.is_finite() && y.is_finite() && r.is_finite())
            .map(|(slot, (x, y, r))| BubbleCircle::new(slot, x, y, r.max(0.0)))
            .collect();

        self.tree = RTree::bulk_load(circles);
    }

    /// Clear all bubbles from the index.
    pub fn clear(&mut self) {
        self.tree = RTree::new();
    }

    /// Get the number of bubbles in the index.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}
