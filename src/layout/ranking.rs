//! Value ranking and ring angle assignment.
//!
//! The highest-valued category becomes the anchor (angle 0, chart center).
//! The remaining `n - 1` categories share the ring evenly:
//!
//! ```text
//! share  = 360 / (n - 1)
//! angle  = 360 - share * i + offset     (i = 1..n-1 in descending-value order)
//! ```
//!
//! Default angles are normalized into `(0, 360]`, so only the anchor ever
//! reports 0. A computed 0 is reported as 360, which is the same direction.

use crate::chart::Category;

/// Full turn, in degrees.
const FULL_TURN: f64 = 360.0;

/// Indices into `categories`, ordered by descending value.
///
/// The sort is stable: equal values keep their ingestion order, so the first
/// encountered maximum becomes the anchor.
pub fn rank_by_value(categories: &[Category]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..categories.len()).collect();
    order.sort_by(|&a, &b| categories[b].value.total_cmp(&categories[a].value));
    order
}

/// Evenly spaced ring angle for the `position`-th non-anchor point.
///
/// # Arguments
///
/// * `position` - 1-based position in the descending-value tail
/// * `ring_size` - Number of non-anchor points (`n - 1`, at least 1)
/// * `offset` - Rotation applied to every default angle, in degrees
pub fn default_angle(position: usize, ring_size: usize, offset: f64) -> f64 {
    let share = FULL_TURN / ring_size as f64;
    let angle = (FULL_TURN - share * position as f64 + offset).rem_euclid(FULL_TURN);
    if angle == 0.0 { FULL_TURN } else { angle }
}

/// Final angle for each ranked category, parallel to `order`.
///
/// The anchor always gets 0. Ring points use their persisted angle override
/// verbatim when one is present and finite, else [`default_angle`].
pub fn assign_angles(categories: &[Category], order: &[usize], offset: f64) -> Vec<f64> {
    let ring_size = order.len().saturating_sub(1);

    order
        .iter()
        .enumerate()
        .map(|(position, &idx)| {
            if position == 0 {
                return 0.0;
            }
            let category = &categories[idx];
            match category.overrides.angle {
                Some(angle) if angle.is_finite() => angle,
                Some(angle) => {
                    log::warn!(
                        "ignoring non-finite angle override {angle} for {:?}",
                        category.label
                    );
                    default_angle(position, ring_size, offset)
                }
                None => default_angle(position, ring_size, offset),
            }
        })
        .collect()
}
