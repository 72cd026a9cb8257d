//! Polar to screen conversion.
//!
//! Every ring point sits at the same distance from the center. That distance
//! is derived from the anchor's value, not the point's own: distance carries
//! the anchor's scale, while each point's own magnitude is carried by its
//! bubble radius (see `render::projection`).
//!
//! Angles follow the host's clock-face convention rather than the
//! trigonometric one: `x = cx + L sin(a)`, `y = cy + L cos(a)`.

use serde::{Deserialize, Serialize};

use super::transform::transform;
use crate::error::TransformError;

/// Drawing area in layout units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Finite and non-negative in both dimensions.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 0.0 && self.height >= 0.0
    }

    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}

/// Shared geometry of one render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingGeometry {
    /// Viewport center; the anchor's position.
    pub center: (f64, f64),
    /// Pixels per transformed value unit.
    pub scale_radius: f64,
    /// Distance of every ring point from the center.
    pub ring_length: f64,
}

impl RingGeometry {
    /// Compute the ring for a render pass.
    ///
    /// # Arguments
    ///
    /// * `viewport` - Drawing area
    /// * `margin_percent` - Share of the height kept free, in percent
    /// * `compression_factor` - Value transform ceiling
    /// * `max_value` - Largest raw value, which is also the anchor's value
    pub fn new(
        viewport: Viewport,
        margin_percent: f64,
        compression_factor: f64,
        max_value: f64,
    ) -> Result<Self, TransformError> {
        let scale_radius = if max_value > 0.0 {
            viewport.height * (1.0 - margin_percent / 100.0) / max_value
        } else {
            0.0
        };
        let ring_length = transform(max_value, compression_factor)? * scale_radius / 2.0;

        Ok(Self {
            center: viewport.center(),
            scale_radius,
            ring_length,
        })
    }

    /// Screen position of a point.
    ///
    /// The anchor is pinned to the center regardless of its angle.
    pub fn position(&self, angle_degrees: f64, is_anchor: bool) -> (f64, f64) {
        let (cx, cy) = self.center;
        if is_anchor {
            return (cx, cy);
        }
        let radians = angle_degrees.to_radians();
        (
            cx + self.ring_length * radians.sin(),
            cy + self.ring_length * radians.cos(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_scale_radius_uses_margin_and_max() {
        let geometry = RingGeometry::new(Viewport::new(800.0, 600.0), 10.0, 2.0, 0.5).unwrap();
        assert!((geometry.scale_radius - 1080.0).abs() < EPS);
        let expected = transform(0.5, 2.0).unwrap() * 1080.0 / 2.0;
        assert!((geometry.ring_length - expected).abs() < EPS);
        assert_eq!(geometry.center, (400.0, 300.0));
    }

    #[test]
    fn test_anchor_pinned_to_center() {
        let geometry = RingGeometry::new(Viewport::new(200.0, 100.0), 0.0, 2.0, 1.0).unwrap();
        assert_eq!(geometry.position(137.0, true), (100.0, 50.0));
    }

    #[test]
    fn test_clock_face_directions() {
        let geometry = RingGeometry {
            center: (100.0, 100.0),
            scale_radius: 1.0,
            ring_length: 10.0,
        };
        let (x, y) = geometry.position(90.0, false);
        assert!((x - 110.0).abs() < EPS && (y - 100.0).abs() < EPS);
        let (x, y) = geometry.position(180.0, false);
        assert!((x - 100.0).abs() < EPS && (y - 90.0).abs() < EPS);
        let (x, y) = geometry.position(360.0, false);
        assert!((x - 100.0).abs() < EPS && (y - 110.0).abs() < EPS);
    }

    #[test]
    fn test_all_zero_values_collapse_to_center() {
        let geometry = RingGeometry::new(Viewport::new(100.0, 100.0), 10.0, 2.0, 0.0).unwrap();
        assert_eq!(geometry.scale_radius, 0.0);
        assert_eq!(geometry.position(45.0, false), (50.0, 50.0));
    }

    #[test]
    fn test_anchor_beyond_ceiling_is_rejected() {
        assert!(RingGeometry::new(Viewport::new(100.0, 100.0), 10.0, 2.0, 3.0).is_err());
    }

    #[test]
    fn test_viewport_validity() {
        assert!(Viewport::new(0.0, 0.0).is_valid());
        assert!(!Viewport::new(-1.0, 10.0).is_valid());
        assert!(!Viewport::new(f64::INFINITY, 10.0).is_valid());
    }
}
