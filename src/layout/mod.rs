//! Layout algorithms for the radial bubble chart.
//!
//! Each step is a pure projection over the immutable base collection:
//! ranking by value gives angles, ranking by label gives colors, and the
//! ring geometry turns angles into screen positions.

pub mod color;
pub mod position;
pub mod ranking;
pub mod transform;

pub use color::{PALETTE, assign_colors, is_valid_color};
pub use position::{RingGeometry, Viewport};
pub use ranking::{assign_angles, rank_by_value};
pub use transform::transform;
