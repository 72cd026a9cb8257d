//! Data point type and related structures.
//!
//! A data point is one category of the host's dataset. Each point has:
//! - A stable ingestion index (legend slot)
//! - A selection key shared with the host
//! - Its measure value and host highlight flag
//! - Persisted overrides for color and angle
//! - Resolved color, angle and pixel position once the layout has run

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of a category.
///
/// Used both to request a click selection from the host and to correlate
/// persisted override objects with the category they belong to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionKey(pub String);

impl SelectionKey {
    /// Create a key from anything string-like.
    #[inline]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Borrow the raw key.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SelectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SelectionKey {
    #[inline]
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&str> for SelectionKey {
    #[inline]
    fn from(key: &str) -> Self {
        Self(key.to_owned())
    }
}

/// Values persisted by the host for one category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Overrides {
    /// Custom fill (hex or CSS named color).
    pub color: Option<String>,
    /// Custom ring angle in degrees.
    pub angle: Option<f64>,
}

impl Overrides {
    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.angle.is_none()
    }
}

/// An ingested category before layout.
///
/// This is the immutable base collection every layout projection reads from.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    /// 0-based position among the kept rows, in host order.
    pub index: usize,
    pub label: String,
    pub value: f64,
    pub highlighted: bool,
    pub key: SelectionKey,
    pub overrides: Overrides,
}

/// A fully resolved category, ready for projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPoint {
    pub index: usize,
    /// Position in descending-value order; 0 is the anchor.
    pub rank: usize,
    pub label: String,
    pub value: f64,
    /// Resolved fill, after alphabetical assignment and overrides.
    pub color: String,
    /// Degrees clockwise from "up"; 0 only for the anchor.
    pub angle: f64,
    /// Pixel coordinates for the current viewport.
    pub x: f64,
    pub y: f64,
    pub highlighted: bool,
    pub key: SelectionKey,
    pub overrides: Overrides,
}

impl DataPoint {
    /// Whether this point sits at the chart center.
    #[inline]
    pub fn is_anchor(&self) -> bool {
        self.rank == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_key_serializes_as_plain_string() {
        let key = SelectionKey::new("North");
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"North\"");
        let back: SelectionKey = serde_json::from_str("\"North\"").unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn test_overrides_accept_partial_objects() {
        let overrides: Overrides = serde_json::from_str(r##"{ "color": "#123456" }"##).unwrap();
        assert_eq!(overrides.color.as_deref(), Some("#123456"));
        assert_eq!(overrides.angle, None);
        assert!(!overrides.is_empty());
        assert!(Overrides::default().is_empty());
    }
}
