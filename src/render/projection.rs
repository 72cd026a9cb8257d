//! Projection of resolved points onto the four visual layers.
//!
//! Every layer is rebuilt from scratch on each render: the frame is a plain
//! value, and the host replaces all bound elements with it.

use serde::Serialize;

use super::label::{TextMeasurer, format_percent};
use crate::chart::{DataPoint, SelectionKey};
use crate::error::{ChartError, TransformError};
use crate::layout::{RingGeometry, Viewport, transform};
use crate::settings::Settings;

/// Label color on top of bubbles and next to swatches.
pub const LABEL_FILL: &str = "white";

/// Left edge of the legend strip, as a share of the width.
const LEGEND_START: f64 = 0.05;
/// Widest legend slot, as a share of the width.
const LEGEND_MAX_SLOT: f64 = 9.0 / 40.0;
/// Usable legend strip, as a share of the width.
const LEGEND_SPAN: f64 = 0.9;
/// Swatch row, as a share of the height.
const LEGEND_SWATCH_ROW: f64 = 0.95;
/// Legend label baseline, as a share of the height.
const LEGEND_LABEL_ROW: f64 = 0.96;
/// Swatch radius, as a share of the width.
const LEGEND_SWATCH_RADIUS: f64 = 0.01;
/// Gap between a swatch center and its label, as a share of the width.
const LEGEND_LABEL_GAP: f64 = 0.02;
/// Bubble radius to value label font size.
const VALUE_FONT_DIVISOR: f64 = 2.2;
/// Share of the measured text height used to recenter value labels.
const VALUE_BASELINE_CORRECTION: f64 = 1.0 / 12.0;

/// Horizontal text anchoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    Center,
}

/// Vertical text anchoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAnchor {
    Baseline,
    Center,
}

/// A filled circle: bubbles and legend swatches.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleMark {
    pub key: SelectionKey,
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub fill: String,
    pub fill_opacity: f64,
}

/// A text element: legend labels and value labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextMark {
    pub key: SelectionKey,
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub font_size: f64,
    pub fill: String,
    pub fill_opacity: f64,
    pub text_anchor: TextAnchor,
    pub vertical_anchor: VerticalAnchor,
}

/// All visual layers of one render pass, each in descending-value order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderFrame {
    pub bubbles: Vec<CircleMark>,
    pub legend_swatches: Vec<CircleMark>,
    pub legend_labels: Vec<TextMark>,
    pub value_labels: Vec<TextMark>,
}

impl RenderFrame {
    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }
}

/// Radius of a bubble, from the point's own value.
pub fn bubble_radius(
    value: f64,
    geometry: &RingGeometry,
    viewport: Viewport,
    settings: &Settings,
) -> Result<f64, TransformError> {
    let radius = transform(value, settings.transform_compression_factor)? * geometry.scale_radius / 2.0;
    let floor = viewport.height * settings.min_bubble_radius_percent / 100.0;
    Ok(radius.max(floor))
}

/// Build every layer for `points`.
///
/// # Arguments
///
/// * `points` - Resolved points in descending-value order
/// * `opacities` - Fill opacity per point, parallel to `points`
/// * `geometry` - Ring geometry of this pass
/// * `viewport` - Drawing area
/// * `settings` - Sanitized configuration
/// * `measurer` - Text height source for value label centering
pub fn project(
    points: &[DataPoint],
    opacities: &[f64],
    geometry: &RingGeometry,
    viewport: Viewport,
    settings: &Settings,
    measurer: &dyn TextMeasurer,
) -> Result<RenderFrame, ChartError> {
    let mut frame = RenderFrame {
        bubbles: Vec::with_capacity(points.len()),
        legend_swatches: Vec::with_capacity(points.len()),
        legend_labels: Vec::with_capacity(points.len()),
        value_labels: Vec::with_capacity(points.len()),
    };
    if points.is_empty() {
        return Ok(frame);
    }

    let width = viewport.width;
    let height = viewport.height;
    let slot = width * LEGEND_MAX_SLOT.min(LEGEND_SPAN / points.len() as f64);
    let legend_font = width / 1000.0 * settings.legend_font_scale;

    for (point, &opacity) in points.iter().zip(opacities) {
        let r = bubble_radius(point.value, geometry, viewport, settings).map_err(|source| {
            ChartError::Transform {
                label: point.label.clone(),
                source,
            }
        })?;

        frame.bubbles.push(CircleMark {
            key: point.key.clone(),
            cx: point.x,
            cy: point.y,
            r,
            fill: point.color.clone(),
            fill_opacity: opacity,
        });

        let text = format_percent(point.value);
        let font_size = r / VALUE_FONT_DIVISOR;
        let correction = measurer.text_height(&text, font_size) * VALUE_BASELINE_CORRECTION;
        frame.value_labels.push(TextMark {
            key: point.key.clone(),
            x: point.x,
            y: point.y - correction,
            text,
            font_size,
            fill: LABEL_FILL.to_owned(),
            fill_opacity: opacity,
            text_anchor: TextAnchor::Center,
            vertical_anchor: VerticalAnchor::Center,
        });

        let slot_x = slot * point.index as f64;
        frame.legend_swatches.push(CircleMark {
            key: point.key.clone(),
            cx: slot_x + width * LEGEND_START,
            cy: height * LEGEND_SWATCH_ROW,
            r: width * LEGEND_SWATCH_RADIUS,
            fill: point.color.clone(),
            fill_opacity: opacity,
        });
        frame.legend_labels.push(TextMark {
            key: point.key.clone(),
            x: slot_x + width * (LEGEND_START + LEGEND_LABEL_GAP),
            y: height * LEGEND_LABEL_ROW,
            text: point.label.clone(),
            font_size: legend_font,
            fill: LABEL_FILL.to_owned(),
            fill_opacity: opacity,
            text_anchor: TextAnchor::Start,
            vertical_anchor: VerticalAnchor::Baseline,
        });
    }

    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::EstimatedTextMeasurer;

    const EPS: f64 = 1e-9;

    fn point(index: usize, rank: usize, label: &str, value: f64, x: f64, y: f64) -> DataPoint {
        DataPoint {
            index,
            rank,
            label: label.to_owned(),
            value,
            color: "#ff8c00".to_owned(),
            angle: 0.0,
            x,
            y,
            highlighted: false,
            key: SelectionKey::from(label),
            overrides: Default::default(),
        }
    }

    fn setup() -> (Viewport, Settings, RingGeometry) {
        let viewport = Viewport::new(1000.0, 500.0);
        let settings = Settings::default();
        let geometry = RingGeometry::new(viewport, 10.0, 2.0, 0.5).unwrap();
        (viewport, settings, geometry)
    }

    #[test]
    fn test_empty_points_give_empty_frame() {
        let (viewport, settings, geometry) = setup();
        let frame = project(
            &[],
            &[],
            &geometry,
            viewport,
            &settings,
            &EstimatedTextMeasurer::default(),
        )
        .unwrap();
        assert!(frame.is_empty());
        assert_eq!(frame, RenderFrame::default());
    }

    #[test]
    fn test_bubble_radius_uses_own_value() {
        let (viewport, settings, geometry) = setup();
        let points = [
            point(0, 0, "A", 0.5, 500.0, 250.0),
            point(1, 1, "B", 0.1, 600.0, 250.0),
        ];
        let frame = project(
            &points,
            &[0.9, 0.9],
            &geometry,
            viewport,
            &settings,
            &EstimatedTextMeasurer::default(),
        )
        .unwrap();

        let expected_a = transform(0.5, 2.0).unwrap() * geometry.scale_radius / 2.0;
        let expected_b = transform(0.1, 2.0).unwrap() * geometry.scale_radius / 2.0;
        assert!((frame.bubbles[0].r - expected_a).abs() < EPS);
        assert!((frame.bubbles[1].r - expected_b).abs() < EPS);
        // the anchor's bubble reaches exactly the ring
        assert!((frame.bubbles[0].r - geometry.ring_length).abs() < EPS);
    }

    #[test]
    fn test_out_of_domain_value_names_category() {
        let (viewport, settings, geometry) = setup();
        let points = [point(0, 0, "Huge", 5.0, 500.0, 250.0)];
        let err = project(
            &points,
            &[0.9],
            &geometry,
            viewport,
            &settings,
            &EstimatedTextMeasurer::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ChartError::Transform { ref label, .. } if label == "Huge"));
    }

    #[test]
    fn test_min_radius_floor() {
        let (viewport, mut settings, geometry) = setup();
        settings.min_bubble_radius_percent = 5.0;
        let r = bubble_radius(0.0, &geometry, viewport, &settings).unwrap();
        assert!((r - 25.0).abs() < EPS);
    }

    #[test]
    fn test_value_label_text_and_centering() {
        let (viewport, settings, geometry) = setup();
        let points = [point(0, 0, "A", 0.25, 500.0, 250.0)];
        let frame = project(
            &points,
            &[0.9],
            &geometry,
            viewport,
            &settings,
            &EstimatedTextMeasurer::default(),
        )
        .unwrap();

        let label = &frame.value_labels[0];
        let r = frame.bubbles[0].r;
        assert_eq!(label.text, "25%");
        assert!((label.font_size - r / 2.2).abs() < EPS);
        let correction = label.font_size * 1.2 / 12.0;
        assert!((label.y - (250.0 - correction)).abs() < EPS);
        assert_eq!(label.text_anchor, TextAnchor::Center);
        assert_eq!(label.vertical_anchor, VerticalAnchor::Center);
        assert_eq!(label.fill, LABEL_FILL);
    }

    #[test]
    fn test_legend_slots_follow_ingestion_index() {
        let (viewport, settings, geometry) = setup();
        // rank order differs from ingestion order
        let points = [
            point(2, 0, "C", 0.5, 500.0, 250.0),
            point(0, 1, "A", 0.3, 400.0, 250.0),
            point(1, 2, "B", 0.2, 600.0, 250.0),
        ];
        let frame = project(
            &points,
            &[0.9, 0.2, 0.2],
            &geometry,
            viewport,
            &settings,
            &EstimatedTextMeasurer::default(),
        )
        .unwrap();

        let slot = 1000.0 * 0.225_f64.min(0.3);
        assert!((frame.legend_swatches[0].cx - (2.0 * slot + 50.0)).abs() < EPS);
        assert!((frame.legend_swatches[1].cx - 50.0).abs() < EPS);
        assert!((frame.legend_labels[2].x - (slot + 70.0)).abs() < EPS);
        assert!((frame.legend_swatches[0].cy - 475.0).abs() < EPS);
        assert!((frame.legend_swatches[0].r - 10.0).abs() < EPS);
        assert!((frame.legend_labels[0].font_size - 12.0).abs() < EPS);
        assert_eq!(frame.legend_labels[1].text, "A");
        assert_eq!(frame.legend_labels[1].fill_opacity, 0.2);
    }

    #[test]
    fn test_legend_strip_shrinks_for_many_points() {
        let (viewport, settings, geometry) = setup();
        let points: Vec<DataPoint> = (0..10)
            .map(|i| point(i, i, &format!("P{i}"), 0.05, 500.0, 250.0))
            .collect();
        let frame = project(
            &points,
            &[0.9; 10],
            &geometry,
            viewport,
            &settings,
            &EstimatedTextMeasurer::default(),
        )
        .unwrap();
        let last = frame.legend_swatches.last().unwrap();
        assert!(last.cx < 1000.0);
    }

    #[test]
    fn test_frame_serializes_camel_case() {
        let (viewport, settings, geometry) = setup();
        let points = [point(0, 0, "A", 0.5, 500.0, 250.0)];
        let frame = project(
            &points,
            &[0.9],
            &geometry,
            viewport,
            &settings,
            &EstimatedTextMeasurer::default(),
        )
        .unwrap();
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["bubbles"][0]["fillOpacity"], 0.9);
        assert_eq!(json["valueLabels"][0]["textAnchor"], "center");
        assert_eq!(json["legendLabels"][0]["verticalAnchor"], "baseline");
        assert_eq!(json["legendSwatches"][0]["key"], "A");
    }
}
