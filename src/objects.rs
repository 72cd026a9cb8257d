//! Property round-trip with the host's persisted-object store.
//!
//! When the host asks for the objects of a kind, the chart reports the
//! values it actually rendered. The host persists them and hands them back
//! in the next dataset, so user overrides survive re-rendering.

use std::collections::HashMap;

use serde::Serialize;
use strum::EnumString;

use crate::chart::{DataPoint, Overrides, SelectionKey};
use crate::settings::Settings;

/// Object kinds the host can enumerate.
#[derive(Debug, Clone, PartialEq, Eq, EnumString)]
pub enum ObjectKind {
    #[strum(serialize = "color", serialize = "colorSelector")]
    Color,
    #[strum(serialize = "angle", serialize = "angleSelector")]
    Angle,
    #[strum(serialize = "font")]
    Font,
    #[strum(serialize = "layout")]
    Layout,
    /// Anything else; enumerates to nothing.
    #[strum(default)]
    Unknown(String),
}

impl ObjectKind {
    /// Parse a host object name. Never fails: unknown names map to `Unknown`.
    pub fn parse(name: &str) -> Self {
        name.parse()
            .unwrap_or_else(|_| ObjectKind::Unknown(name.to_owned()))
    }

    /// Canonical object name reported back to the host.
    pub fn object_name(&self) -> &str {
        match self {
            ObjectKind::Color => "color",
            ObjectKind::Angle => "angle",
            ObjectKind::Font => "font",
            ObjectKind::Layout => "layout",
            ObjectKind::Unknown(name) => name.as_str(),
        }
    }
}

/// Wildcard matching mode for per-instance selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WildcardMatching {
    InstancesAndTotals,
}

/// Where the host should persist an enumerated value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Selector {
    /// One entry per category instance.
    Wildcard { matching: WildcardMatching },
    /// One entry for the given identity.
    Id { id: String },
    /// One entry for the whole visual.
    Visual,
}

/// Whether a property accepts rule-based values in the formatting pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum InstanceKind {
    Constant,
    ConstantOrRule,
}

/// Property payload of an enumerated object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ObjectProperties {
    Fill {
        fill: String,
    },
    Angle {
        angle: f64,
    },
    #[serde(rename_all = "camelCase")]
    Font {
        legend_font_scale: f64,
    },
    #[serde(rename_all = "camelCase")]
    Layout {
        margin_percent: f64,
        transform_compression_factor: f64,
        angle_offset_degrees: f64,
        min_bubble_radius_percent: f64,
    },
}

/// One persistable property tuple.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectInstance {
    pub object_name: String,
    pub display_name: String,
    pub properties: ObjectProperties,
    pub selector: Selector,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt_constant_value_selector: Option<SelectionKey>,
    pub property_instance_kind: InstanceKind,
}

/// Enumerate the objects of `kind` for the current render.
///
/// Per-category kinds follow `points` (descending-value order) and report
/// resolved values, not defaults. Unknown kinds yield an empty list.
///
/// The anchor's angle is reported as 0 like any other resolved angle. Once
/// persisted, that 0 is an ordinary override: if the category later drops
/// out of the anchor slot it is drawn on the ring at 0 degrees, next to the
/// new anchor's nominal 0.
pub fn enumerate(kind: &ObjectKind, points: &[DataPoint], settings: &Settings) -> Vec<ObjectInstance> {
    let object_name = kind.object_name().to_owned();

    match kind {
        ObjectKind::Color => points
            .iter()
            .map(|p| ObjectInstance {
                object_name: object_name.clone(),
                display_name: p.label.clone(),
                properties: ObjectProperties::Fill {
                    fill: p.color.clone(),
                },
                selector: Selector::Wildcard {
                    matching: WildcardMatching::InstancesAndTotals,
                },
                alt_constant_value_selector: Some(p.key.clone()),
                property_instance_kind: InstanceKind::ConstantOrRule,
            })
            .collect(),
        ObjectKind::Angle => points
            .iter()
            .map(|p| ObjectInstance {
                object_name: object_name.clone(),
                display_name: p.label.clone(),
                properties: ObjectProperties::Angle { angle: p.angle },
                selector: Selector::Id {
                    id: p.label.clone(),
                },
                alt_constant_value_selector: Some(p.key.clone()),
                property_instance_kind: InstanceKind::Constant,
            })
            .collect(),
        ObjectKind::Font => vec![ObjectInstance {
            object_name,
            display_name: "Font".to_owned(),
            properties: ObjectProperties::Font {
                legend_font_scale: settings.legend_font_scale,
            },
            selector: Selector::Visual,
            alt_constant_value_selector: None,
            property_instance_kind: InstanceKind::Constant,
        }],
        ObjectKind::Layout => vec![ObjectInstance {
            object_name,
            display_name: "Layout".to_owned(),
            properties: ObjectProperties::Layout {
                margin_percent: settings.margin_percent,
                transform_compression_factor: settings.transform_compression_factor,
                angle_offset_degrees: settings.angle_offset_degrees,
                min_bubble_radius_percent: settings.min_bubble_radius_percent,
            },
            selector: Selector::Visual,
            alt_constant_value_selector: None,
            property_instance_kind: InstanceKind::Constant,
        }],
        ObjectKind::Unknown(name) => {
            log::debug!("no objects for unknown kind {name:?}");
            Vec::new()
        }
    }
}

/// Persist enumerated per-category values the way the host does.
///
/// Colors are stored under the category's selection key, angles under the
/// selector id (the label). Visual-level kinds are ignored.
pub fn persist(instances: &[ObjectInstance], store: &mut HashMap<String, Overrides>) {
    for instance in instances {
        match (&instance.properties, &instance.selector) {
            (ObjectProperties::Fill { fill }, _) => {
                if let Some(key) = &instance.alt_constant_value_selector {
                    store.entry(key.0.clone()).or_default().color = Some(fill.clone());
                }
            }
            (ObjectProperties::Angle { angle }, Selector::Id { id }) => {
                store.entry(id.clone()).or_default().angle = Some(*angle);
            }
            _ => {}
        }
    }
}
