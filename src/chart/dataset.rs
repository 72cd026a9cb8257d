//! Host dataset shape and ingestion into the base category collection.
//!
//! The host sends a categorical dataset: one label column, one measure
//! column (with optional highlight flags), optional row identities and an
//! optional map of persisted objects keyed by selection key.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::point::{Category, Overrides, SelectionKey};

/// The measure column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MeasureColumn {
    /// One value per category row; `null` marks a missing value.
    pub values: Vec<Option<f64>>,
    /// Host-pushed emphasis flags, one per row when present.
    pub highlights: Option<Vec<bool>>,
}

/// A categorical dataset as supplied by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CategoricalDataset {
    /// Category labels in host order.
    pub categories: Vec<String>,
    /// `None` when the host has not bound a measure yet.
    pub measure: Option<MeasureColumn>,
    /// Opaque row identities; labels are used when absent.
    pub identities: Option<Vec<String>>,
    /// Persisted per-category objects keyed by selection key or label.
    pub objects: HashMap<String, Overrides>,
}

impl CategoricalDataset {
    /// Build a dataset from `(label, value)` pairs with no highlights,
    /// identities or objects.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        let (categories, values) = pairs
            .into_iter()
            .map(|(label, value)| (label.to_owned(), Some(value)))
            .unzip();
        Self {
            categories,
            measure: Some(MeasureColumn {
                values,
                highlights: None,
            }),
            ..Default::default()
        }
    }
}

/// Convert the host dataset into the immutable base collection.
///
/// Rows without a finite, non-negative value are dropped with a warning.
/// `index` is assigned over the kept rows so legend slots have no gaps.
/// Overrides are matched by selection key (then label) before any layout
/// step runs.
pub fn ingest(dataset: &CategoricalDataset) -> Vec<Category> {
    let Some(measure) = &dataset.measure else {
        log::debug!("dataset has no measure column; nothing to render");
        return Vec::new();
    };

    let mut seen: HashSet<SelectionKey> = HashSet::with_capacity(dataset.categories.len());
    let mut labels_seen: HashSet<&str> = HashSet::with_capacity(dataset.categories.len());
    let mut categories = Vec::with_capacity(dataset.categories.len());

    for (row, label) in dataset.categories.iter().enumerate() {
        let value = match measure.values.get(row).copied().flatten() {
            Some(v) if v.is_finite() && v >= 0.0 => v,
            Some(v) => {
                log::warn!("dropping category {label:?}: value {v} is not finite and non-negative");
                continue;
            }
            None => {
                log::warn!("dropping category {label:?}: no measure value");
                continue;
            }
        };

        let identity = dataset
            .identities
            .as_ref()
            .and_then(|ids| ids.get(row))
            .map(String::as_str);
        let key = selection_key_for(identity, label, row, &mut seen);

        let first_with_label = labels_seen.insert(label.as_str());
        let overrides = resolve_overrides(&dataset.objects, &key, label, first_with_label);

        let highlighted = measure
            .highlights
            .as_ref()
            .and_then(|flags| flags.get(row))
            .copied()
            .unwrap_or(false);

        categories.push(Category {
            index: categories.len(),
            label: label.clone(),
            value,
            highlighted,
            key,
            overrides,
        });
    }

    categories
}

/// Merge the objects persisted under the row's key and under its label.
///
/// Key-matched fields win. Label-matched fields only reach the first row
/// carrying that label.
fn resolve_overrides(
    objects: &HashMap<String, Overrides>,
    key: &SelectionKey,
    label: &str,
    first_with_label: bool,
) -> Overrides {
    let by_key = objects.get(key.as_str());
    let by_label = if first_with_label && key.as_str() != label {
        objects.get(label)
    } else {
        None
    };

    Overrides {
        color: by_key
            .and_then(|o| o.color.clone())
            .or_else(|| by_label.and_then(|o| o.color.clone())),
        angle: by_key
            .and_then(|o| o.angle)
            .or_else(|| by_label.and_then(|o| o.angle)),
    }
}

/// Pick a unique key: host identity, then label, then `label#row`.
///
/// The fallback grows by `#row` until it is unused.
fn selection_key_for(
    identity: Option<&str>,
    label: &str,
    row: usize,
    seen: &mut HashSet<SelectionKey>,
) -> SelectionKey {
    let candidates = identity
        .filter(|id| !id.is_empty())
        .map(SelectionKey::from)
        .into_iter()
        .chain(std::iter::once(SelectionKey::from(label)));

    for candidate in candidates {
        if seen.insert(candidate.clone()) {
            return candidate;
        }
    }

    let mut fallback = format!("{label}#{row}");
    while !seen.insert(SelectionKey::new(fallback.as_str())) {
        fallback.push_str(&format!("#{row}"));
    }
    SelectionKey::new(fallback)
}
