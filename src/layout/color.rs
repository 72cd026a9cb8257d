//! Deterministic palette assignment.
//!
//! Colors are handed out in alphabetical label order, never in value order,
//! so a category keeps its color when its rank changes between renders.

use std::str::FromStr;

use palette::Srgb;

use crate::chart::Category;

/// Default fill ring, assigned modulo its length.
pub const PALETTE: [&str; 10] = [
    "#fff100", "#ff8c00", "#e81123", "#ec008c", "#68217a", "#00188f", "#00bcf2", "#00b294",
    "#009e49", "#bad80a",
];

/// Whether `color` is a hex (`#rgb`, `#rrggbb`) or CSS named color.
pub fn is_valid_color(color: &str) -> bool {
    let color = color.trim();
    if color.starts_with('#') {
        return Srgb::<u8>::from_str(color).is_ok();
    }
    palette::named::from_str(&color.to_ascii_lowercase()).is_some()
}

/// Indices into `categories`, ordered by label (ordinal, case-sensitive).
///
/// Equal labels fall back to ingestion index.
pub fn rank_by_label(categories: &[Category]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..categories.len()).collect();
    order.sort_by(|&a, &b| {
        categories[a]
            .label
            .cmp(&categories[b].label)
            .then(categories[a].index.cmp(&categories[b].index))
    });
    order
}

/// Resolve the fill of every category, indexed like `categories`.
///
/// A valid persisted color override wins verbatim; otherwise the category
/// gets `palette[alphabetical position % palette.len()]`.
pub fn assign_colors(categories: &[Category], palette: &[&str]) -> Vec<String> {
    let mut colors = vec![String::new(); categories.len()];
    if palette.is_empty() {
        log::warn!("empty palette; categories without overrides stay unfilled");
    }

    for (position, idx) in rank_by_label(categories).into_iter().enumerate() {
        let category = &categories[idx];
        let default = || {
            palette
                .get(position % palette.len().max(1))
                .map(|c| (*c).to_owned())
                .unwrap_or_default()
        };
        colors[idx] = match category.overrides.color.as_deref() {
            Some(color) if is_valid_color(color) => color.to_owned(),
            Some(color) => {
                log::warn!(
                    "ignoring unparseable color override {color:?} for {:?}",
                    category.label
                );
                default()
            }
            None => default(),
        };
    }

    colors
}
