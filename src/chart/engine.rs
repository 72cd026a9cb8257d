//! ChartEngine - Core state of one chart instance.
//!
//! The engine owns the only state that outlives a render call: the last
//! resolved point collection (for enumeration and selection), the frame built
//! from it, the spatial index for hit testing and the selection slot. All of
//! it is replaced wholesale on every render.

use super::dataset::{CategoricalDataset, ingest};
use super::point::{Category, DataPoint, SelectionKey};
use crate::error::ChartError;
use crate::interaction::{BubbleState, OpacityUpdate, SelectionMachine, SelectionTicket};
use crate::layout::{PALETTE, RingGeometry, Viewport, assign_angles, assign_colors, rank_by_value};
use crate::objects::{ObjectInstance, ObjectKind, enumerate};
use crate::render::{EstimatedTextMeasurer, RenderFrame, TextMeasurer, project};
use crate::settings::Settings;
use crate::spatial::SpatialIndex;

/// Resolve colors, angles and positions for the base collection.
///
/// Returns the points in descending-value order together with the ring
/// geometry used to place them.
pub fn resolve_points(
    categories: &[Category],
    viewport: Viewport,
    settings: &Settings,
) -> Result<(Vec<DataPoint>, RingGeometry), ChartError> {
    let order = rank_by_value(categories);
    let angles = assign_angles(categories, &order, settings.angle_offset_degrees);
    let colors = assign_colors(categories, &PALETTE);

    let anchor = order.first().map(|&idx| &categories[idx]);
    let max_value = anchor.map_or(0.0, |c| c.value);
    let geometry = RingGeometry::new(
        viewport,
        settings.margin_percent,
        settings.transform_compression_factor,
        max_value,
    )
    .map_err(|source| ChartError::Transform {
        label: anchor.map(|c| c.label.clone()).unwrap_or_default(),
        source,
    })?;

    let points = order
        .iter()
        .zip(angles)
        .enumerate()
        .map(|(rank, (&idx, angle))| {
            let category = &categories[idx];
            let (x, y) = geometry.position(angle, rank == 0);
            DataPoint {
                index: category.index,
                rank,
                label: category.label.clone(),
                value: category.value,
                color: colors[idx].clone(),
                angle,
                x,
                y,
                highlighted: category.highlighted,
                key: category.key.clone(),
                overrides: category.overrides.clone(),
            }
        })
        .collect();

    Ok((points, geometry))
}

/// The core chart engine.
///
/// This struct manages:
/// - The current point collection, in descending-value order
/// - The frame last handed to the rendering surface
/// - Spatial index for hit testing
/// - The pending/acknowledged click selection
pub struct ChartEngine {
    points: Vec<DataPoint>,
    frame: RenderFrame,
    settings: Settings,
    viewport: Viewport,
    selection: SelectionMachine,
    spatial: SpatialIndex,
    measurer: Box<dyn TextMeasurer>,
}

impl ChartEngine {
    /// Create an engine with nothing rendered.
    pub fn new() -> Self {
        Self::with_measurer(Box::new(EstimatedTextMeasurer::default()))
    }

    /// Create an engine that measures value labels with `measurer`.
    pub fn with_measurer(measurer: Box<dyn TextMeasurer>) -> Self {
        Self {
            points: Vec::new(),
            frame: RenderFrame::default(),
            settings: Settings::default(),
            viewport: Viewport::default(),
            selection: SelectionMachine::new(),
            spatial: SpatialIndex::new(),
            measurer,
        }
    }

    /// Replace the text measurer used by subsequent renders.
    pub fn set_measurer(&mut self, measurer: Box<dyn TextMeasurer>) {
        self.measurer = measurer;
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Run a full render pass.
    ///
    /// Invalid settings fields fall back to their defaults. On error the
    /// engine is left empty, so nothing stale can be enumerated or selected.
    pub fn render(
        &mut self,
        dataset: &CategoricalDataset,
        viewport: Viewport,
        settings: Settings,
    ) -> Result<&RenderFrame, ChartError> {
        self.settings = settings.sanitized();
        self.viewport = viewport;
        self.selection.reset_for_render();

        match self.build(dataset) {
            Ok((points, frame)) => {
                log::debug!(
                    "rendered {} points into {}x{}",
                    points.len(),
                    viewport.width,
                    viewport.height
                );
                self.spatial
                    .rebuild(frame.bubbles.iter().map(|b| (b.cx, b.cy, b.r)));
                self.points = points;
                self.frame = frame;
                Ok(&self.frame)
            }
            Err(err) => {
                self.clear();
                Err(err)
            }
        }
    }

    fn build(&self, dataset: &CategoricalDataset) -> Result<(Vec<DataPoint>, RenderFrame), ChartError> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        let categories = ingest(dataset);
        let (points, geometry) = resolve_points(&categories, self.viewport, &self.settings)?;
        let opacities = self.selection.opacities(&points);
        let frame = project(
            &points,
            &opacities,
            &geometry,
            self.viewport,
            &self.settings,
            self.measurer.as_ref(),
        )?;
        Ok((points, frame))
    }

    /// Drop everything rendered so far.
    pub fn clear(&mut self) {
        self.points.clear();
        self.frame = RenderFrame::default();
        self.spatial.clear();
    }

    /// Points of the last render, in descending-value order.
    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    /// Frame of the last render, with opacity updates applied.
    pub fn frame(&self) -> &RenderFrame {
        &self.frame
    }

    /// Settings in effect for the last render.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Get the number of rendered points.
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    // =========================================================================
    // Interaction
    // =========================================================================

    /// Selection key of the topmost bubble under `(x, y)`.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&SelectionKey> {
        self.spatial
            .hit(x, y)
            .and_then(|slot| self.points.get(slot))
            .map(|p| &p.key)
    }

    /// Open a selection request for `key`.
    pub fn begin_selection(&mut self, key: SelectionKey) -> SelectionTicket {
        self.selection.begin(key)
    }

    /// Apply the host's answer to a selection request.
    ///
    /// Only bubble opacity changes; the returned update tells the host how
    /// to animate it.
    pub fn resolve_selection(
        &mut self,
        ticket: SelectionTicket,
        selection: Vec<SelectionKey>,
    ) -> OpacityUpdate {
        let update = self.selection.resolve(ticket, selection, &self.points);
        for (bubble, change) in self.frame.bubbles.iter_mut().zip(&update.bubbles) {
            bubble.fill_opacity = change.fill_opacity;
        }
        update
    }

    /// Forget a request the host failed to answer.
    pub fn abandon_selection(&mut self, ticket: SelectionTicket) {
        log::warn!("selection request {ticket:?} failed; opacity unchanged");
        self.selection.abandon(ticket);
    }

    /// Current visual state of every bubble.
    pub fn bubble_states(&self) -> Vec<BubbleState> {
        self.selection.states(&self.points)
    }

    // =========================================================================
    // Property round-trip
    // =========================================================================

    /// Enumerate persistable objects of `kind` for the last render.
    pub fn enumerate_objects(&self, kind: &ObjectKind) -> Vec<ObjectInstance> {
        enumerate(kind, &self.points, &self.settings)
    }
}

impl Default for ChartEngine {
    fn default() -> Self {
        Self::new()
    }
}
