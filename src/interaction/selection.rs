//! Selection and highlight state machine.
//!
//! Opacity follows one of two rules:
//!
//! - **Highlight rule** (after every render): when any point carries the
//!   host's highlight flag, flagged points stay at 0.9 and the rest dim to
//!   0.2; with no flags every point is at 0.9.
//! - **Selection rule** (after a click is acknowledged): an empty selection
//!   puts every bubble back at 0.9; otherwise selected points go to 0.7 and
//!   the rest to 0.3.
//!
//! A click is a request/response pair. [`SelectionMachine::begin`] hands out
//! a ticket for the single pending slot, and the host's answer comes back
//! through [`SelectionMachine::resolve`]. Answers are applied in arrival
//! order, so if two clicks race the last one resolved wins.

use serde::Serialize;

use crate::chart::{DataPoint, SelectionKey};

/// Duration of the opacity transition after a click, in milliseconds.
pub const SELECTION_TRANSITION_MS: u32 = 1000;

/// Visual state of one bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BubbleState {
    /// No highlight context and no selection.
    Normal,
    /// Flagged by the host while some point is flagged.
    Highlighted,
    /// Not flagged while some other point is.
    Dimmed,
    /// Part of the acknowledged selection.
    Selected,
    /// Outside a non-empty acknowledged selection.
    OtherSelected,
}

impl BubbleState {
    /// Fill opacity for this state.
    pub fn opacity(self) -> f64 {
        match self {
            BubbleState::Normal | BubbleState::Highlighted => 0.9,
            BubbleState::Dimmed => 0.2,
            BubbleState::Selected => 0.7,
            BubbleState::OtherSelected => 0.3,
        }
    }
}

/// States under the highlight rule, parallel to `points`.
pub fn highlight_states(points: &[DataPoint]) -> Vec<BubbleState> {
    let any_highlighted = points.iter().any(|p| p.highlighted);
    points
        .iter()
        .map(|p| match (any_highlighted, p.highlighted) {
            (false, _) => BubbleState::Normal,
            (true, true) => BubbleState::Highlighted,
            (true, false) => BubbleState::Dimmed,
        })
        .collect()
}

/// States under the selection rule, parallel to `points`.
pub fn selection_states(points: &[DataPoint], selection: &[SelectionKey]) -> Vec<BubbleState> {
    points
        .iter()
        .map(|p| {
            if selection.is_empty() {
                BubbleState::Normal
            } else if selection.contains(&p.key) {
                BubbleState::Selected
            } else {
                BubbleState::OtherSelected
            }
        })
        .collect()
}

/// Easing of the opacity transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Easing {
    Linear,
}

/// How the host should animate an opacity update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    pub duration_ms: u32,
    pub easing: Easing,
}

impl Default for Transition {
    fn default() -> Self {
        Self {
            duration_ms: SELECTION_TRANSITION_MS,
            easing: Easing::Linear,
        }
    }
}

/// New opacity for one bubble.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BubbleOpacity {
    pub key: SelectionKey,
    pub fill_opacity: f64,
}

/// Opacity change for every bubble, applied with one transition.
///
/// Only opacity changes; position, color and angle are untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpacityUpdate {
    pub bubbles: Vec<BubbleOpacity>,
    pub transition: Transition,
}

/// Identifies one selection request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SelectionTicket(u64);

/// Pending request and acknowledged selection of one chart instance.
#[derive(Debug, Default)]
pub struct SelectionMachine {
    /// The latest request still waiting for the host.
    pending: Option<(SelectionTicket, SelectionKey)>,
    /// `None` until a click is acknowledged after the last render.
    acknowledged: Option<Vec<SelectionKey>>,
    next_ticket: u64,
}

impl SelectionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return to the highlight rule after a render.
    ///
    /// An in-flight request is kept; its answer still applies when it lands.
    pub fn reset_for_render(&mut self) {
        self.acknowledged = None;
    }

    /// Open a request for `key`, replacing any earlier pending one.
    pub fn begin(&mut self, key: SelectionKey) -> SelectionTicket {
        let ticket = SelectionTicket(self.next_ticket);
        self.next_ticket += 1;
        if let Some((previous, previous_key)) = self.pending.replace((ticket, key)) {
            log::debug!("selection {previous:?} for {previous_key} superseded by {ticket:?}");
        }
        ticket
    }

    /// Apply the host's answer and compute the new opacities.
    pub fn resolve(
        &mut self,
        ticket: SelectionTicket,
        selection: Vec<SelectionKey>,
        points: &[DataPoint],
    ) -> OpacityUpdate {
        if self.pending.as_ref().is_some_and(|(t, _)| *t == ticket) {
            self.pending = None;
        } else {
            log::debug!("applying out-of-order selection answer {ticket:?}");
        }
        self.acknowledged = Some(selection);
        self.opacity_update(points)
    }

    /// Drop a request the host failed to answer. Opacity is left as is.
    pub fn abandon(&mut self, ticket: SelectionTicket) {
        if self.pending.as_ref().is_some_and(|(t, _)| *t == ticket) {
            self.pending = None;
        }
    }

    /// Key of the request currently waiting for the host.
    pub fn pending_key(&self) -> Option<&SelectionKey> {
        self.pending.as_ref().map(|(_, key)| key)
    }

    /// The acknowledged selection, if a click resolved since the last render.
    pub fn acknowledged(&self) -> Option<&[SelectionKey]> {
        self.acknowledged.as_deref()
    }

    /// States of `points` under whichever rule is in force.
    pub fn states(&self, points: &[DataPoint]) -> Vec<BubbleState> {
        match &self.acknowledged {
            Some(selection) => selection_states(points, selection),
            None => highlight_states(points),
        }
    }

    /// Opacities of `points` under whichever rule is in force.
    pub fn opacities(&self, points: &[DataPoint]) -> Vec<f64> {
        self.states(points).into_iter().map(BubbleState::opacity).collect()
    }

    fn opacity_update(&self, points: &[DataPoint]) -> OpacityUpdate {
        let bubbles = points
            .iter()
            .zip(self.opacities(points))
            .map(|(p, fill_opacity)| BubbleOpacity {
                key: p.key.clone(),
                fill_opacity,
            })
            .collect();
        OpacityUpdate {
            bubbles,
            transition: Transition::default(),
        }
    }
}
