//! User and host interaction: highlight flags and click selection.

mod selection;

pub use selection::{
    BubbleOpacity, BubbleState, Easing, OpacityUpdate, SELECTION_TRANSITION_MS, SelectionMachine,
    SelectionTicket, Transition, highlight_states, selection_states,
};
