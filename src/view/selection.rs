//! Click-to-select state shared by every chart.
//!
//! Transitions are pure: each returns the next state and leaves the old one
//! untouched.

use serde::Serialize;

use crate::domain::TimeRange;

/// Toggle `clicked` against the current selection.
///
/// Clicking the selected element clears the selection; clicking anything
/// else replaces it.
pub fn toggle<T: PartialEq>(current: Option<T>, clicked: T) -> Option<T> {
    match current {
        Some(selected) if selected == clicked => None,
        _ => Some(clicked),
    }
}

/// Whether element `candidate` renders at full opacity.
pub fn is_highlighted<T: PartialEq>(selected: Option<&T>, candidate: &T) -> bool {
    selected.map_or(true, |s| s == candidate)
}

/// Time range toggle plus selected index for one forecast chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SelectionState {
    pub time_range: TimeRange,
    pub selected_index: Option<usize>,
}

impl SelectionState {
    pub fn new(time_range: TimeRange) -> Self {
        Self {
            time_range,
            selected_index: None,
        }
    }

    pub fn select(self, index: usize) -> Self {
        Self {
            selected_index: toggle(self.selected_index, index),
            ..self
        }
    }

    pub fn deselect(self) -> Self {
        Self {
            selected_index: None,
            ..self
        }
    }

    /// Switching range always drops the selection, even for the same range.
    pub fn switch_range(self, time_range: TimeRange) -> Self {
        Self {
            time_range,
            selected_index: None,
        }
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected_index == Some(index)
    }

    pub fn is_highlighted(&self, index: usize) -> bool {
        is_highlighted(self.selected_index.as_ref(), &index)
    }
}
