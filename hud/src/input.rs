//! Input model: pointer buttons, pointer events, and operator commands.
//!
//! A pointer event is a single screen-space point plus the button that was
//! pressed. The engine resolves it against the boxes drawn on the previous
//! tick; [`interpret`] turns the resolved hit into a selection change.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::Deserialize;

use crate::coords::Point;
use crate::detect::DetectionId;
use crate::hit::Hit;

/// Pressed pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Button {
    /// Selects the detection under the pointer.
    Primary,
    /// Clears the selection.
    Secondary,
    /// Any other button; ignored.
    Other,
}

/// A pointer press at a screen-space position.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PointerEvent {
    pub screen: Point,
    pub button: Button,
}

impl PointerEvent {
    #[must_use]
    pub fn new(screen: Point, button: Button) -> Self {
        Self { screen, button }
    }
}

/// Selection change requested by a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    /// Track this id.
    Select(DetectionId),
    /// Drop the current selection.
    Clear,
    /// Leave the selection as it is.
    Keep,
}

/// Map a pointer press to a selection change.
///
/// Primary selects the hit detection and keeps the selection on a miss;
/// secondary always clears; any other button does nothing.
#[must_use]
pub fn interpret(button: Button, hit: Option<Hit>) -> SelectionChange {
    match (button, hit) {
        (Button::Primary, Some(hit)) => SelectionChange::Select(hit.id),
        (Button::Secondary, _) => SelectionChange::Clear,
        (Button::Primary | Button::Other, _) => SelectionChange::Keep,
    }
}

/// Operator commands outside pointer selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Pause or resume the per-tick pipeline.
    TogglePause,
    /// Show or hide the zoom inset.
    ToggleInset,
}
