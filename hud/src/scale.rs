//! Responsive scale model.
//!
//! Every gauge is authored against a fixed reference layout and multiplied by a
//! single dimensionless [`ScaleFactor`]. The factor is cheap, so callers derive
//! it on every paint rather than caching it across resizes.

#[cfg(test)]
#[path = "scale_test.rs"]
mod scale_test;

use serde::Serialize;

use crate::consts::{REFERENCE_HEIGHT, REFERENCE_WIDTH, SCALE_EPSILON, STATUS_BAR_REFERENCE_WIDTH};
use crate::coords::{Size, epsilon_floor};

/// Strictly positive ratio of the current canvas to the reference layout.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct ScaleFactor(f64);

impl ScaleFactor {
    /// Wrap a raw factor, flooring it at [`SCALE_EPSILON`].
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self(epsilon_floor(value))
    }

    #[must_use]
    pub fn get(self) -> f64 {
        self.0
    }

    /// Scale a reference-layout length.
    #[must_use]
    pub fn px(self, reference_px: f64) -> f64 {
        reference_px * self.0
    }

    /// Scaled length with a lower bound, e.g. pen widths and font sizes.
    #[must_use]
    pub fn px_min(self, reference_px: f64, min: f64) -> f64 {
        (reference_px * self.0).max(min)
    }
}

impl Default for ScaleFactor {
    fn default() -> Self {
        Self(1.0)
    }
}

/// `min(canvas.w / reference.w, canvas.h / reference.h)`, optionally capped at 1.
///
/// Degenerate canvases (zero, negative, NaN) produce the epsilon floor instead
/// of dividing by zero.
#[must_use]
pub fn compute(canvas: Size, reference: Size, cap_at_one: bool) -> ScaleFactor {
    if canvas.is_degenerate() {
        return ScaleFactor(SCALE_EPSILON);
    }
    let reference = reference.guarded();
    let raw = (canvas.width / reference.width).min(canvas.height / reference.height);
    let raw = if cap_at_one { raw.min(1.0) } else { raw };
    ScaleFactor::new(raw)
}

/// Scale for the full-canvas overlay against the 1920×1080 reference.
#[must_use]
pub fn overlay(canvas: Size) -> ScaleFactor {
    compute(canvas, Size::new(REFERENCE_WIDTH, REFERENCE_HEIGHT), false)
}

/// Scale for the status bar: width-only against 1200 px, never above 1.
#[must_use]
pub fn status_bar(canvas_width: f64) -> ScaleFactor {
    compute(Size::new(canvas_width, f64::MAX), Size::new(STATUS_BAR_REFERENCE_WIDTH, 1.0), true)
}
