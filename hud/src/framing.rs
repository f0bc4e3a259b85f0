//! Auto-framing controller: turns the selected target's bounding box into
//! camera-like control signals and the re-centering offset.
//!
//! DESIGN
//! ======
//! The controller owns the only mutable HUD state ([`HudState`]). Every
//! per-frame derivation is a pure function of the box and frame size; `update`
//! computes the next state into a local and commits it in one assignment, so a
//! reader never sees a mix of old and new fields.
//!
//! Two zoom rules exist. The area rule sets zoom from the box area against a
//! saturation constant; the ratio rule then sets zoom and focus from the
//! box/frame area ratio. The ratio rule runs last and is authoritative.
//!
//! ERROR HANDLING
//! ==============
//! Nothing here fails. Degenerate frames are floored at an epsilon, stale
//! selections behave as "no target", and out-of-range mutator inputs are
//! clamped (pitch, zoom, focus) or wrapped (heading). Non-finite inputs are
//! ignored and the last value is held.

#[cfg(test)]
#[path = "framing_test.rs"]
mod framing_test;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{INSET_CROP_PAD, MAX_AREA_RATIO, MIN_AREA_RATIO, NEUTRAL_LEVEL, ZOOM_SATURATION_AREA};
use crate::coords::{Point, Rect, Size};
use crate::detect::{self, BoundingBox, Detection, DetectionId};

// =============================================================================
// STATE
// =============================================================================

/// Snapshot of the four values that drive every gauge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HudState {
    /// Compass heading in `[0, 360)`.
    pub heading_deg: f64,
    /// Pitch in `[-90, 90]`; positive looks up.
    pub pitch_deg: f64,
    /// Zoom level in `[0, 1]`.
    pub zoom_level: f64,
    /// Focus level in `[0, 1]`.
    pub focus_level: f64,
}

impl Default for HudState {
    fn default() -> Self {
        Self { heading_deg: 0.0, pitch_deg: 0.0, zoom_level: NEUTRAL_LEVEL, focus_level: NEUTRAL_LEVEL }
    }
}

/// Translation applied to the frame buffer so the target sits at frame center.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offset {
    pub dx: f64,
    pub dy: f64,
}

impl Offset {
    pub const ZERO: Self = Self { dx: 0.0, dy: 0.0 };

    #[must_use]
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    #[must_use]
    pub fn apply(self, p: Point) -> Point {
        p.offset(self.dx, self.dy)
    }

    #[must_use]
    pub fn apply_rect(self, r: Rect) -> Rect {
        r.translate(self.dx, self.dy)
    }
}

/// Tunable calibration for the zoom/focus derivations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FramingConfig {
    /// Box area (px²) at which the area rule saturates to 1.
    pub zoom_saturation_area: f64,
    /// Ratio at or below which zoom and focus are 0.
    pub min_area_ratio: f64,
    /// Ratio at or above which zoom and focus are 1.
    pub max_area_ratio: f64,
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            zoom_saturation_area: ZOOM_SATURATION_AREA,
            min_area_ratio: MIN_AREA_RATIO,
            max_area_ratio: MAX_AREA_RATIO,
        }
    }
}

/// Result of one [`AutoFramingController::update`] call.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FramingUpdate {
    /// Re-centering offset for this frame; zero when there is no target.
    pub offset: Offset,
    /// Id of the target that drove this update, if any.
    pub target: Option<DetectionId>,
}

// =============================================================================
// PURE DERIVATIONS
// =============================================================================

/// Wrap any finite angle into `[0, 360)`. Non-finite input maps to 0.
#[must_use]
pub fn normalize_heading(deg: f64) -> f64 {
    if !deg.is_finite() {
        return 0.0;
    }
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negatives; -0.0 + 0.0 is +0.0.
    if wrapped >= 360.0 { 0.0 } else { wrapped + 0.0 }
}

/// `round(center_x / frame_width * 360) mod 360`.
#[must_use]
pub fn heading_from_center(center_x: f64, frame_width: f64) -> f64 {
    let width = crate::coords::epsilon_floor(frame_width);
    normalize_heading((center_x / width * 360.0).round())
}

/// `90 - center_y / frame_height * 180`, clamped to `[-90, 90]`.
#[must_use]
pub fn pitch_from_center(center_y: f64, frame_height: f64) -> f64 {
    let height = crate::coords::epsilon_floor(frame_height);
    let pitch = 90.0 - center_y / height * 180.0;
    if pitch.is_nan() { 0.0 } else { pitch.clamp(-90.0, 90.0) }
}

/// Area rule: `clamp(area / saturation_area, 0, 1)`.
#[must_use]
pub fn zoom_from_area(box_area: f64, saturation_area: f64) -> f64 {
    let level = box_area / crate::coords::epsilon_floor(saturation_area);
    if level.is_nan() { 0.0 } else { level.clamp(0.0, 1.0) }
}

/// Ratio rule: piecewise-linear far→near mapping of `box_area / frame_area`.
///
/// Returns `(zoom, focus)`, which are always equal.
#[must_use]
pub fn zoom_focus_from_ratio(ratio: f64, min_ratio: f64, max_ratio: f64) -> (f64, f64) {
    let level = if ratio.is_nan() || ratio <= min_ratio {
        0.0
    } else if ratio >= max_ratio {
        1.0
    } else {
        ((ratio - min_ratio) / (max_ratio - min_ratio)).clamp(0.0, 1.0)
    };
    (level, level)
}

/// Offset that moves `box_center` onto the frame center.
#[must_use]
pub fn recenter_offset(box_center: Point, frame: Size) -> Offset {
    let center = frame.center();
    Offset::new(center.x - box_center.x, center.y - box_center.y)
}

/// Frame-space crop for the zoom inset: the target box padded by
/// [`INSET_CROP_PAD`] around its center, clamped into the frame.
///
/// Returns `None` when the clamped window has no area.
#[must_use]
pub fn inset_window(bbox: BoundingBox, frame: Size) -> Option<Rect> {
    let center = bbox.center();
    let width = bbox.width * INSET_CROP_PAD;
    let height = bbox.height * INSET_CROP_PAD;
    let x1 = (center.x - width * 0.5).max(0.0);
    let y1 = (center.y - height * 0.5).max(0.0);
    let x2 = (x1 + width).min(frame.width);
    let y2 = (y1 + height).min(frame.height);
    if x2 > x1 && y2 > y1 { Some(Rect::new(x1, y1, x2 - x1, y2 - y1)) } else { None }
}

// =============================================================================
// CONTROLLER
// =============================================================================

/// Holds [`HudState`] and the current selection; mutated once per frame.
#[derive(Debug, Clone, Default)]
pub struct AutoFramingController {
    state: HudState,
    selection: Option<DetectionId>,
    config: FramingConfig,
}

impl AutoFramingController {
    #[must_use]
    pub fn new(config: FramingConfig) -> Self {
        Self { state: HudState::default(), selection: None, config }
    }

    /// Immutable snapshot handed to renderers.
    #[must_use]
    pub fn state(&self) -> HudState {
        self.state
    }

    #[must_use]
    pub fn selection(&self) -> Option<DetectionId> {
        self.selection
    }

    #[must_use]
    pub fn config(&self) -> FramingConfig {
        self.config
    }

    /// Set or clear the tracked id. No geometric side effect.
    pub fn select_target(&mut self, id: Option<DetectionId>) {
        if self.selection != id {
            debug!(previous = ?self.selection, next = ?id, "target selection changed");
        }
        self.selection = id;
    }

    // --- Mutators ---

    pub fn set_heading(&mut self, deg: f64) {
        if deg.is_finite() {
            self.state.heading_deg = normalize_heading(deg);
        }
    }

    pub fn set_pitch(&mut self, deg: f64) {
        if !deg.is_nan() {
            self.state.pitch_deg = deg.clamp(-90.0, 90.0);
        }
    }

    pub fn set_zoom_level(&mut self, level: f64) {
        if !level.is_nan() {
            self.state.zoom_level = level.clamp(0.0, 1.0);
        }
    }

    pub fn set_focus_level(&mut self, level: f64) {
        if !level.is_nan() {
            self.state.focus_level = level.clamp(0.0, 1.0);
        }
    }

    /// Dedicated auto-adjust entry point: apply the ratio rule for a box of
    /// `box_size` in a frame of `frame`.
    pub fn auto_adjust_zoom_focus(&mut self, box_size: Size, frame: Size) {
        let (zoom, focus) = self.ratio_levels(box_size, frame);
        self.state.zoom_level = zoom;
        self.state.focus_level = focus;
    }

    fn ratio_levels(&self, box_size: Size, frame: Size) -> (f64, f64) {
        let ratio = box_size.area() / frame.guarded().area();
        zoom_focus_from_ratio(ratio, self.config.min_area_ratio, self.config.max_area_ratio)
    }

    /// Per-frame update from the current detection set.
    ///
    /// With no selected target present, state is held and the offset is zero.
    pub fn update(&mut self, detections: &[Detection], frame: Size) -> FramingUpdate {
        let Some(id) = self.selection else {
            return FramingUpdate::default();
        };
        let Some(target) = detect::find(detections, id) else {
            debug!(id, "selected target not in frame; holding state");
            return FramingUpdate::default();
        };

        let bbox = target.bbox;
        let center = bbox.center();
        let frame = frame.guarded();

        let mut next = self.state;
        next.zoom_level = zoom_from_area(bbox.area(), self.config.zoom_saturation_area);
        let (zoom, focus) = self.ratio_levels(Size::new(bbox.width, bbox.height), frame);
        next.zoom_level = zoom;
        next.focus_level = focus;
        next.pitch_deg = pitch_from_center(center.y, frame.height);
        next.heading_deg = heading_from_center(center.x, frame.width);
        self.state = next;

        FramingUpdate { offset: recenter_offset(center, frame), target: Some(id) }
    }
}
