//! Per-detection annotations: canvas-space boxes and their text labels.
//!
//! Placement is a pure function of one detection, the frame's re-centering
//! offset, and the current fit. The [`LabelCache`] keeps one [`Label`] per
//! detection id across frames: ids missing from a frame are hidden rather than
//! dropped, so a track that reappears picks up its previous entry. Entries are
//! evicted once they have gone unseen for too long, or when the cache is over
//! capacity (least recently seen first).

#[cfg(test)]
#[path = "annotate_test.rs"]
mod annotate_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{LABEL_CACHE_CAPACITY, LABEL_EVICT_AFTER_FRAMES, LABEL_FONT_WIDTH_DIVISOR, LABEL_MIN_FONT_PX};
use crate::coords::{Fit, Rect, Size};
use crate::detect::{Detection, DetectionId};
use crate::draw::{Align, Baseline, Color, DrawList, Font, Stroke, TextMetrics};
use crate::framing::Offset;

const SELECTED_BOX: Color = Color::rgb(255, 0, 0);
const OTHER_BOX: Color = Color::rgb(0, 255, 0);
const LABEL_BACKGROUND: Color = Color::rgb(60, 60, 60);

// =============================================================================
// PLACEMENT
// =============================================================================

/// Where one detection's box and label land on the canvas this frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub id: DetectionId,
    pub text: String,
    /// Detection box in canvas space, after re-centering.
    pub box_rect: Rect,
    /// Label background in canvas space; its text is drawn inside.
    pub label_rect: Rect,
    pub font_px: f64,
    pub selected: bool,
}

/// Label font size: grows with the box's frame-space width, never below the minimum.
#[must_use]
pub fn label_font_px(box_width: f64) -> f64 {
    let size = (box_width / LABEL_FONT_WIDTH_DIVISOR).floor();
    if size.is_nan() { LABEL_MIN_FONT_PX } else { size.max(LABEL_MIN_FONT_PX) }
}

/// The box shifted by `offset`, or `None` when its shifted top-left corner
/// falls outside the frame.
#[must_use]
pub fn shifted_in_frame(bbox: Rect, offset: Offset, frame: Size) -> Option<Rect> {
    let shifted = offset.apply_rect(bbox);
    let inside = (0.0..frame.width).contains(&shifted.x) && (0.0..frame.height).contains(&shifted.y);
    inside.then_some(shifted)
}

/// Keep `label` fully on the canvas. When the label is larger than the canvas
/// it is pinned to the top-left corner.
#[must_use]
pub fn clamp_to_canvas(label: Rect, canvas: Size) -> Rect {
    let x = label.x.min(canvas.width - label.width).max(0.0);
    let y = label.y.min(canvas.height - label.height).max(0.0);
    Rect::new(x, y, label.width, label.height)
}

/// Place one detection. Returns `None` when the detection is not visible after
/// re-centering.
#[must_use]
pub fn place(
    detection: &Detection,
    offset: Offset,
    fit: &Fit,
    frame: Size,
    canvas: Size,
    selected: bool,
    metrics: &dyn TextMetrics,
) -> Option<Placement> {
    let shifted = shifted_in_frame(detection.bbox, offset, frame)?;
    let box_rect = fit.frame_rect_to_canvas(shifted);

    let text = detection.label_text();
    let font_px = label_font_px(detection.bbox.width);
    let font = Font::regular(font_px);
    let text_w = metrics.width(&text, font);
    let text_h = metrics.line_height(font);

    let above = Rect::new(box_rect.x, box_rect.y - text_h, text_w, text_h);
    Some(Placement { id: detection.id, text, box_rect, label_rect: clamp_to_canvas(above, canvas), font_px, selected })
}

// =============================================================================
// LABEL CACHE
// =============================================================================

/// Bounds on the label cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelCacheConfig {
    /// Maximum number of entries, visible or hidden.
    pub capacity: usize,
    /// Unseen frames after which an entry is evicted.
    pub evict_after_frames: u64,
}

impl Default for LabelCacheConfig {
    fn default() -> Self {
        Self { capacity: LABEL_CACHE_CAPACITY, evict_after_frames: LABEL_EVICT_AFTER_FRAMES }
    }
}

/// A cached label entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    #[serde(flatten)]
    pub placement: Placement,
    pub visible: bool,
    /// Frame that first created this entry.
    pub created_frame: u64,
    pub last_seen_frame: u64,
}

/// Label entries keyed by detection id.
#[derive(Debug, Clone, Default)]
pub struct LabelCache {
    entries: HashMap<DetectionId, Label>,
    config: LabelCacheConfig,
}

impl LabelCache {
    #[must_use]
    pub fn new(config: LabelCacheConfig) -> Self {
        Self { entries: HashMap::new(), config }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: DetectionId) -> Option<&Label> {
        self.entries.get(&id)
    }

    /// Apply one frame's placements.
    ///
    /// Placed ids become visible and reuse any existing entry; every other
    /// entry is hidden. Returns the visible labels in placement order.
    pub fn sync(&mut self, frame_index: u64, placements: Vec<Placement>) -> Vec<Label> {
        for label in self.entries.values_mut() {
            label.visible = false;
        }

        let mut shown = Vec::with_capacity(placements.len());
        for placement in placements {
            let label = self.entries.entry(placement.id).or_insert_with(|| Label {
                placement: placement.clone(),
                visible: true,
                created_frame: frame_index,
                last_seen_frame: frame_index,
            });
            label.placement = placement;
            label.visible = true;
            label.last_seen_frame = frame_index;
            shown.push(label.clone());
        }

        self.evict(frame_index);
        shown
    }

    fn evict(&mut self, frame_index: u64) {
        let limit = self.config.evict_after_frames;
        self.entries.retain(|&id, label| {
            let idle = frame_index.saturating_sub(label.last_seen_frame);
            let keep = label.visible || idle < limit;
            if !keep {
                debug!(id, idle, "evicting idle label");
            }
            keep
        });

        // Over capacity: drop hidden entries, least recently seen first.
        while self.entries.len() > self.config.capacity {
            let oldest = self
                .entries
                .values()
                .filter(|label| !label.visible)
                .min_by_key(|label| (label.last_seen_frame, label.placement.id))
                .map(|label| label.placement.id);
            let Some(id) = oldest else { break };
            debug!(id, capacity = self.config.capacity, "evicting label over capacity");
            self.entries.remove(&id);
        }
    }
}

// =============================================================================
// DRAWING
// =============================================================================

/// Draw boxes and labels. Selected boxes are red, others green.
pub fn paint(out: &mut DrawList, labels: &[Label]) {
    for label in labels.iter().filter(|l| l.visible) {
        let p = &label.placement;
        let color = if p.selected { SELECTED_BOX } else { OTHER_BOX };
        out.rect(p.box_rect, None, Some(Stroke::new(color, 1.0)));
        out.rect(p.label_rect, Some(LABEL_BACKGROUND), None);
        out.text(
            p.text.clone(),
            p.label_rect.center(),
            Align::Center,
            Baseline::Middle,
            Font::regular(p.font_px),
            Color::WHITE,
        );
    }
}
