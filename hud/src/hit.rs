#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::coords::{Point, Rect};
use crate::detect::DetectionId;

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub id: DetectionId,
    /// Distance from the point to the hit box's center.
    pub distance: f64,
}

/// Find the box under `canvas_pt`.
///
/// Boxes are the canvas-space rectangles as drawn this frame. Edges count as
/// inside. When boxes overlap, the one whose center is nearest wins; ties go
/// to the earlier box.
#[must_use]
pub fn hit_test<I>(canvas_pt: Point, boxes: I) -> Option<Hit>
where
    I: IntoIterator<Item = (DetectionId, Rect)>,
{
    boxes
        .into_iter()
        .filter(|(_, rect)| rect.contains(canvas_pt))
        .map(|(id, rect)| {
            let c = rect.center();
            Hit { id, distance: (c.x - canvas_pt.x).hypot(c.y - canvas_pt.y) }
        })
        .fold(None, |best: Option<Hit>, hit| match best {
            Some(b) if b.distance <= hit.distance => Some(b),
            _ => Some(hit),
        })
}
