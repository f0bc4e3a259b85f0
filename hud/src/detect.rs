//! Detection model: the per-frame result contract of the detection collaborator.
//!
//! Detections arrive fresh every frame in frame space. The `id` is trusted to
//! identify the same physical track across frames; nothing in this crate
//! deduplicates or re-identifies.

#[cfg(test)]
#[path = "detect_test.rs"]
mod detect_test;

use serde::{Deserialize, Serialize};

use crate::coords::Rect;

/// Track identifier assigned by the detection collaborator.
pub type DetectionId = i64;

/// A detection's box in frame space: `(x, y)` top-left, then width and height.
pub type BoundingBox = Rect;

/// A single detected object in the current frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Stable track id.
    pub id: DetectionId,
    /// Box in frame space.
    pub bbox: BoundingBox,
    /// Confidence in percent, `[0, 100]`.
    pub confidence: f64,
    /// Class name, e.g. `"drone"`.
    #[serde(rename = "type")]
    pub kind: String,
}

impl Detection {
    #[must_use]
    pub fn new(id: DetectionId, bbox: BoundingBox, confidence: f64, kind: impl Into<String>) -> Self {
        Self { id, bbox, confidence, kind: kind.into() }
    }

    /// Overlay label text, e.g. `"ID: 3 drone 87.5%"`.
    #[must_use]
    pub fn label_text(&self) -> String {
        format!("ID: {} {} {:.1}%", self.id, self.kind, self.confidence)
    }

    /// Compact caption used under the zoom inset, e.g. `"ID:3 drone 87.5%"`.
    #[must_use]
    pub fn caption_text(&self) -> String {
        format!("ID:{} {} {:.1}%", self.id, self.kind, self.confidence)
    }
}

/// Find the detection carrying `id`, if it is present this frame.
#[must_use]
pub fn find(detections: &[Detection], id: DetectionId) -> Option<&Detection> {
    detections.iter().find(|d| d.id == id)
}
