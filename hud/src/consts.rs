//! Shared numeric constants for the hud crate.

// ── Reference layout ────────────────────────────────────────────

/// Width of the overlay reference layout, in pixels.
pub const REFERENCE_WIDTH: f64 = 1920.0;

/// Height of the overlay reference layout, in pixels.
pub const REFERENCE_HEIGHT: f64 = 1080.0;

/// Reference width the status bar is authored against.
pub const STATUS_BAR_REFERENCE_WIDTH: f64 = 1200.0;

/// Floor substituted for degenerate scales and sizes.
pub const SCALE_EPSILON: f64 = 1e-6;

/// Height of the status bar strip across the top of the canvas.
pub const NAV_BAR_HEIGHT: f64 = 80.0;

// ── Auto-framing ────────────────────────────────────────────────

/// Bounding-box area (px²) at which the area zoom rule saturates.
pub const ZOOM_SATURATION_AREA: f64 = 80_000.0;

/// Box/frame area ratio at or below which zoom and focus are 0 (far).
pub const MIN_AREA_RATIO: f64 = 0.0005;

/// Box/frame area ratio at or above which zoom and focus are 1 (near).
pub const MAX_AREA_RATIO: f64 = 0.0093;

/// Neutral zoom and focus level at engine start.
pub const NEUTRAL_LEVEL: f64 = 0.5;

// ── Annotations ─────────────────────────────────────────────────

/// Smallest label font size, in pixels.
pub const LABEL_MIN_FONT_PX: f64 = 10.0;

/// Box width (frame px) per label font pixel.
pub const LABEL_FONT_WIDTH_DIVISOR: f64 = 30.0;

/// Maximum number of cached label entries.
pub const LABEL_CACHE_CAPACITY: usize = 64;

/// Consecutive unseen frames after which a label entry is evicted.
pub const LABEL_EVICT_AFTER_FRAMES: u64 = 90;

// ── Zoom inset ──────────────────────────────────────────────────

/// Crop window size relative to the target box.
pub const INSET_CROP_PAD: f64 = 1.5;

/// Inset width as a fraction of canvas width.
pub const INSET_WIDTH_FRACTION: f64 = 0.12;

/// Height of the caption strip under the inset, in pixels.
pub const INSET_CAPTION_HEIGHT: f64 = 30.0;

// ── Focus scale ─────────────────────────────────────────────────

/// Distance labels on the focus slider, evenly spaced by slider position.
pub const FOCUS_DISTANCES: [u32; 6] = [20, 40, 100, 300, 800, 2000];
