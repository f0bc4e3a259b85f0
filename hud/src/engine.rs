//! Per-tick engine: one call turns a frame's detections into the full overlay.
//!
//! DESIGN
//! ======
//! [`EngineCore`] confines every mutation to [`EngineCore::tick_at`] and the
//! pointer/selection entry points. A tick runs the auto-framing update, then
//! paints from the committed [`HudState`] snapshot, so a paint never sees a
//! half-updated state. Nothing here blocks or performs I/O; frame acquisition
//! and inference live behind the pipeline's collaborator traits.
//!
//! Time is injected (`tick_at(.., now)`) so the FPS window is testable.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::annotate::{self, Label, LabelCache, LabelCacheConfig, Placement};
use crate::consts::{INSET_CAPTION_HEIGHT, INSET_WIDTH_FRACTION, NAV_BAR_HEIGHT};
use crate::coords::{self, Fit, FitMode, Point, Rect, Size};
use crate::detect::{self, Detection, DetectionId};
use crate::draw::{Align, ApproxMetrics, Baseline, Color, DrawList, Font, Stroke, TextMetrics};
use crate::framing::{self, AutoFramingController, FramingConfig, HudState, Offset};
use crate::hit;
use crate::input::{self, PointerEvent, SelectionChange};
use crate::render;
use crate::scale;
use crate::status_bar::{self, MotionMode, StatusReadout, VisionStatus};

const INSET_BORDER: Color = Color::rgb(128, 128, 128);
const INSET_CAPTION: Color = Color::rgb(60, 60, 60);
const INSET_TARGET: Color = Color::rgb(255, 0, 0);

// =============================================================================
// CONFIG
// =============================================================================

/// Engine tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How the frame is fitted onto the canvas.
    pub fit_mode: FitMode,
    pub framing: FramingConfig,
    pub labels: LabelCacheConfig,
    /// Whether the zoom inset starts visible.
    pub inset_visible: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fit_mode: FitMode::default(),
            framing: FramingConfig::default(),
            labels: LabelCacheConfig::default(),
            inset_visible: true,
        }
    }
}

/// Where the canvas sits on screen and how large it is.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    /// Screen-space position of the canvas's top-left corner.
    pub origin: Point,
    pub canvas: Size,
}

// =============================================================================
// FPS
// =============================================================================

/// Ticks counted over a rolling one-second window.
#[derive(Debug, Clone, Copy, Default)]
pub struct FpsCounter {
    window_start: Option<Instant>,
    count: u32,
    fps: u32,
}

impl FpsCounter {
    const WINDOW: Duration = Duration::from_secs(1);

    /// Count one tick at `now`; returns the most recently published rate.
    pub fn tick_at(&mut self, now: Instant) -> u32 {
        let start = *self.window_start.get_or_insert(now);
        self.count += 1;
        if now.saturating_duration_since(start) >= Self::WINDOW {
            self.fps = self.count;
            self.count = 0;
            self.window_start = Some(now);
        }
        self.fps
    }

    #[must_use]
    pub fn fps(&self) -> u32 {
        self.fps
    }
}

// =============================================================================
// ZOOM INSET
// =============================================================================

/// Picture-in-picture view of the inset target.
///
/// `crop` is in frame space on the un-shifted frame; everything else is in
/// canvas space. The host scales the cropped pixels into `placement`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoomInset {
    pub target: DetectionId,
    pub crop: Rect,
    pub placement: Rect,
    /// Target box as it appears inside `placement`.
    pub target_box: Rect,
    pub caption: String,
    pub caption_rect: Rect,
    pub caption_font_px: f64,
}

/// Inset rectangle and caption strip for `canvas`: at `(20, navbar - 30)`,
/// 12% of the canvas width, 4:3.
#[must_use]
pub fn inset_layout(canvas: Size) -> (Rect, Rect) {
    let width = (canvas.width * INSET_WIDTH_FRACTION).max(0.0);
    let placement = Rect::new(20.0, NAV_BAR_HEIGHT - 30.0, width, width * 3.0 / 4.0);
    let caption = Rect::new(placement.x, placement.bottom(), width, INSET_CAPTION_HEIGHT);
    (placement, caption)
}

/// Build the inset for `target`, or `None` if its crop window is empty.
#[must_use]
pub fn zoom_inset(target: &Detection, frame: Size, canvas: Size) -> Option<ZoomInset> {
    let crop = framing::inset_window(target.bbox, frame)?;
    let (placement, caption_rect) = inset_layout(canvas);
    let sx = placement.width / crop.width;
    let sy = placement.height / crop.height;
    let b = target.bbox;
    let target_box = Rect::new(
        placement.x + (b.x - crop.x) * sx,
        placement.y + (b.y - crop.y) * sy,
        b.width * sx,
        b.height * sy,
    );
    Some(ZoomInset {
        target: target.id,
        crop,
        placement,
        target_box,
        caption: target.caption_text(),
        caption_rect,
        caption_font_px: (placement.width / 25.0).floor().max(6.0),
    })
}

fn paint_inset(out: &mut DrawList, inset: &ZoomInset) {
    out.rect(inset.placement, None, Some(Stroke::new(INSET_BORDER, 1.0)));
    out.clipped(inset.placement, |out| {
        out.rect(inset.target_box, None, Some(Stroke::new(INSET_TARGET, 1.0)));
    });
    out.rect(inset.caption_rect, Some(INSET_CAPTION), None);
    out.text(
        inset.caption.clone(),
        Point::new(inset.caption_rect.x + 4.0, inset.caption_rect.center().y),
        Align::Left,
        Baseline::Middle,
        Font::regular(inset.caption_font_px),
        Color::WHITE,
    );
}

// =============================================================================
// ENGINE
// =============================================================================

/// Everything one tick produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameOutput {
    pub frame_index: u64,
    /// Re-centering offset to apply to this frame's pixels.
    pub offset: Offset,
    /// Selected target that drove this tick, if present.
    pub target: Option<DetectionId>,
    pub state: HudState,
    pub status: StatusReadout,
    /// Visible labels in detection order.
    pub labels: Vec<Label>,
    pub inset: Option<ZoomInset>,
    /// Full overlay for the canvas, in paint order.
    pub hud: DrawList,
}

/// Auto-framing, annotation and overlay state for one video stream.
pub struct EngineCore {
    framing: AutoFramingController,
    labels: LabelCache,
    fps: FpsCounter,
    viewport: Viewport,
    config: EngineConfig,
    metrics: Arc<dyn TextMetrics + Send + Sync>,
    inset_visible: bool,
    frame_index: u64,
    last_frame: Size,
    /// Canvas-space boxes drawn on the previous tick, for hit-testing.
    drawn_boxes: Vec<(DetectionId, Rect)>,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            framing: AutoFramingController::new(config.framing),
            labels: LabelCache::new(config.labels),
            fps: FpsCounter::default(),
            viewport: Viewport::default(),
            config,
            metrics: Arc::new(ApproxMetrics::default()),
            inset_visible: config.inset_visible,
            frame_index: 0,
            last_frame: Size::default(),
            drawn_boxes: Vec::new(),
        }
    }

    /// Replace the text measurement used for label and banner layout.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<dyn TextMetrics + Send + Sync>) -> Self {
        self.metrics = metrics;
        self
    }

    // --- Viewport / toggles ---

    /// Idempotent; may be called at any tick boundary.
    pub fn set_viewport(&mut self, origin: Point, canvas: Size) {
        self.viewport = Viewport { origin, canvas };
    }

    pub fn set_inset_visible(&mut self, visible: bool) {
        self.inset_visible = visible;
    }

    /// Flip inset visibility; returns the new value.
    pub fn toggle_inset(&mut self) -> bool {
        self.inset_visible = !self.inset_visible;
        self.inset_visible
    }

    // --- Selection ---

    pub fn select_target(&mut self, id: Option<DetectionId>) {
        self.framing.select_target(id);
    }

    /// Resolve a pointer press and apply the resulting selection change.
    ///
    /// Hit-testing happens in canvas space, against the boxes drawn on the
    /// previous tick: those already carry the re-centering offset and the fit,
    /// so a press lands on what the operator actually saw. The frame-space
    /// point is only logged, to line a press up with detector output.
    pub fn on_pointer_down(&mut self, event: PointerEvent) -> SelectionChange {
        let PointerEvent { screen: screen_pt, button } = event;
        let canvas_pt = coords::screen_to_canvas(screen_pt, self.viewport.origin);
        let hit = hit::hit_test(canvas_pt, self.drawn_boxes.iter().copied());
        let change = input::interpret(button, hit);
        let frame_pt = coords::screen_to_frame(
            screen_pt,
            self.viewport.origin,
            self.last_frame,
            self.viewport.canvas,
            self.config.fit_mode,
        );
        debug!(?button, x = frame_pt.x, y = frame_pt.y, ?change, "pointer down");
        match change {
            SelectionChange::Select(id) => self.framing.select_target(Some(id)),
            SelectionChange::Clear => self.framing.select_target(None),
            SelectionChange::Keep => {}
        }
        change
    }

    // --- Queries ---

    #[must_use]
    pub fn state(&self) -> HudState {
        self.framing.state()
    }

    #[must_use]
    pub fn selection(&self) -> Option<DetectionId> {
        self.framing.selection()
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn inset_visible(&self) -> bool {
        self.inset_visible
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    #[must_use]
    pub fn labels(&self) -> &LabelCache {
        &self.labels
    }

    // --- Tick ---

    /// Process one frame's detections and paint the overlay.
    pub fn tick_at(&mut self, detections: &[Detection], frame: Size, now: Instant) -> FrameOutput {
        let fps = self.fps.tick_at(now);
        let update = self.framing.update(detections, frame);
        let state = self.framing.state();
        let canvas = self.viewport.canvas;
        let selection = self.framing.selection();

        let fit = Fit::new(frame, canvas, self.config.fit_mode);
        let metrics = self.metrics.as_ref();
        let placements: Vec<Placement> = detections
            .iter()
            .filter_map(|d| {
                annotate::place(d, update.offset, &fit, frame, canvas, selection == Some(d.id), metrics)
            })
            .collect();
        let labels = self.labels.sync(self.frame_index, placements);
        self.drawn_boxes = labels.iter().map(|l| (l.placement.id, l.placement.box_rect)).collect();

        let has_detections = !detections.is_empty();
        let status = StatusReadout {
            vision: VisionStatus::classify(has_detections, update.target.is_some()),
            motion: MotionMode::from_detections(has_detections),
            fps,
        };

        let inset = if self.inset_visible {
            let target = selection.and_then(|id| detect::find(detections, id)).or_else(|| detections.first());
            target.and_then(|t| zoom_inset(t, frame, canvas))
        } else {
            None
        };

        let mut hud = DrawList::new();
        annotate::paint(&mut hud, &labels);
        hud.extend(render::paint(&state, canvas));
        hud.extend(status_bar::paint(&status, canvas, metrics));
        if !has_detections {
            render::no_detection_banner(&mut hud, scale::overlay(canvas), canvas, metrics);
        }
        if let Some(inset) = &inset {
            paint_inset(&mut hud, inset);
        }

        let out = FrameOutput {
            frame_index: self.frame_index,
            offset: update.offset,
            target: update.target,
            state,
            status,
            labels,
            inset,
            hud,
        };
        self.frame_index += 1;
        self.last_frame = frame;
        out
    }
}
