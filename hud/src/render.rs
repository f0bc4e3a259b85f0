//! HUD overlay rendering: the gauges drawn over the re-centered video.
//!
//! Every gauge is a pure function of a [`HudState`] snapshot, the overlay
//! [`ScaleFactor`], and the canvas size. Gauges append primitives to a
//! [`DrawList`]; none of them read or write shared state, so paint order
//! between gauges never matters for correctness.
//!
//! Geometry is authored at the 1920×1080 reference layout. Each literal below
//! is a reference-pixel length multiplied by the scale factor, so the gauges
//! keep their relative proportions at any canvas size. The heading tape is the
//! exception: its degree spacing is `4 / scale` pixels, so a smaller canvas
//! spreads the ruler out and shows fewer degrees.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::consts::FOCUS_DISTANCES;
use crate::coords::{Point, Rect, Size};
use crate::draw::{Align, Baseline, Color, DrawList, Font, PathCommand, Stroke, TextMetrics};
use crate::framing::HudState;
use crate::scale::{self, ScaleFactor};

const PANEL: Color = Color::rgba(60, 60, 60, 200);
const FOCUS_PANEL: Color = Color::rgba(60, 60, 60, 160);
const DIAL_FACE: Color = Color::rgba(50, 50, 50, 220);
const INDICATOR: Color = Color::rgb(199, 153, 0);
const INDICATOR_BORDER: Color = Color::rgb(60, 60, 60);
const NEEDLE: Color = Color::rgb(255, 165, 0);
const HANDLE: Color = Color::rgb(255, 204, 0);
const AXIS: Color = Color::rgb(200, 200, 200);
const TRACK: Color = Color::rgb(180, 180, 180);
const BANNER: Color = Color::rgba(100, 100, 100, 153);

/// Draw the full overlay for one frame.
///
/// The scale factor is derived from `canvas` on every call.
#[must_use]
pub fn paint(state: &HudState, canvas: Size) -> DrawList {
    let scale = scale::overlay(canvas);
    let mut out = DrawList::new();
    heading_tape(&mut out, state, scale, canvas);
    pitch_ladder(&mut out, state, scale, canvas);
    compass_dial(&mut out, state, scale, canvas);
    pitch_dial(&mut out, state, scale, canvas);
    zoom_indicator(&mut out, state, scale, canvas);
    focus_indicator(&mut out, state, scale, canvas);
    crosshair(&mut out, state, scale, canvas);
    out
}

// =============================================================
// Heading tape
// =============================================================

/// Placement of the horizontal heading ruler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadingTapeLayout {
    pub center_x: f64,
    /// Baseline the ticks grow up from.
    pub bar_y: f64,
    /// Rounded background; ticks are clipped to it.
    pub panel: Rect,
    pub px_per_deg: f64,
    /// Whole degrees spanned by the ruler.
    pub visible_deg: f64,
}

#[must_use]
pub fn heading_tape_layout(scale: ScaleFactor, canvas: Size) -> HeadingTapeLayout {
    let center_x = canvas.width * 0.5;
    let bar_y = canvas.height - scale.px(60.0);
    let length = scale.px(800.0);
    let px_per_deg = 4.0 / scale.get();
    HeadingTapeLayout {
        center_x,
        bar_y,
        panel: Rect::new(
            center_x - length * 0.5 - scale.px(10.0),
            bar_y - scale.px(40.0),
            length + scale.px(20.0),
            scale.px(80.0),
        ),
        px_per_deg,
        visible_deg: (length / px_per_deg).floor(),
    }
}

/// First tick: the multiple of 10° at or below the leftmost visible heading.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn heading_tape_start(heading_deg: f64, visible_deg: f64) -> i64 {
    (((heading_deg - (visible_deg * 0.5).floor()) / 10.0).floor() * 10.0) as i64
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn heading_tape(out: &mut DrawList, state: &HudState, scale: ScaleFactor, canvas: Size) {
    let layout = heading_tape_layout(scale, canvas);
    let panel = layout.panel;
    out.rounded_rect(panel, scale.px(15.0), PANEL);

    let tick_small = scale.px(8.0);
    let tick_large = scale.px(14.0);
    let label_y = layout.bar_y + scale.px(18.0);
    let tick_pen = Stroke::new(Color::WHITE, 1.0);
    let label_font = small_font(scale);

    let start = heading_tape_start(state.heading_deg, layout.visible_deg);
    let end = start + layout.visible_deg as i64 + 10;
    out.clipped(panel, |out| {
        for deg in (start..end).step_by(5) {
            let x = layout.center_x + (deg as f64 - state.heading_deg) * layout.px_per_deg;
            if x < panel.x || x > panel.right() {
                continue;
            }
            if deg.rem_euclid(10) == 0 {
                out.line(Point::new(x, layout.bar_y - tick_large), Point::new(x, layout.bar_y), tick_pen);
                out.text(
                    deg.rem_euclid(360).to_string(),
                    Point::new(x, label_y),
                    Align::Center,
                    Baseline::Middle,
                    label_font,
                    Color::WHITE,
                );
            } else {
                out.line(Point::new(x, layout.bar_y - tick_small), Point::new(x, layout.bar_y), tick_pen);
            }
        }
    });

    // Fixed indicator above the ruler, pointing down at the current heading.
    let tri_h = scale.px(30.0);
    let tri_w = scale.px(36.0);
    let tip = Point::new(layout.center_x, layout.bar_y - scale.px(30.0));
    let base_y = tip.y - tri_h;
    out.fill_polygon(
        vec![
            tip,
            Point::new(layout.center_x - tri_w * 0.5, base_y),
            Point::new(layout.center_x + tri_w * 0.5, base_y),
        ],
        INDICATOR,
        Some(Stroke::new(INDICATOR_BORDER, 1.0)),
    );

    out.text(
        whole_degrees(state.heading_deg),
        Point::new(layout.center_x, tip.y - scale.px(50.0)),
        Align::Center,
        Baseline::Middle,
        Font::bold(scale.px_min(9.0, 1.0)),
        Color::WHITE,
    );
}

// =============================================================
// Pitch ladder
// =============================================================

/// Placement of the vertical pitch ruler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchLadderLayout {
    pub bar_x: f64,
    /// y of the +90° end.
    pub top_y: f64,
    /// Pixel span covering -90°..=90°.
    pub span: f64,
    pub tick_length: f64,
}

impl PitchLadderLayout {
    /// y coordinate of `pitch_deg` on the ruler.
    #[must_use]
    pub fn y_for(&self, pitch_deg: f64) -> f64 {
        self.top_y + (90.0 - pitch_deg) * self.span / 180.0
    }
}

#[must_use]
pub fn pitch_ladder_layout(scale: ScaleFactor, canvas: Size) -> PitchLadderLayout {
    let span = scale.px(600.0);
    PitchLadderLayout {
        bar_x: canvas.width - scale.px(100.0),
        top_y: canvas.height * 0.5 - span * 0.5,
        span,
        tick_length: scale.px(15.0),
    }
}

pub fn pitch_ladder(out: &mut DrawList, state: &HudState, scale: ScaleFactor, canvas: Size) {
    let layout = pitch_ladder_layout(scale, canvas);
    let x = layout.bar_x;
    out.line(Point::new(x, layout.top_y), Point::new(x, layout.top_y + layout.span), Stroke::new(AXIS, 2.0));

    let tick_pen = Stroke::new(Color::WHITE, 1.0);
    let font = small_font(scale);
    for deg in (-90_i32..=90).step_by(10) {
        let y = layout.y_for(f64::from(deg));
        out.line(Point::new(x, y), Point::new(x + layout.tick_length, y), tick_pen);
        if matches!(deg, -90 | 0 | 90) {
            out.text(
                deg.to_string(),
                Point::new(x + layout.tick_length + scale.px(5.0), y),
                Align::Left,
                Baseline::Middle,
                font,
                Color::WHITE,
            );
        }
    }

    // Right-pointing indicator sitting left of the ruler.
    let pitch = state.pitch_deg.clamp(-90.0, 90.0);
    let tip_y = layout.y_for(pitch);
    let tri_h = scale.px(20.0);
    let base_x = x + layout.tick_length - scale.px(35.0);
    let tip = Point::new(base_x + scale.px(24.0), tip_y);
    out.fill_polygon(
        vec![tip, Point::new(base_x, tip_y - tri_h * 0.5), Point::new(base_x, tip_y + tri_h * 0.5)],
        INDICATOR,
        Some(Stroke::new(INDICATOR_BORDER, 1.0)),
    );

    out.text(
        whole_degrees(pitch),
        Point::new(tip.x - scale.px(30.0), tip_y),
        Align::Right,
        Baseline::Middle,
        font,
        Color::WHITE,
    );
}

// =============================================================
// Dials
// =============================================================

/// Centers and radius of the two bottom-left dials.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialLayout {
    pub compass_center: Point,
    pub pitch_center: Point,
    pub radius: f64,
}

impl DialLayout {
    #[must_use]
    pub fn inner_radius(&self) -> f64 {
        self.radius * 0.75
    }

    #[must_use]
    pub fn needle_width(&self) -> f64 {
        (self.radius * 0.1).max(3.0)
    }
}

#[must_use]
pub fn dial_layout(scale: ScaleFactor, canvas: Size) -> DialLayout {
    let center_y = canvas.height - scale.px(150.0);
    DialLayout {
        compass_center: Point::new(scale.px(450.0), center_y),
        pitch_center: Point::new(scale.px(150.0), center_y),
        radius: scale.px(100.0),
    }
}

/// Needle triangle from `center` toward unit direction `dir` (screen axes).
fn needle(center: Point, dir: (f64, f64), length: f64, width: f64) -> Vec<Point> {
    let (dx, dy) = dir;
    let half = width * 0.5;
    // Base corners sit on the perpendicular through the center.
    vec![
        Point::new(center.x + length * dx, center.y + length * dy),
        Point::new(center.x - half * dy, center.y + half * dx),
        Point::new(center.x + half * dy, center.y - half * dx),
    ]
}

pub fn compass_dial(out: &mut DrawList, state: &HudState, scale: ScaleFactor, canvas: Size) {
    let layout = dial_layout(scale, canvas);
    let center = layout.compass_center;
    let radius = layout.radius;
    let inner = layout.inner_radius();

    out.circle(center, radius, Some(DIAL_FACE), None);
    out.circle(center, inner, None, Some(Stroke::new(Color::rgba(255, 255, 255, 150), scale.px_min(2.0, 1.0))));

    let font = small_font(scale);
    let label_radius = inner + scale.px(15.0);
    for (label, bearing) in [("N", 0.0_f64), ("E", 90.0), ("W", 270.0)] {
        let rad = bearing.to_radians();
        let at = Point::new(center.x + label_radius * rad.sin(), center.y - label_radius * rad.cos());
        out.text(label, at, Align::Center, Baseline::Middle, font, Color::WHITE);
    }

    // Bearing 0 points up; clockwise positive.
    let rad = state.heading_deg.to_radians();
    let width = layout.needle_width();
    out.fill_polygon(needle(center, (rad.sin(), -rad.cos()), inner, width), NEEDLE, None);
    out.circle(center, width * 0.5, Some(NEEDLE), None);

    out.text(
        format!("{}°", whole_degrees(state.heading_deg)),
        Point::new(center.x, center.y + radius - scale.px(12.0)),
        Align::Center,
        Baseline::Middle,
        font,
        Color::WHITE,
    );
}

/// D-shaped pitch dial: the face is clipped to the half facing the needle's
/// 0° mark, plus a small indent past the center.
pub fn pitch_dial(out: &mut DrawList, state: &HudState, scale: ScaleFactor, canvas: Size) {
    let layout = dial_layout(scale, canvas);
    let center = layout.pitch_center;
    let radius = layout.radius;
    let inner = layout.inner_radius();
    let indent = scale.px(20.0);
    let clip = Rect::new(center.x - indent, center.y - radius, radius + indent, radius * 2.0);

    out.clipped(clip, |out| {
        out.circle(center, radius, Some(DIAL_FACE), None);
        out.circle(center, inner, None, Some(Stroke::new(Color::rgba(255, 255, 255, 100), scale.px_min(2.0, 1.0))));
    });

    out.line(
        center,
        Point::new(center.x + inner, center.y),
        Stroke::new(Color::rgba(255, 255, 255, 180), scale.px_min(2.0, 1.0)),
    );

    // 0° points right; positive pitch rotates the needle upward.
    let pitch = state.pitch_deg.clamp(-90.0, 90.0);
    let rad = pitch.to_radians();
    out.fill_polygon(needle(center, (rad.cos(), -rad.sin()), inner, layout.needle_width()), NEEDLE, None);
    out.circle(center, scale.px_min(4.0, 3.0), Some(NEEDLE), None);

    let font = small_font(scale);
    out.text(
        "0°",
        Point::new(center.x + inner + scale.px(15.0), center.y),
        Align::Center,
        Baseline::Middle,
        font,
        Color::WHITE,
    );
    out.text(
        format!("{}°", whole_degrees(pitch)),
        Point::new(center.x, center.y + radius - scale.px(12.0)),
        Align::Center,
        Baseline::Middle,
        font,
        Color::WHITE,
    );
}

// =============================================================
// Zoom and focus sliders
// =============================================================

/// One decorative peak of the zoom motif.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub center_x: f64,
    pub width: f64,
    pub height: f64,
    /// Added to the control point's height; negative sharpens the peak.
    pub control_offset: f64,
    pub outlined: bool,
}

/// Geometry shared by the zoom and focus sliders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLayout {
    pub panel: Rect,
    pub track_start: f64,
    pub track_end: f64,
    pub track_y: f64,
    /// Ground line of the peaks.
    pub base_y: f64,
    pub peaks: [Peak; 4],
    /// Top edge of the focus panel stacked under this one.
    pub focus_top: f64,
}

impl ZoomLayout {
    #[must_use]
    pub fn marker_x(&self, zoom_level: f64) -> f64 {
        self.track_start + zoom_level.clamp(0.0, 1.0) * (self.track_end - self.track_start)
    }
}

#[must_use]
pub fn zoom_layout(scale: ScaleFactor, canvas: Size) -> ZoomLayout {
    const SMALL: f64 = 0.7;
    const SIDE: f64 = 0.7;

    let margin = scale.px(50.0);
    let width = scale.px(200.0);
    let height = scale.px(70.0);
    let x = canvas.width - width - margin;
    let y = canvas.height - height - margin - scale.px(70.0);

    let big_w = scale.px(45.0);
    let big_h = scale.px(70.0);
    let small_offset = scale.px(4.0);
    let gap = scale.px(20.0);
    let pad = scale.px(15.0);

    // Tallest peak is the big one; the rest are scaled-down copies.
    let tallest = big_h;
    let panel_h = tallest + 2.0 * pad;
    let base_y = y + height - panel_h + pad + tallest;
    let track_y = base_y - scale.px(15.0);
    let panel_y = track_y - panel_h * 0.5;

    let right_peak_x = x + width - margin - big_w * 0.5 - gap;
    let track_end = right_peak_x - big_w * 0.5 - gap;
    let track_start = track_end - scale.px(180.0);

    let far_small_x = track_start - gap - big_w * SIDE * SMALL * 0.5;
    let far_big_x = far_small_x - (big_w * SIDE * 0.5 + small_offset * SIDE);
    let near_small_x = right_peak_x + big_w * 0.5 + small_offset;

    let side_pad = scale.px(15.0);
    let panel_x = far_small_x - big_w * SIDE * SMALL * 0.5 - margin - side_pad;
    let panel_w = right_peak_x + big_w * 0.5 + margin + side_pad - panel_x;

    let dip = scale.px(3.0);
    let sharpen = scale.px(-10.0);
    ZoomLayout {
        panel: Rect::new(panel_x, panel_y, panel_w, panel_h),
        track_start,
        track_end,
        track_y,
        base_y,
        peaks: [
            Peak { center_x: near_small_x, width: big_w * SMALL, height: big_h * SMALL, control_offset: dip, outlined: false },
            Peak { center_x: right_peak_x, width: big_w, height: big_h, control_offset: sharpen, outlined: true },
            Peak {
                center_x: far_small_x,
                width: big_w * SIDE * SMALL,
                height: big_h * SIDE * SMALL,
                control_offset: dip * SIDE,
                outlined: false,
            },
            Peak { center_x: far_big_x, width: big_w * SIDE, height: big_h * SIDE, control_offset: sharpen * SIDE, outlined: true },
        ],
        focus_top: panel_y + panel_h + scale.px(10.0),
    }
}

pub fn zoom_indicator(out: &mut DrawList, state: &HudState, scale: ScaleFactor, canvas: Size) {
    let layout = zoom_layout(scale, canvas);
    out.rounded_rect(layout.panel, scale.px(12.0), PANEL);

    let track_pen = Stroke::new(AXIS, 1.5);
    let y = layout.track_y;
    let tick = scale.px(10.0);
    out.line(Point::new(layout.track_start, y), Point::new(layout.track_end, y), track_pen);
    for x in [layout.track_start, layout.track_end] {
        out.line(Point::new(x, y - tick * 0.5), Point::new(x, y + tick * 0.5), track_pen);
    }

    let marker = layout.marker_x(state.zoom_level);
    out.line(Point::new(marker, y - tick), Point::new(marker, y + tick), Stroke::new(HANDLE, 4.0));

    let base = layout.base_y;
    for peak in layout.peaks {
        let left = Point::new(peak.center_x - peak.width * 0.5, base);
        let commands = vec![
            PathCommand::MoveTo { to: left },
            PathCommand::QuadTo {
                control: Point::new(peak.center_x, base - peak.height + peak.control_offset),
                to: Point::new(peak.center_x + peak.width * 0.5, base),
            },
            PathCommand::LineTo { to: left },
            PathCommand::Close,
        ];
        let outline = peak.outlined.then(|| Stroke::new(Color::rgba(0, 0, 0, 100), 2.0));
        out.path(commands, Some(Color::WHITE), outline);
    }
}

/// Geometry of the focus slider stacked below the zoom panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusLayout {
    pub panel: Rect,
    pub lens_center: Point,
    pub slider_start: f64,
    pub slider_width: f64,
    pub slider_y: f64,
}

impl FocusLayout {
    #[must_use]
    pub fn marker_x(&self, focus_level: f64) -> f64 {
        self.slider_start + focus_level.clamp(0.0, 1.0) * self.slider_width
    }

    /// x of the `index`-th distance label; labels are evenly spaced.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn label_x(&self, index: usize) -> f64 {
        let step = self.slider_width / (FOCUS_DISTANCES.len() - 1) as f64;
        self.slider_start + index as f64 * step
    }
}

#[must_use]
pub fn focus_layout(scale: ScaleFactor, canvas: Size) -> FocusLayout {
    let zoom = zoom_layout(scale, canvas);
    let panel = Rect::new(zoom.panel.x, zoom.focus_top, zoom.panel.width, scale.px(40.0));
    FocusLayout {
        panel,
        lens_center: Point::new(panel.x + scale.px(25.0), panel.y + panel.height * 0.5),
        slider_start: panel.x + scale.px(50.0),
        slider_width: panel.width - scale.px(70.0),
        slider_y: panel.bottom() - scale.px(12.0),
    }
}

pub fn focus_indicator(out: &mut DrawList, state: &HudState, scale: ScaleFactor, canvas: Size) {
    let layout = focus_layout(scale, canvas);
    let panel = layout.panel;
    out.rounded_rect(panel, scale.px(8.0), FOCUS_PANEL);

    let lens = layout.lens_center;
    out.circle(lens, scale.px(12.0), Some(Color::rgba(255, 255, 255, 200)), None);
    out.circle(lens, scale.px(8.0), Some(Color::rgb(80, 80, 80)), None);
    out.circle(lens, scale.px(3.0), Some(Color::rgb(120, 120, 120)), None);

    let tick_pen = Stroke::new(AXIS, 1.0);
    let tick_top = panel.bottom() - scale.px(15.0);
    let tick_bottom = tick_top + scale.px(7.0);
    let label_y = panel.y + scale.px(12.5);
    let font = small_font(scale);
    for (i, distance) in FOCUS_DISTANCES.iter().enumerate() {
        let x = layout.label_x(i);
        out.line(Point::new(x, tick_top), Point::new(x, tick_bottom), tick_pen);
        out.text(distance.to_string(), Point::new(x, label_y), Align::Center, Baseline::Middle, font, AXIS);
    }

    out.line(
        Point::new(layout.slider_start, layout.slider_y),
        Point::new(layout.slider_start + layout.slider_width, layout.slider_y),
        Stroke::new(TRACK, 2.0),
    );

    let handle = Point::new(layout.marker_x(state.focus_level), layout.slider_y);
    out.circle(handle, scale.px(6.0), Some(HANDLE), Some(Stroke::new(Color::WHITE, 2.0)));
}

// =============================================================
// Crosshair
// =============================================================

/// Four bars around canvas center. Ignores `state`.
pub fn crosshair(out: &mut DrawList, _state: &HudState, scale: ScaleFactor, canvas: Size) {
    let c = canvas.center();
    let length = scale.px(250.0);
    let thickness = scale.px(4.0);
    let gap = scale.px(60.0);
    let half = thickness * 0.5;
    let pen = Some(Stroke::new(Color::WHITE, 1.0));

    for bar in [
        Rect::new(c.x - gap - length, c.y - half, length, thickness),
        Rect::new(c.x + gap, c.y - half, length, thickness),
        Rect::new(c.x - half, c.y - gap - length, thickness, length),
        Rect::new(c.x - half, c.y + gap, thickness, length),
    ] {
        out.rect(bar, None, pen);
    }
}

// =============================================================
// Empty-frame banner
// =============================================================

/// Message shown when the current frame has no detections.
pub const NO_DETECTION_MESSAGE: &str = "No object detected";

/// Translucent banner 220 reference pixels above canvas center.
pub fn no_detection_banner(out: &mut DrawList, scale: ScaleFactor, canvas: Size, metrics: &dyn TextMetrics) {
    let font = Font::regular(scale.px_min(12.0, 6.0));
    let text_w = metrics.width(NO_DETECTION_MESSAGE, font);
    let text_h = metrics.line_height(font);
    let center = canvas.center().offset(0.0, -scale.px(220.0));
    let pad = scale.px(10.0);
    out.rect(Rect::centered(center, text_w + 2.0 * pad, text_h + 2.0 * pad), Some(BANNER), None);
    out.text(NO_DETECTION_MESSAGE, center, Align::Center, Baseline::Middle, font, Color::WHITE);
}

// =============================================================
// Helpers
// =============================================================

fn small_font(scale: ScaleFactor) -> Font {
    Font::regular(scale.px_min(8.0, 1.0))
}

/// Truncated whole-degree readout; never prints `-0`.
#[must_use]
pub fn whole_degrees(deg: f64) -> String {
    format!("{:.0}", deg.trunc() + 0.0)
}
