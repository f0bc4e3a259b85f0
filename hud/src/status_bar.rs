//! Status bar: the strip across the top of the canvas.
//!
//! A centered trapezoid carries the vision status; flat borders slope down into
//! it from both canvas edges. Motion and FPS readouts sit at the right edge,
//! just under the strip. Unlike the overlay gauges, the status bar scales by
//! width only against a 1200 px reference and never grows past native size.

#[cfg(test)]
#[path = "status_bar_test.rs"]
mod status_bar_test;

use std::fmt;

use serde::Serialize;

use crate::consts::NAV_BAR_HEIGHT;
use crate::coords::{Point, Rect, Size};
use crate::draw::{Align, Baseline, Color, DrawList, Font, Stroke, TextMetrics};
use crate::scale::{self, ScaleFactor};

const HEADER_BAND: Color = Color::rgba(0, 0, 0, 100);
const TRAPEZOID: Color = Color::rgba(100, 100, 100, 150);
const STATUS_TEXT: Color = Color::rgb(255, 165, 0);
const READOUT_PANEL: Color = Color::rgba(100, 100, 100, 150);
const MOTION_VALUE: Color = Color::rgb(0, 255, 255);
const FPS_VALUE: Color = Color::rgb(0, 255, 0);

/// What the vision system is doing this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum VisionStatus {
    /// Nothing detected.
    #[default]
    Standby,
    /// The selected target is in frame.
    Tracking,
    /// Detections present, none of them selected.
    Detecting,
}

impl VisionStatus {
    /// Derive the status from this frame's detection set.
    #[must_use]
    pub fn classify(has_detections: bool, selection_present: bool) -> Self {
        match (has_detections, selection_present) {
            (false, _) => Self::Standby,
            (true, true) => Self::Tracking,
            (true, false) => Self::Detecting,
        }
    }
}

impl fmt::Display for VisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Standby => "Standby",
            Self::Tracking => "Tracking",
            Self::Detecting => "Detecting",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum MotionMode {
    Autonomous,
    #[default]
    Standby,
}

impl MotionMode {
    #[must_use]
    pub fn from_detections(has_detections: bool) -> Self {
        if has_detections { Self::Autonomous } else { Self::Standby }
    }
}

impl fmt::Display for MotionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Autonomous => "Autonomous",
            Self::Standby => "Standby",
        })
    }
}

/// Values shown by the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatusReadout {
    pub vision: VisionStatus,
    pub motion: MotionMode,
    pub fps: u32,
}

/// Geometry of the trapezoid and its side borders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusBarLayout {
    pub scale: ScaleFactor,
    /// Top-left, top-right, bottom-right, bottom-left.
    pub trapezoid: [Point; 4],
    /// Length of each flat border segment before it slopes down.
    pub flat_length: f64,
    pub slope_width: f64,
    pub pen_width: f64,
}

impl StatusBarLayout {
    #[must_use]
    pub fn top(&self) -> f64 {
        self.trapezoid[0].y
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.trapezoid[2].y
    }
}

#[must_use]
pub fn layout(canvas_width: f64) -> StatusBarLayout {
    let scale = scale::status_bar(canvas_width);
    let margin_top = scale.px(30.0);
    let height = scale.px(50.0);
    let top_width = scale.px(250.0);
    let inset = scale.px(30.0);
    let slope_width = scale.px(30.0);
    let cx = canvas_width * 0.5;
    let half = top_width * 0.5;

    StatusBarLayout {
        scale,
        trapezoid: [
            Point::new(cx - half, margin_top),
            Point::new(cx + half, margin_top),
            Point::new(cx + half - inset, margin_top + height),
            Point::new(cx - half + inset, margin_top + height),
        ],
        flat_length: (canvas_width - (top_width + 2.0 * slope_width)) * 0.5,
        slope_width,
        pen_width: (3.0 * scale.get()).trunc().max(2.0),
    }
}

/// Draw the status bar for `readout` across the top of `canvas`.
#[must_use]
pub fn paint(readout: &StatusReadout, canvas: Size, metrics: &dyn TextMetrics) -> DrawList {
    let geo = layout(canvas.width);
    let s = geo.scale;
    let mut out = DrawList::new();

    out.rect(Rect::new(0.0, 0.0, canvas.width, geo.bottom()), Some(HEADER_BAND), None);

    let pen = Stroke::new(Color::WHITE, geo.pen_width);
    out.fill_polygon(geo.trapezoid.to_vec(), TRAPEZOID, Some(pen));

    let w = canvas.width;
    let (top, bottom) = (geo.top(), geo.bottom());
    let flat = geo.flat_length;
    out.line(Point::new(0.0, top), Point::new(flat, top), pen);
    out.line(Point::new(flat, top), Point::new(flat + geo.slope_width, bottom), pen);
    out.line(Point::new(w - flat - geo.slope_width, bottom), Point::new(w - flat, top), pen);
    out.line(Point::new(w - flat, top), Point::new(w, top), pen);

    let cx = w * 0.5;
    out.text(
        readout.vision.to_string(),
        Point::new(cx, top + s.px(5.0)),
        Align::Center,
        Baseline::Top,
        Font::regular(s.px(12.0).trunc().max(8.0)),
        STATUS_TEXT,
    );
    out.text(
        "vision",
        Point::new(cx, bottom - s.px(5.0)),
        Align::Center,
        Baseline::Bottom,
        Font::regular(s.px(10.0).trunc().max(6.0)),
        Color::WHITE,
    );

    readouts(&mut out, readout, canvas, metrics);
    out
}

/// Boxes holding the Motion and FPS readouts, right-aligned under the strip.
#[must_use]
pub fn readout_boxes(canvas: Size, font_px: f64) -> (Rect, Rect) {
    let motion_w = (canvas.width * 0.12).trunc();
    let fps_w = (canvas.width * 0.07).trunc();
    let y = NAV_BAR_HEIGHT - 30.0;
    let h = font_px * 1.2 + 8.0;
    (
        Rect::new(canvas.width - motion_w - fps_w - 30.0, y, motion_w, h),
        Rect::new(canvas.width - fps_w - 10.0, y, fps_w, h),
    )
}

/// Readout font: one 40th of the canvas height, kept within 8..=16 px.
#[must_use]
pub fn readout_font_px(canvas_height: f64) -> f64 {
    (canvas_height / 40.0).trunc().clamp(8.0, 16.0)
}

fn readouts(out: &mut DrawList, readout: &StatusReadout, canvas: Size, metrics: &dyn TextMetrics) {
    let font = Font::regular(readout_font_px(canvas.height));
    let (motion_box, fps_box) = readout_boxes(canvas, font.size_px);
    labeled_value(out, motion_box, "Motion:", &readout.motion.to_string(), MOTION_VALUE, font, metrics);
    labeled_value(out, fps_box, "FPS:", &readout.fps.to_string(), FPS_VALUE, font, metrics);
}

fn labeled_value(
    out: &mut DrawList,
    area: Rect,
    caption: &str,
    value: &str,
    value_color: Color,
    font: Font,
    metrics: &dyn TextMetrics,
) {
    const PAD: f64 = 4.0;
    out.rounded_rect(area, 10.0, READOUT_PANEL);
    let anchor = Point::new(area.x + PAD, area.center().y);
    out.text(caption, anchor, Align::Left, Baseline::Middle, font, Color::WHITE);
    let gap = metrics.width(" ", font);
    let value_x = anchor.x + metrics.width(caption, font) + gap;
    out.text(value, Point::new(value_x, anchor.y), Align::Left, Baseline::Middle, font, value_color);
}
