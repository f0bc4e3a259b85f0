//! Coordinate spaces and the conversions between them.
//!
//! Three spaces are in play every frame:
//!
//! - **frame space**: pixels of the incoming video frame, where detections live;
//! - **canvas space**: pixels of the display surface after the frame has been
//!   fitted onto it (see [`FitMode`]);
//! - **screen space**: absolute pixels of the host surface, which may place the
//!   canvas at an offset.
//!
//! Every conversion is a pure function of explicit arguments. [`Fit`] captures
//! the frame→canvas affine map once so presentation, annotation, and pointer
//! hit-testing all share the exact same transform.

#[cfg(test)]
#[path = "coords_test.rs"]
mod coords_test;

use serde::{Deserialize, Serialize};

use crate::consts::SCALE_EPSILON;

/// A point in frame, canvas, or screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Return this point moved by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }
}

/// Width and height of a frame or canvas, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero, negative, or not a number.
    #[must_use]
    pub fn is_degenerate(self) -> bool {
        !(self.width > 0.0 && self.height > 0.0) || !self.width.is_finite() || !self.height.is_finite()
    }

    /// This size with each dimension floored at [`SCALE_EPSILON`].
    #[must_use]
    pub fn guarded(self) -> Self {
        Self { width: epsilon_floor(self.width), height: epsilon_floor(self.height) }
    }

    #[must_use]
    pub fn area(self) -> f64 {
        self.width * self.height
    }

    #[must_use]
    pub fn center(self) -> Point {
        Point::new(self.width * 0.5, self.height * 0.5)
    }
}

/// Substitute [`SCALE_EPSILON`] for zero, negative, or non-finite values.
#[must_use]
pub fn epsilon_floor(value: f64) -> f64 {
    if value.is_finite() && value > SCALE_EPSILON { value } else { SCALE_EPSILON }
}

/// Axis-aligned rectangle; `(x, y)` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Build a rectangle centered on `center`.
    #[must_use]
    pub fn centered(center: Point, width: f64, height: f64) -> Self {
        Self { x: center.x - width * 0.5, y: center.y - height * 0.5, width, height }
    }

    #[must_use]
    pub fn right(self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center(self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    #[must_use]
    pub fn area(self) -> f64 {
        self.width * self.height
    }

    /// Edge-inclusive containment test.
    #[must_use]
    pub fn contains(self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    #[must_use]
    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy, ..self }
    }
}

/// How a frame is fitted onto the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitMode {
    /// Uniform scale so the whole frame is visible, centered (letterboxed).
    #[default]
    Contain,
    /// Independent x/y scale so the frame fills the canvas exactly.
    Stretch,
}

/// The frame→canvas affine map for one frame size, canvas size, and mode.
///
/// `canvas = frame * scale + offset` per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fit {
    pub scale_x: f64,
    pub scale_y: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Fit {
    /// Compute the fit. Degenerate sizes are floored at [`SCALE_EPSILON`],
    /// so both scales are always strictly positive.
    #[must_use]
    pub fn new(frame: Size, canvas: Size, mode: FitMode) -> Self {
        let frame = frame.guarded();
        let canvas = canvas.guarded();
        match mode {
            FitMode::Contain => {
                let scale = (canvas.width / frame.width).min(canvas.height / frame.height);
                Self {
                    scale_x: scale,
                    scale_y: scale,
                    offset_x: (canvas.width - frame.width * scale) * 0.5,
                    offset_y: (canvas.height - frame.height * scale) * 0.5,
                }
            }
            FitMode::Stretch => Self {
                scale_x: canvas.width / frame.width,
                scale_y: canvas.height / frame.height,
                offset_x: 0.0,
                offset_y: 0.0,
            },
        }
    }

    #[must_use]
    pub fn frame_to_canvas(&self, p: Point) -> Point {
        Point::new(p.x * self.scale_x + self.offset_x, p.y * self.scale_y + self.offset_y)
    }

    /// Exact inverse of [`Fit::frame_to_canvas`].
    #[must_use]
    pub fn canvas_to_frame(&self, p: Point) -> Point {
        Point::new((p.x - self.offset_x) / self.scale_x, (p.y - self.offset_y) / self.scale_y)
    }

    #[must_use]
    pub fn frame_rect_to_canvas(&self, r: Rect) -> Rect {
        let origin = self.frame_to_canvas(Point::new(r.x, r.y));
        Rect::new(origin.x, origin.y, r.width * self.scale_x, r.height * self.scale_y)
    }
}

/// Map a frame-space point onto the canvas using the presentation fit.
#[must_use]
pub fn frame_to_canvas(point: Point, frame: Size, canvas: Size, mode: FitMode) -> Point {
    Fit::new(frame, canvas, mode).frame_to_canvas(point)
}

/// Map a canvas-space point to screen space given the canvas's screen origin.
#[must_use]
pub fn canvas_to_screen(point: Point, canvas_origin: Point) -> Point {
    Point::new(point.x + canvas_origin.x, point.y + canvas_origin.y)
}

/// Inverse of [`canvas_to_screen`].
#[must_use]
pub fn screen_to_canvas(point: Point, canvas_origin: Point) -> Point {
    Point::new(point.x - canvas_origin.x, point.y - canvas_origin.y)
}

/// Resolve a screen-space point (e.g. a click) back to frame space.
///
/// Composes [`screen_to_canvas`] with the inverse of the same [`Fit`] used by
/// [`frame_to_canvas`], so what is hit is exactly what is drawn.
#[must_use]
pub fn screen_to_frame(point: Point, canvas_origin: Point, frame: Size, canvas: Size, mode: FitMode) -> Point {
    Fit::new(frame, canvas, mode).canvas_to_frame(screen_to_canvas(point, canvas_origin))
}
