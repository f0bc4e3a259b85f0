//! Drawing primitives: the rendering-surface contract.
//!
//! Renderers never touch a rasterizer. They append [`Primitive`]s to a
//! [`DrawList`] in paint order, sized in canvas pixels; a backend replays the
//! list onto whatever 2D surface it owns. Primitives serialize as tagged JSON
//! objects (`{"op": "line", ...}`) so a host in another process can consume them.

#[cfg(test)]
#[path = "draw_test.rs"]
mod draw_test;

use serde::Serialize;

use crate::coords::{Point, Rect};

/// RGBA color, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
}

/// Outline pen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

impl Stroke {
    #[must_use]
    pub fn new(color: Color, width: f64) -> Self {
        Self { color, width }
    }
}

/// Horizontal text alignment relative to the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Vertical text alignment relative to the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Baseline {
    Top,
    Middle,
    Bottom,
}

/// Font description for [`Primitive::Text`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Font {
    pub size_px: f64,
    pub bold: bool,
}

impl Font {
    #[must_use]
    pub fn regular(size_px: f64) -> Self {
        Self { size_px, bold: false }
    }

    #[must_use]
    pub fn bold(size_px: f64) -> Self {
        Self { size_px, bold: true }
    }
}

/// One segment of a [`Primitive::Path`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PathCommand {
    MoveTo { to: Point },
    LineTo { to: Point },
    QuadTo { control: Point, to: Point },
    Close,
}

/// A single drawing instruction in canvas pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Primitive {
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
    },
    /// Closed outline.
    Polygon {
        points: Vec<Point>,
        stroke: Stroke,
    },
    /// Closed filled shape, optionally outlined.
    FilledPolygon {
        points: Vec<Point>,
        fill: Color,
        stroke: Option<Stroke>,
    },
    /// Axis-aligned rectangle with optional rounded corners.
    Rect {
        rect: Rect,
        corner_radius: f64,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    /// Circular arc; angles in degrees, counter-clockwise from +x.
    /// A 360° sweep is a full circle and is filled when `fill` is set.
    Arc {
        center: Point,
        radius: f64,
        start_deg: f64,
        sweep_deg: f64,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    Path {
        commands: Vec<PathCommand>,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    Text {
        text: String,
        anchor: Point,
        align: Align,
        baseline: Baseline,
        font: Font,
        color: Color,
    },
    /// Intersect the clip region with `rect` until the matching `PopClip`.
    PushClip {
        rect: Rect,
    },
    PopClip,
}

/// Ordered list of primitives for one paint pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DrawList {
    items: Vec<Primitive>,
}

impl DrawList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, primitive: Primitive) {
        self.items.push(primitive);
    }

    pub fn extend(&mut self, other: DrawList) {
        self.items.extend(other.items);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Primitive> {
        self.items.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Primitive] {
        &self.items
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Primitive> {
        self.items
    }

    // --- Builders ---

    pub fn line(&mut self, from: Point, to: Point, stroke: Stroke) {
        self.push(Primitive::Line { from, to, stroke });
    }

    pub fn polygon(&mut self, points: Vec<Point>, stroke: Stroke) {
        self.push(Primitive::Polygon { points, stroke });
    }

    pub fn fill_polygon(&mut self, points: Vec<Point>, fill: Color, stroke: Option<Stroke>) {
        self.push(Primitive::FilledPolygon { points, fill, stroke });
    }

    pub fn rect(&mut self, rect: Rect, fill: Option<Color>, stroke: Option<Stroke>) {
        self.push(Primitive::Rect { rect, corner_radius: 0.0, fill, stroke });
    }

    pub fn rounded_rect(&mut self, rect: Rect, corner_radius: f64, fill: Color) {
        self.push(Primitive::Rect { rect, corner_radius, fill: Some(fill), stroke: None });
    }

    pub fn circle(&mut self, center: Point, radius: f64, fill: Option<Color>, stroke: Option<Stroke>) {
        self.push(Primitive::Arc { center, radius, start_deg: 0.0, sweep_deg: 360.0, fill, stroke });
    }

    pub fn path(&mut self, commands: Vec<PathCommand>, fill: Option<Color>, stroke: Option<Stroke>) {
        self.push(Primitive::Path { commands, fill, stroke });
    }

    pub fn text(&mut self, text: impl Into<String>, anchor: Point, align: Align, baseline: Baseline, font: Font, color: Color) {
        self.push(Primitive::Text { text: text.into(), anchor, align, baseline, font, color });
    }

    /// Run `paint` with the clip region narrowed to `rect`.
    pub fn clipped(&mut self, rect: Rect, paint: impl FnOnce(&mut Self)) {
        self.push(Primitive::PushClip { rect });
        paint(self);
        self.push(Primitive::PopClip);
    }

    /// Serialize the list as a JSON array.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if any primitive fails to serialize.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

// =============================================================
// Text measurement
// =============================================================

/// Text measurement supplied by the backend that will rasterize the list.
pub trait TextMetrics {
    /// Advance width of `text` in pixels.
    fn width(&self, text: &str, font: Font) -> f64;

    /// Line height in pixels.
    fn line_height(&self, font: Font) -> f64;
}

/// Backend-free estimate: every glyph advances a fixed fraction of the em.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproxMetrics {
    /// Average advance per character, as a fraction of the font size.
    pub advance_em: f64,
    /// Line height as a multiple of the font size.
    pub line_height_em: f64,
}

impl Default for ApproxMetrics {
    fn default() -> Self {
        Self { advance_em: 0.6, line_height_em: 1.2 }
    }
}

impl TextMetrics for ApproxMetrics {
    #[allow(clippy::cast_precision_loss)]
    fn width(&self, text: &str, font: Font) -> f64 {
        let glyphs = text.chars().count() as f64;
        let weight = if font.bold { 1.05 } else { 1.0 };
        glyphs * font.size_px * self.advance_em * weight
    }

    fn line_height(&self, font: Font) -> f64 {
        font.size_px * self.line_height_em
    }
}
