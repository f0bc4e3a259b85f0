//! Packed 8-bit, 3-channel frame buffers and the operations the pipeline
//! applies to them: re-centering translation, inset crop and resize, and
//! channel-order conversion.

#[cfg(test)]
#[path = "frame_test.rs"]
mod frame_test;

use serde::{Deserialize, Serialize};

use crate::coords::{Rect, Size};
use crate::framing::Offset;

const CHANNELS: usize = 3;

/// Error returned by [`FrameBuffer::new`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FrameError {
    /// The byte buffer does not hold exactly `width * height` packed pixels.
    #[error("frame buffer holds {actual} bytes, expected {expected} for {width}x{height}")]
    LengthMismatch { width: u32, height: u32, expected: usize, actual: usize },
}

/// Channel order of a packed pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelLayout {
    #[default]
    Bgr,
    Rgb,
}

/// Row-major packed pixels, three bytes each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    layout: PixelLayout,
    data: Vec<u8>,
}

impl FrameBuffer {
    /// Wrap `data` as a `width`×`height` frame.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::LengthMismatch`] if `data.len()` is not
    /// `width * height * 3`.
    pub fn new(width: u32, height: u32, layout: PixelLayout, data: Vec<u8>) -> Result<Self, FrameError> {
        let expected = byte_len(width, height);
        if data.len() != expected {
            return Err(FrameError::LengthMismatch { width, height, expected, actual: data.len() });
        }
        Ok(Self { width, height, layout, data })
    }

    /// A frame with every pixel set to `pixel`.
    #[must_use]
    pub fn filled(width: u32, height: u32, layout: PixelLayout, pixel: [u8; 3]) -> Self {
        let data = pixel.iter().copied().cycle().take(byte_len(width, height)).collect();
        Self { width, height, layout, data }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Frame dimensions as a [`Size`].
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Pixel at `(x, y)` in the frame's own channel order.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.index(x as usize, y as usize);
        Some([self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    fn index(&self, x: usize, y: usize) -> usize {
        (y * self.width as usize + x) * CHANNELS
    }

    /// Shift the whole image by the rounded `offset`. Pixels shifted in from
    /// outside the frame are black.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn translate(&self, offset: Offset) -> Self {
        let w = i64::from(self.width);
        let h = i64::from(self.height);
        // A shift of a full frame or more already blanks it; clamping keeps
        // the arithmetic below in range for huge offsets.
        let dx = (offset.dx.round() as i64).clamp(-w, w);
        let dy = (offset.dy.round() as i64).clamp(-h, h);
        let mut out = Self::filled(self.width, self.height, self.layout, [0, 0, 0]);
        if dx == 0 && dy == 0 {
            out.data.clone_from(&self.data);
            return out;
        }

        // Destination columns that receive source pixels.
        let dst_x0 = dx.clamp(0, w);
        let dst_x1 = (w + dx).clamp(0, w);
        if dst_x0 >= dst_x1 {
            return out;
        }
        let span = (dst_x1 - dst_x0) as usize * CHANNELS;
        let src_x0 = (dst_x0 - dx) as usize;

        for y in 0..h {
            let src_y = y - dy;
            if !(0..h).contains(&src_y) {
                continue;
            }
            let src = self.index(src_x0, src_y as usize);
            let dst = out.index(dst_x0 as usize, y as usize);
            out.data[dst..dst + span].copy_from_slice(&self.data[src..src + span]);
        }
        out
    }

    /// Copy out the integer pixel window covered by `rect`, clamped to the
    /// frame. Returns `None` when nothing of the window lies inside.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn crop(&self, rect: Rect) -> Option<Self> {
        let w = f64::from(self.width);
        let h = f64::from(self.height);
        let x0 = rect.x.floor().clamp(0.0, w);
        let y0 = rect.y.floor().clamp(0.0, h);
        let x1 = rect.right().floor().clamp(0.0, w);
        let y1 = rect.bottom().floor().clamp(0.0, h);
        if x1 <= x0 || y1 <= y0 || x0.is_nan() || y0.is_nan() {
            return None;
        }

        let (x0, y0) = (x0 as usize, y0 as usize);
        let (cw, ch) = ((x1 as usize) - x0, (y1 as usize) - y0);
        let mut data = Vec::with_capacity(cw * ch * CHANNELS);
        for y in y0..y0 + ch {
            let start = self.index(x0, y);
            data.extend_from_slice(&self.data[start..start + cw * CHANNELS]);
        }
        Some(Self { width: cw as u32, height: ch as u32, layout: self.layout, data })
    }

    /// Nearest-neighbour resample to `width`×`height`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn resize(&self, width: u32, height: u32) -> Self {
        if self.width == 0 || self.height == 0 {
            return Self::filled(width, height, self.layout, [0, 0, 0]);
        }
        let mut data = Vec::with_capacity(byte_len(width, height));
        for y in 0..height {
            let sy = (u64::from(y) * u64::from(self.height) / u64::from(height.max(1))) as usize;
            for x in 0..width {
                let sx = (u64::from(x) * u64::from(self.width) / u64::from(width.max(1))) as usize;
                let i = self.index(sx, sy);
                data.extend_from_slice(&self.data[i..i + CHANNELS]);
            }
        }
        Self { width, height, layout: self.layout, data }
    }

    /// Reorder channels into `layout`. No-op when already in that order.
    #[must_use]
    pub fn to_layout(mut self, layout: PixelLayout) -> Self {
        if self.layout != layout {
            for px in self.data.chunks_exact_mut(CHANNELS) {
                px.swap(0, 2);
            }
            self.layout = layout;
        }
        self
    }

    /// Bytes per row.
    #[must_use]
    pub fn stride(&self) -> usize {
        self.width as usize * CHANNELS
    }
}

fn byte_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * CHANNELS
}
