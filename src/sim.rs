//! Stand-in collaborators for running the HUD without a camera or a model.
//!
//! [`SyntheticSource`] renders gradient frames. [`OrbitDetector`] scripts a
//! drone circling the frame plus a second track that comes and goes, which
//! exercises selection, label hiding and label reuse. [`ReplayDetector`]
//! plays back recorded detections from a JSON-lines file instead.

#[cfg(test)]
#[path = "sim_test.rs"]
mod sim_test;

use std::path::Path;

use hud::coords::Rect;
use hud::detect::Detection;
use hud::frame::{FrameBuffer, PixelLayout};
use hud::pipeline::{DetectError, Detector, FrameSource, SourceError};

/// Frames of the intermittent track's on/off period.
const BLINK_PERIOD: u64 = 45;

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("replay file read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("replay line is not a detection array: {0}")]
    Json(#[from] serde_json::Error),
    #[error("replay file holds no frames")]
    Empty,
}

// =============================================================================
// FRAME SOURCE
// =============================================================================

/// A fixed-length stream of BGR gradient frames.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    width: u32,
    height: u32,
    frames: u64,
    cursor: u64,
}

impl SyntheticSource {
    #[must_use]
    pub fn new(width: u32, height: u32, frames: u64) -> Self {
        Self { width, height, frames, cursor: 0 }
    }

    /// Horizontal blue ramp, vertical green ramp, red pulsing with time.
    #[allow(clippy::cast_possible_truncation)]
    fn render(&self, index: u64) -> Vec<u8> {
        let (w, h) = (u64::from(self.width.max(1)), u64::from(self.height.max(1)));
        let red = ((index * 4) % 256) as u8;
        let mut data = Vec::with_capacity(self.width as usize * self.height as usize * 3);
        for y in 0..u64::from(self.height) {
            let green = (y * 255 / h) as u8;
            for x in 0..u64::from(self.width) {
                data.extend_from_slice(&[(x * 255 / w) as u8, green, red]);
            }
        }
        data
    }
}

impl FrameSource for SyntheticSource {
    fn read(&mut self) -> Result<FrameBuffer, SourceError> {
        if self.cursor >= self.frames {
            return Err(SourceError::EndOfStream);
        }
        let data = self.render(self.cursor);
        let frame = FrameBuffer::new(self.width, self.height, PixelLayout::Bgr, data)
            .map_err(|e| SourceError::Read(e.to_string()))?;
        self.cursor += 1;
        Ok(frame)
    }

    fn seek_to_start(&mut self) -> Result<(), SourceError> {
        self.cursor = 0;
        Ok(())
    }
}

// =============================================================================
// DETECTORS
// =============================================================================

/// Scripted detections: track 1 orbits the frame center on an ellipse while
/// its box slowly breathes; track 2 sweeps left to right and is present only
/// every other [`BLINK_PERIOD`] frames.
#[derive(Debug, Clone, Default)]
pub struct OrbitDetector {
    step: u64,
}

impl OrbitDetector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(clippy::cast_precision_loss)]
    fn script(&self, frame_w: f64, frame_h: f64) -> Vec<Detection> {
        let t = self.step as f64 * 0.02;
        let side = frame_h * (0.08 + 0.04 * (0.3 * t).sin());
        let (w, h) = (side * 1.2, side);
        let cx = frame_w / 2.0 + frame_w * 0.35 * t.cos();
        let cy = frame_h / 2.0 + frame_h * 0.3 * t.sin();
        let mut out = vec![Detection::new(1, Rect::new(cx - w / 2.0, cy - h / 2.0, w, h), 85.0 + 10.0 * t.sin(), "drone")];

        if (self.step / BLINK_PERIOD) % 2 == 0 {
            let x = (self.step as f64 * 7.0) % frame_w.max(1.0);
            out.push(Detection::new(2, Rect::new(x, frame_h * 0.2, side * 0.6, side * 0.5), 62.5, "drone"));
        }
        out
    }
}

impl Detector for OrbitDetector {
    fn detect(&mut self, frame: &FrameBuffer) -> Result<Vec<Detection>, DetectError> {
        let size = frame.size();
        let out = self.script(size.width, size.height);
        self.step += 1;
        Ok(out)
    }
}

/// Plays back one recorded detection array per frame, looping at the end.
#[derive(Debug, Clone)]
pub struct ReplayDetector {
    frames: Vec<Vec<Detection>>,
    cursor: usize,
}

impl ReplayDetector {
    /// Load a JSON-lines replay file.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError`] if the file cannot be read or parsed, or holds
    /// no frames.
    pub fn from_path(path: &Path) -> Result<Self, ReplayError> {
        Self::parse(&std::fs::read_to_string(path)?)
    }

    /// Parse replay text: one JSON array of detections per non-blank line.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::Json`] on the first malformed line and
    /// [`ReplayError::Empty`] when there are no lines.
    pub fn parse(text: &str) -> Result<Self, ReplayError> {
        let frames = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(serde_json::from_str::<Vec<Detection>>)
            .collect::<Result<Vec<_>, _>>()?;
        if frames.is_empty() {
            return Err(ReplayError::Empty);
        }
        Ok(Self { frames, cursor: 0 })
    }

    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

impl Detector for ReplayDetector {
    fn detect(&mut self, _frame: &FrameBuffer) -> Result<Vec<Detection>, DetectError> {
        let Some(frame) = self.frames.get(self.cursor) else {
            return Ok(Vec::new());
        };
        let out = frame.clone();
        self.cursor = (self.cursor + 1) % self.frames.len();
        Ok(out)
    }
}

/// Whichever detector the runner was configured with.
#[derive(Debug, Clone)]
pub enum SimDetector {
    Orbit(OrbitDetector),
    Replay(ReplayDetector),
}

impl Detector for SimDetector {
    fn detect(&mut self, frame: &FrameBuffer) -> Result<Vec<Detection>, DetectError> {
        match self {
            Self::Orbit(d) => d.detect(frame),
            Self::Replay(d) => d.detect(frame),
        }
    }
}
