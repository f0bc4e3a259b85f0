//! Frame pipeline: the scheduler-facing wrapper around [`EngineCore`].
//!
//! DESIGN
//! ======
//! A [`Pipeline`] owns the two external collaborators, a [`FrameSource`] and a
//! [`Detector`], plus the engine. The caller drives it from a periodic tick;
//! each `tick_at` runs acquire → detect → update → re-center → paint to
//! completion before returning. Pausing stops the per-tick work and leaves all
//! state as it was, so resuming continues where it stopped.
//!
//! ERROR HANDLING
//! ==============
//! Nothing halts the pipeline. End-of-stream seeks back to the start, a
//! transient read failure skips the tick, and a detector failure is treated as
//! an empty detection set.

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod pipeline_test;

use std::time::Instant;

use tracing::{info, warn};

use crate::detect::Detection;
use crate::engine::{EngineCore, FrameOutput};
use crate::frame::FrameBuffer;
use crate::input::{Command, PointerEvent, SelectionChange};

// =============================================================================
// COLLABORATORS
// =============================================================================

/// Error from a [`FrameSource`].
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SourceError {
    /// No more frames; distinct from a failed read.
    #[error("end of stream")]
    EndOfStream,
    /// A single read failed; the next one may succeed.
    #[error("frame read failed: {0}")]
    Read(String),
    #[error("seek to start failed: {0}")]
    Seek(String),
}

impl SourceError {
    /// Whether the next tick may succeed without intervention.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Read(_))
    }
}

/// Error from a [`Detector`].
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum DetectError {
    #[error("inference failed: {0}")]
    Inference(String),
}

/// Produces frames at a steady cadence.
pub trait FrameSource {
    /// Read the next frame.
    ///
    /// # Errors
    ///
    /// [`SourceError::EndOfStream`] when exhausted, [`SourceError::Read`] on a
    /// transient failure.
    fn read(&mut self) -> Result<FrameBuffer, SourceError>;

    /// Rewind to the first frame.
    ///
    /// # Errors
    ///
    /// [`SourceError::Seek`] if the source cannot rewind.
    fn seek_to_start(&mut self) -> Result<(), SourceError>;
}

/// Produces this frame's detections. An empty result is not an error.
pub trait Detector {
    /// Run detection on `frame`.
    ///
    /// # Errors
    ///
    /// [`DetectError::Inference`] if the detector fails on this frame.
    fn detect(&mut self, frame: &FrameBuffer) -> Result<Vec<Detection>, DetectError>;
}

// =============================================================================
// PIPELINE
// =============================================================================

/// Everything produced by a rendered tick.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFrame {
    /// Frame translated by the re-centering offset.
    pub frame: FrameBuffer,
    /// Inset pixels, cropped from the un-shifted frame and sized to the inset.
    pub inset: Option<FrameBuffer>,
    pub detections: Vec<Detection>,
    pub output: FrameOutput,
}

/// Result of one [`Pipeline::tick_at`].
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Paused; nothing ran.
    Paused,
    /// The source ended and was rewound; no frame this tick.
    Rewound,
    /// The read (or rewind) failed; no frame this tick.
    Skipped,
    Rendered(Box<RenderedFrame>),
}

pub struct Pipeline<S, D> {
    source: S,
    detector: D,
    engine: EngineCore,
    paused: bool,
}

impl<S: FrameSource, D: Detector> Pipeline<S, D> {
    #[must_use]
    pub fn new(source: S, detector: D, engine: EngineCore) -> Self {
        Self { source, detector, engine, paused: false }
    }

    #[must_use]
    pub fn engine(&self) -> &EngineCore {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut EngineCore {
        &mut self.engine
    }

    // --- Pause ---

    pub fn pause(&mut self) {
        if !self.paused {
            info!("pipeline paused");
        }
        self.paused = true;
    }

    pub fn resume(&mut self) {
        if self.paused {
            info!("pipeline resumed");
        }
        self.paused = false;
    }

    /// Flip the paused flag; returns the new value.
    pub fn toggle_pause(&mut self) -> bool {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
        self.paused
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    // --- Input ---

    pub fn on_pointer_down(&mut self, event: PointerEvent) -> SelectionChange {
        self.engine.on_pointer_down(event)
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::TogglePause => {
                self.toggle_pause();
            }
            Command::ToggleInset => {
                let visible = self.engine.toggle_inset();
                info!(visible, "zoom inset toggled");
            }
        }
    }

    // --- Tick ---

    /// Run one frame through the pipeline.
    pub fn tick_at(&mut self, now: Instant) -> TickOutcome {
        if self.paused {
            return TickOutcome::Paused;
        }

        let frame = match self.source.read() {
            Ok(frame) => frame,
            Err(SourceError::EndOfStream) => {
                return match self.source.seek_to_start() {
                    Ok(()) => {
                        info!(frames = self.engine.frame_index(), "end of stream; rewinding");
                        TickOutcome::Rewound
                    }
                    Err(e) => {
                        warn!(error = %e, "rewind failed");
                        TickOutcome::Skipped
                    }
                };
            }
            Err(e) => {
                warn!(error = %e, retryable = e.retryable(), "frame read failed; skipping tick");
                return TickOutcome::Skipped;
            }
        };

        let detections = self.detector.detect(&frame).unwrap_or_else(|e| {
            warn!(error = %e, "detector failed; treating frame as empty");
            Vec::new()
        });

        let output = self.engine.tick_at(&detections, frame.size(), now);
        let inset = output.inset.as_ref().and_then(|inset| {
            let crop = frame.crop(inset.crop)?;
            let (w, h) = pixel_size(inset.placement.width, inset.placement.height);
            Some(crop.resize(w, h))
        });
        let shifted = frame.translate(output.offset);

        TickOutcome::Rendered(Box::new(RenderedFrame { frame: shifted, inset, detections, output }))
    }
}

/// Whole-pixel size of at least 1×1.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn pixel_size(width: f64, height: f64) -> (u32, u32) {
    let px = |v: f64| if v.is_finite() { v.round().clamp(1.0, f64::from(u32::MAX)) as u32 } else { 1 };
    (px(width), px(height))
}
