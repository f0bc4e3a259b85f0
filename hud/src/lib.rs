//! Auto-framing and HUD-state engine for a tracked-object video overlay.
//!
//! Each tick takes the current frame's detections and produces: the
//! camera-like HUD state (heading, pitch, zoom, focus) derived from the
//! selected target, the translation that keeps that target at frame center,
//! and an ordered list of vector drawing primitives for the gauges, status bar,
//! boxes and labels. Frame acquisition and detection are external
//! collaborators reached through the traits in [`pipeline`]; rasterizing the
//! primitives is left to the host.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`pipeline`] | Tick scheduler over the frame source and detector collaborators |
//! | [`engine`] | Per-tick [`engine::EngineCore`], zoom inset, FPS counter |
//! | [`framing`] | Auto-framing controller and the bbox → HUD state derivations |
//! | [`render`] | Overlay gauges (heading tape, pitch ladder, dials, sliders, crosshair) |
//! | [`status_bar`] | Top status bar with vision status and Motion/FPS readouts |
//! | [`annotate`] | Box and label placement plus the label cache |
//! | [`draw`] | Drawing primitives and text metrics |
//! | [`scale`] | Responsive scale factor |
//! | [`coords`] | Frame / canvas / screen coordinate mapping |
//! | [`detect`] | Detection result contract |
//! | [`frame`] | Frame buffers: translate, crop, resize, channel order |
//! | [`hit`] | Hit-testing against drawn boxes |
//! | [`input`] | Pointer and command input model |
//! | [`consts`] | Shared numeric constants (reference layout, calibration, etc.) |

pub mod annotate;
pub mod consts;
pub mod coords;
pub mod detect;
pub mod draw;
pub mod engine;
pub mod frame;
pub mod framing;
pub mod hit;
pub mod input;
pub mod pipeline;
pub mod render;
pub mod scale;
pub mod status_bar;
