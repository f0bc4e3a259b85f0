//! Runner configuration parsed from `DRONEHUD_*` environment variables.
//!
//! Unparseable values fall back to their defaults, the way the rest of the
//! tuning knobs behave; only cross-field constraints are rejected.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use hud::annotate::LabelCacheConfig;
use hud::coords::Size;
use hud::detect::DetectionId;
use hud::engine::EngineConfig;
use hud::framing::FramingConfig;

pub const DEFAULT_TICK_MS: u64 = 33;
pub const DEFAULT_CANVAS_WIDTH: f64 = 1920.0;
pub const DEFAULT_CANVAS_HEIGHT: f64 = 1080.0;
pub const DEFAULT_FRAME_WIDTH: u32 = 1280;
pub const DEFAULT_FRAME_HEIGHT: u32 = 720;
pub const DEFAULT_STREAM_FRAMES: u64 = 300;
pub const DEFAULT_SELECTED_ID: DetectionId = 1;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("DRONEHUD_TICK_MS must be non-zero")]
    ZeroTick,
    #[error("{key} must be positive, got {value}")]
    NonPositive { key: &'static str, value: f64 },
    #[error("DRONEHUD_MIN_AREA_RATIO ({min}) must be below DRONEHUD_MAX_AREA_RATIO ({max})")]
    AreaRatioOrder { min: f64, max: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub tick: Duration,
    /// Canvas the overlay is painted for.
    pub canvas: Size,
    pub frame_width: u32,
    pub frame_height: u32,
    /// Synthetic frames per pass before the source rewinds.
    pub stream_frames: u64,
    /// Initial selection; `None` starts untracked.
    pub selected_id: Option<DetectionId>,
    /// Stop after this many ticks; 0 runs until Ctrl-C.
    pub max_ticks: u64,
    /// JSON-lines replay file; the orbit script runs when absent.
    pub detections: Option<PathBuf>,
    /// Where to write the last draw list on shutdown.
    pub dump_path: Option<PathBuf>,
    pub labels: LabelCacheConfig,
    pub framing: FramingConfig,
}

impl AppConfig {
    /// Build runner config from the process environment.
    ///
    /// Optional:
    /// - `DRONEHUD_TICK_MS`: default 33
    /// - `DRONEHUD_CANVAS_WIDTH` / `DRONEHUD_CANVAS_HEIGHT`: default 1920 / 1080
    /// - `DRONEHUD_FRAME_WIDTH` / `DRONEHUD_FRAME_HEIGHT`: default 1280 / 720
    /// - `DRONEHUD_STREAM_FRAMES`: default 300
    /// - `DRONEHUD_SELECTED_ID`: default 1; `none` starts without a selection
    /// - `DRONEHUD_MAX_TICKS`: default 0 (run until Ctrl-C)
    /// - `DRONEHUD_DETECTIONS`: replay file path
    /// - `DRONEHUD_DUMP_PATH`: draw-list dump path
    /// - `DRONEHUD_LABEL_CAPACITY`: default 64
    /// - `DRONEHUD_LABEL_EVICT_FRAMES`: default 90
    /// - `DRONEHUD_MIN_AREA_RATIO` / `DRONEHUD_MAX_AREA_RATIO`: default 0.0005 / 0.0093
    /// - `DRONEHUD_ZOOM_SATURATION_AREA`: default 80000
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the parsed values are inconsistent.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`], reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the parsed values are inconsistent.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let labels_default = LabelCacheConfig::default();
        let framing_default = FramingConfig::default();
        let env = Env(lookup);

        let config = Self {
            tick: Duration::from_millis(env.parse("DRONEHUD_TICK_MS", DEFAULT_TICK_MS)),
            canvas: Size::new(
                env.parse("DRONEHUD_CANVAS_WIDTH", DEFAULT_CANVAS_WIDTH),
                env.parse("DRONEHUD_CANVAS_HEIGHT", DEFAULT_CANVAS_HEIGHT),
            ),
            frame_width: env.parse("DRONEHUD_FRAME_WIDTH", DEFAULT_FRAME_WIDTH),
            frame_height: env.parse("DRONEHUD_FRAME_HEIGHT", DEFAULT_FRAME_HEIGHT),
            stream_frames: env.parse("DRONEHUD_STREAM_FRAMES", DEFAULT_STREAM_FRAMES),
            selected_id: parse_selection(env.raw("DRONEHUD_SELECTED_ID").as_deref()),
            max_ticks: env.parse("DRONEHUD_MAX_TICKS", 0),
            detections: env.path("DRONEHUD_DETECTIONS"),
            dump_path: env.path("DRONEHUD_DUMP_PATH"),
            labels: LabelCacheConfig {
                capacity: env.parse("DRONEHUD_LABEL_CAPACITY", labels_default.capacity),
                evict_after_frames: env.parse("DRONEHUD_LABEL_EVICT_FRAMES", labels_default.evict_after_frames),
            },
            framing: FramingConfig {
                zoom_saturation_area: env.parse("DRONEHUD_ZOOM_SATURATION_AREA", framing_default.zoom_saturation_area),
                min_area_ratio: env.parse("DRONEHUD_MIN_AREA_RATIO", framing_default.min_area_ratio),
                max_area_ratio: env.parse("DRONEHUD_MAX_AREA_RATIO", framing_default.max_area_ratio),
            },
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.tick.is_zero() {
            return Err(ConfigError::ZeroTick);
        }
        let positives = [
            ("DRONEHUD_CANVAS_WIDTH", self.canvas.width),
            ("DRONEHUD_CANVAS_HEIGHT", self.canvas.height),
            ("DRONEHUD_FRAME_WIDTH", f64::from(self.frame_width)),
            ("DRONEHUD_FRAME_HEIGHT", f64::from(self.frame_height)),
            ("DRONEHUD_ZOOM_SATURATION_AREA", self.framing.zoom_saturation_area),
        ];
        for (key, value) in positives {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NonPositive { key, value });
            }
        }
        let (min, max) = (self.framing.min_area_ratio, self.framing.max_area_ratio);
        if min.is_nan() || max.is_nan() || min >= max {
            return Err(ConfigError::AreaRatioOrder { min, max });
        }
        Ok(())
    }

    #[must_use]
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig { framing: self.framing, labels: self.labels, ..EngineConfig::default() }
    }
}

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    fn raw(&self, key: &str) -> Option<String> {
        (self.0)(key).map(|v| v.trim().to_string())
    }

    fn parse<T>(&self, key: &str, default: T) -> T
    where
        T: FromStr + Copy,
    {
        self.raw(key).and_then(|v| v.parse::<T>().ok()).unwrap_or(default)
    }

    fn path(&self, key: &str) -> Option<PathBuf> {
        self.raw(key).filter(|v| !v.is_empty()).map(PathBuf::from)
    }
}

fn parse_selection(raw: Option<&str>) -> Option<DetectionId> {
    match raw {
        None | Some("") => Some(DEFAULT_SELECTED_ID),
        Some(v) if v.eq_ignore_ascii_case("none") => None,
        Some(v) => Some(v.parse().unwrap_or(DEFAULT_SELECTED_ID)),
    }
}
