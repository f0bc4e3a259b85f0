mod config;
mod sim;

use std::time::{Duration, Instant};

use hud::coords::Point;
use hud::engine::{EngineCore, FrameOutput};
use hud::pipeline::{Pipeline, TickOutcome};
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::sim::{OrbitDetector, ReplayDetector, SimDetector, SyntheticSource};

const SUMMARY_INTERVAL: Duration = Duration::from_secs(1);

/// Tick outcome tallies since the last summary line.
#[derive(Debug, Default)]
struct TickStats {
    rendered: u64,
    rewound: u64,
    skipped: u64,
    paused: u64,
}

impl TickStats {
    fn record(&mut self, outcome: &TickOutcome) {
        match outcome {
            TickOutcome::Rendered(_) => self.rendered += 1,
            TickOutcome::Rewound => self.rewound += 1,
            TickOutcome::Skipped => self.skipped += 1,
            TickOutcome::Paused => self.paused += 1,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(2);
        }
    };

    let detector = match &config.detections {
        Some(path) => match ReplayDetector::from_path(path) {
            Ok(replay) => {
                info!(path = %path.display(), frames = replay.frame_count(), "replaying detections");
                SimDetector::Replay(replay)
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "replay load failed");
                std::process::exit(1);
            }
        },
        None => SimDetector::Orbit(OrbitDetector::new()),
    };
    let source = SyntheticSource::new(config.frame_width, config.frame_height, config.stream_frames);

    let mut engine = EngineCore::new(config.engine_config());
    engine.set_viewport(Point::new(0.0, 0.0), config.canvas);
    engine.select_target(config.selected_id);
    let mut pipeline = Pipeline::new(source, detector, engine);

    let last = run(&mut pipeline, &config).await;

    if let (Some(path), Some(output)) = (&config.dump_path, last) {
        match serde_json::to_string_pretty(&output.hud) {
            Ok(json) => match tokio::fs::write(path, json).await {
                Ok(()) => info!(path = %path.display(), primitives = output.hud.len(), "draw list written"),
                Err(e) => error!(path = %path.display(), error = %e, "draw list write failed"),
            },
            Err(e) => error!(error = %e, "draw list serialization failed"),
        }
    }
}

/// Drive the pipeline until Ctrl-C or the tick limit; returns the last
/// rendered output.
async fn run(pipeline: &mut Pipeline<SyntheticSource, SimDetector>, config: &AppConfig) -> Option<FrameOutput> {
    let mut interval = tokio::time::interval(config.tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!(
        tick_ms = config.tick.as_millis(),
        canvas_w = config.canvas.width,
        canvas_h = config.canvas.height,
        selected = ?config.selected_id,
        "dronehud running"
    );

    let mut last: Option<FrameOutput> = None;
    let mut stats = TickStats::default();
    let mut ticks: u64 = 0;
    let mut last_summary = Instant::now();

    loop {
        let now = tokio::select! {
            tick = interval.tick() => tick.into_std(),
            signal = &mut shutdown => {
                if let Err(e) = signal {
                    warn!(error = %e, "ctrl-c listener failed");
                }
                info!(ticks, "shutdown requested");
                break;
            }
        };

        let outcome = pipeline.tick_at(now);
        stats.record(&outcome);
        if let TickOutcome::Rendered(frame) = outcome {
            last = Some(frame.output);
        }
        ticks += 1;

        if now.saturating_duration_since(last_summary) >= SUMMARY_INTERVAL {
            if let Some(out) = &last {
                info!(
                    frame = out.frame_index,
                    fps = out.status.fps,
                    vision = %out.status.vision,
                    target = ?out.target,
                    heading = out.state.heading_deg,
                    pitch = out.state.pitch_deg,
                    zoom = out.state.zoom_level,
                    labels = out.labels.len(),
                    rendered = stats.rendered,
                    rewound = stats.rewound,
                    skipped = stats.skipped,
                    paused = stats.paused,
                    "hud summary"
                );
            }
            stats = TickStats::default();
            last_summary = now;
        }

        if config.max_ticks > 0 && ticks >= config.max_ticks {
            info!(ticks, "tick limit reached");
            break;
        }
    }

    last
}
