use std::collections::HashSet;

use hud::frame::PixelLayout;

use super::*;

fn frame(width: u32, height: u32) -> FrameBuffer {
    FrameBuffer::filled(width, height, PixelLayout::Bgr, [0, 0, 0])
}

// =============================================================
// SyntheticSource
// =============================================================

#[test]
fn source_yields_frames_then_end_of_stream() {
    let mut source = SyntheticSource::new(8, 4, 2);
    let first = source.read().unwrap();
    assert_eq!((first.width(), first.height()), (8, 4));
    assert_eq!(first.layout(), PixelLayout::Bgr);
    assert!(source.read().is_ok());
    assert_eq!(source.read().unwrap_err(), SourceError::EndOfStream);
}

#[test]
fn source_rewinds_to_first_frame() {
    let mut source = SyntheticSource::new(8, 4, 3);
    let first = source.read().unwrap();
    source.read().unwrap();
    source.seek_to_start().unwrap();
    assert_eq!(source.cursor, 0);
    assert_eq!(source.read().unwrap(), first);
}

#[test]
fn source_draws_gradient() {
    let mut source = SyntheticSource::new(16, 8, 1);
    let f = source.read().unwrap();
    let [left_b, top_g, _] = f.pixel(0, 0).unwrap();
    let [right_b, bottom_g, _] = f.pixel(15, 7).unwrap();
    assert_eq!((left_b, top_g), (0, 0));
    assert!(right_b > 200);
    assert!(bottom_g > 200);
}

#[test]
fn empty_source_ends_immediately() {
    let mut source = SyntheticSource::new(8, 4, 0);
    assert_eq!(source.read().unwrap_err(), SourceError::EndOfStream);
}

// =============================================================
// OrbitDetector
// =============================================================

#[test]
fn orbit_always_reports_primary_track() {
    let mut detector = OrbitDetector::new();
    let f = frame(1280, 720);
    for _ in 0..200 {
        let dets = detector.detect(&f).unwrap();
        let drone = dets.iter().find(|d| d.id == 1).expect("track 1");
        assert_eq!(drone.kind, "drone");
        assert!(drone.bbox.width > 0.0 && drone.bbox.height > 0.0);
        assert!((0.0..=100.0).contains(&drone.confidence));
    }
}

#[test]
fn orbit_secondary_track_blinks() {
    let mut detector = OrbitDetector::new();
    let f = frame(1280, 720);
    let presence: Vec<bool> =
        (0..BLINK_PERIOD * 2).map(|_| detector.detect(&f).unwrap().iter().any(|d| d.id == 2)).collect();
    let first_period = usize::try_from(BLINK_PERIOD).unwrap();
    assert!(presence[..first_period].iter().all(|p| *p));
    assert!(presence[first_period..].iter().all(|p| !*p));
}

#[test]
fn orbit_moves_between_frames() {
    let mut detector = OrbitDetector::new();
    let f = frame(1280, 720);
    let a = detector.detect(&f).unwrap()[0].bbox;
    let b = detector.detect(&f).unwrap()[0].bbox;
    assert_ne!(a, b);
}

// =============================================================
// ReplayDetector
// =============================================================

const REPLAY: &str = r#"
[{"id": 1, "bbox": {"x": 10, "y": 20, "width": 30, "height": 40}, "confidence": 90.0, "type": "drone"}]

[]
[{"id": 3, "bbox": {"x": 0, "y": 0, "width": 5, "height": 5}, "confidence": 50.0, "type": "bird"}]
"#;

#[test]
fn replay_parses_one_frame_per_line() {
    let replay = ReplayDetector::parse(REPLAY).unwrap();
    assert_eq!(replay.frame_count(), 3);
}

#[test]
fn replay_cycles_through_frames() {
    let mut replay = ReplayDetector::parse(REPLAY).unwrap();
    let f = frame(4, 4);
    let ids: Vec<Vec<i64>> =
        (0..4).map(|_| replay.detect(&f).unwrap().iter().map(|d| d.id).collect()).collect();
    assert_eq!(ids, vec![vec![1], vec![], vec![3], vec![1]]);
}

#[test]
fn replay_keeps_type_field() {
    let mut replay = ReplayDetector::parse(REPLAY).unwrap();
    let f = frame(4, 4);
    replay.detect(&f).unwrap();
    replay.detect(&f).unwrap();
    let kinds: HashSet<String> = replay.detect(&f).unwrap().into_iter().map(|d| d.kind).collect();
    assert!(kinds.contains("bird"));
}

#[test]
fn replay_rejects_malformed_line() {
    let err = ReplayDetector::parse("[{\"id\": 1}]").unwrap_err();
    assert!(matches!(err, ReplayError::Json(_)));
}

#[test]
fn replay_rejects_empty_file() {
    assert!(matches!(ReplayDetector::parse("\n  \n").unwrap_err(), ReplayError::Empty));
}

#[test]
fn replay_missing_file_is_io_error() {
    let err = ReplayDetector::from_path(Path::new("/nonexistent/dronehud/replay.jsonl")).unwrap_err();
    assert!(matches!(err, ReplayError::Io(_)));
}

#[test]
fn sim_detector_dispatches() {
    let mut detector = SimDetector::Replay(ReplayDetector::parse(REPLAY).unwrap());
    assert_eq!(detector.detect(&frame(4, 4)).unwrap()[0].id, 1);
    let mut detector = SimDetector::Orbit(OrbitDetector::new());
    assert_eq!(detector.detect(&frame(4, 4)).unwrap()[0].id, 1);
}
