#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;
const FRAME: Size = Size { width: 1920.0, height: 1080.0 };

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn drone(id: DetectionId, x: f64, y: f64, w: f64, h: f64) -> Detection {
    Detection::new(id, Rect::new(x, y, w, h), 90.0, "drone")
}

fn tracking(id: DetectionId) -> AutoFramingController {
    let mut c = AutoFramingController::default();
    c.select_target(Some(id));
    c
}

// =============================================================
// HudState
// =============================================================

#[test]
fn default_state_is_neutral() {
    let s = HudState::default();
    assert_eq!(s.heading_deg, 0.0);
    assert_eq!(s.pitch_deg, 0.0);
    assert_eq!(s.zoom_level, 0.5);
    assert_eq!(s.focus_level, 0.5);
}

// =============================================================
// Ratio rule
// =============================================================

#[test]
fn ratio_at_or_below_min_is_zero() {
    for ratio in [0.0, 0.0001, MIN_AREA_RATIO] {
        assert_eq!(zoom_focus_from_ratio(ratio, MIN_AREA_RATIO, MAX_AREA_RATIO), (0.0, 0.0), "{ratio}");
    }
}

#[test]
fn ratio_at_or_above_max_is_one() {
    for ratio in [MAX_AREA_RATIO, 0.02, 1.0, 50.0] {
        assert_eq!(zoom_focus_from_ratio(ratio, MIN_AREA_RATIO, MAX_AREA_RATIO), (1.0, 1.0), "{ratio}");
    }
}

#[test]
fn ratio_between_is_linear_and_equal() {
    let mid = (MIN_AREA_RATIO + MAX_AREA_RATIO) / 2.0;
    let (zoom, focus) = zoom_focus_from_ratio(mid, MIN_AREA_RATIO, MAX_AREA_RATIO);
    assert_eq!(zoom, focus);
    assert!(approx_eq(zoom, 0.5));
}

#[test]
fn ratio_rule_is_monotonic() {
    let mut last = -1.0;
    for i in 0..=200 {
        let ratio = f64::from(i) * 0.0001;
        let (zoom, focus) = zoom_focus_from_ratio(ratio, MIN_AREA_RATIO, MAX_AREA_RATIO);
        assert_eq!(zoom, focus);
        assert!(zoom >= last, "ratio {ratio} went backwards");
        last = zoom;
    }
}

#[test]
fn ratio_rule_nan_is_far() {
    assert_eq!(zoom_focus_from_ratio(f64::NAN, MIN_AREA_RATIO, MAX_AREA_RATIO), (0.0, 0.0));
}

// =============================================================
// Area rule
// =============================================================

#[test]
fn area_rule_saturates() {
    assert!(approx_eq(zoom_from_area(40_000.0, ZOOM_SATURATION_AREA), 0.5));
    assert_eq!(zoom_from_area(160_000.0, ZOOM_SATURATION_AREA), 1.0);
    assert_eq!(zoom_from_area(0.0, ZOOM_SATURATION_AREA), 0.0);
    assert_eq!(zoom_from_area(10.0, 0.0), 1.0);
}

// =============================================================
// Heading / pitch
// =============================================================

#[test]
fn heading_always_in_range() {
    for i in -50..=250 {
        let cx = f64::from(i) * 10.0;
        let h = heading_from_center(cx, 1920.0);
        assert!((0.0..360.0).contains(&h), "cx {cx} -> {h}");
        assert!(h.is_sign_positive());
    }
}

#[test]
fn heading_edges() {
    assert_eq!(heading_from_center(0.0, 1920.0), 0.0);
    assert_eq!(heading_from_center(1920.0, 1920.0), 0.0);
    assert_eq!(heading_from_center(960.0, 1920.0), 180.0);
    assert_eq!(heading_from_center(480.0, 1920.0), 90.0);
}

#[test]
fn heading_rounds_to_whole_degrees() {
    // 0.7 / 1920 * 360 = 0.13 -> 0; 10 / 1920 * 360 = 1.875 -> 2
    assert_eq!(heading_from_center(0.7, 1920.0), 0.0);
    assert_eq!(heading_from_center(10.0, 1920.0), 2.0);
}

#[test]
fn heading_with_zero_width_frame_is_finite() {
    let h = heading_from_center(5.0, 0.0);
    assert!((0.0..360.0).contains(&h));
}

#[test]
fn normalize_heading_wraps_negatives_and_large_values() {
    assert_eq!(normalize_heading(-90.0), 270.0);
    assert_eq!(normalize_heading(720.0), 0.0);
    assert_eq!(normalize_heading(365.0), 5.0);
    assert_eq!(normalize_heading(-1e-20), 0.0);
    assert!(normalize_heading(-0.0).is_sign_positive());
}

#[test]
fn pitch_edges() {
    assert_eq!(pitch_from_center(0.0, 1080.0), 90.0);
    assert_eq!(pitch_from_center(1080.0, 1080.0), -90.0);
    assert_eq!(pitch_from_center(540.0, 1080.0), 0.0);
}

#[test]
fn pitch_clamps_outside_frame() {
    assert_eq!(pitch_from_center(-500.0, 1080.0), 90.0);
    assert_eq!(pitch_from_center(5000.0, 1080.0), -90.0);
}

#[test]
fn pitch_with_degenerate_frame_stays_in_range() {
    let p = pitch_from_center(10.0, 0.0);
    assert!((-90.0..=90.0).contains(&p));
}

// =============================================================
// Re-centering
// =============================================================

#[test]
fn recenter_offset_round_trips_to_frame_center() {
    for &(x, y) in &[(0.0, 0.0), (100.5, 900.25), (1920.0, 1080.0), (-40.0, 2000.0)] {
        let center = Point::new(x, y);
        let moved = recenter_offset(center, FRAME).apply(center);
        assert_eq!(moved, FRAME.center());
    }
}

// =============================================================
// Mutators
// =============================================================

#[test]
fn mutators_clamp_and_wrap() {
    let mut c = AutoFramingController::default();
    c.set_heading(-30.0);
    c.set_pitch(120.0);
    c.set_zoom_level(1.7);
    c.set_focus_level(-0.2);
    let s = c.state();
    assert_eq!(s.heading_deg, 330.0);
    assert_eq!(s.pitch_deg, 90.0);
    assert_eq!(s.zoom_level, 1.0);
    assert_eq!(s.focus_level, 0.0);
}

#[test]
fn mutators_ignore_nan() {
    let mut c = AutoFramingController::default();
    c.set_heading(45.0);
    c.set_heading(f64::NAN);
    c.set_pitch(f64::NAN);
    c.set_zoom_level(f64::NAN);
    c.set_focus_level(f64::NAN);
    let s = c.state();
    assert_eq!(s.heading_deg, 45.0);
    assert_eq!(s, HudState { heading_deg: 45.0, ..HudState::default() });
}

#[test]
fn auto_adjust_is_idempotent() {
    let mut c = AutoFramingController::default();
    c.auto_adjust_zoom_focus(Size::new(80.0, 60.0), FRAME);
    let first = c.state();
    c.auto_adjust_zoom_focus(Size::new(80.0, 60.0), FRAME);
    assert_eq!(c.state(), first);
    assert_eq!(first.zoom_level, first.focus_level);
}

#[test]
fn auto_adjust_zero_frame_does_not_fault() {
    let mut c = AutoFramingController::default();
    c.auto_adjust_zoom_focus(Size::new(10.0, 10.0), Size::new(0.0, 0.0));
    assert_eq!(c.state().zoom_level, 1.0);
}

// =============================================================
// update()
// =============================================================

#[test]
fn update_reference_scenario() {
    let mut c = tracking(1);
    let out = c.update(&[drone(1, 860.0, 440.0, 200.0, 200.0)], FRAME);
    let s = c.state();
    assert_eq!(s.zoom_level, 1.0);
    assert_eq!(s.focus_level, 1.0);
    assert_eq!(s.heading_deg, 180.0);
    assert_eq!(s.pitch_deg, 0.0);
    assert_eq!(out.offset, Offset::ZERO);
    assert_eq!(out.target, Some(1));
}

#[test]
fn update_box_at_origin() {
    let mut c = tracking(4);
    let out = c.update(&[drone(4, -10.0, -10.0, 20.0, 20.0)], FRAME);
    let s = c.state();
    assert_eq!(s.heading_deg, 0.0);
    assert_eq!(s.pitch_deg, 90.0);
    assert_eq!(out.offset, Offset::new(960.0, 540.0));
}

#[test]
fn update_without_detections_holds_state() {
    let mut c = tracking(1);
    c.set_heading(270.0);
    let before = c.state();
    let out = c.update(&[], FRAME);
    assert_eq!(c.state(), before);
    assert_eq!(c.state().heading_deg, 270.0);
    assert_eq!(out.offset, Offset::ZERO);
    assert_eq!(out.target, None);
}

#[test]
fn stale_selection_behaves_as_no_target() {
    let mut c = tracking(9);
    c.set_pitch(-20.0);
    let before = c.state();
    let out = c.update(&[drone(1, 0.0, 0.0, 50.0, 50.0)], FRAME);
    assert_eq!(c.state(), before);
    assert_eq!(out, FramingUpdate::default());
}

#[test]
fn no_selection_ignores_detections() {
    let mut c = AutoFramingController::default();
    let out = c.update(&[drone(1, 0.0, 0.0, 500.0, 500.0)], FRAME);
    assert_eq!(c.state(), HudState::default());
    assert_eq!(out.target, None);
}

#[test]
fn ratio_rule_overrides_area_rule() {
    // Area 4900 -> area rule 0.061; ratio 0.00236 -> (0.00236-0.0005)/0.0088.
    let mut c = tracking(1);
    c.update(&[drone(1, 100.0, 100.0, 70.0, 70.0)], FRAME);
    let ratio = 4900.0 / FRAME.area();
    let expected = (ratio - MIN_AREA_RATIO) / (MAX_AREA_RATIO - MIN_AREA_RATIO);
    assert!(approx_eq(c.state().zoom_level, expected));
    assert!(approx_eq(c.state().focus_level, expected));
}

#[test]
fn update_with_zero_frame_does_not_fault() {
    let mut c = tracking(1);
    let out = c.update(&[drone(1, 0.0, 0.0, 10.0, 10.0)], Size::new(0.0, 0.0));
    let s = c.state();
    assert!((0.0..360.0).contains(&s.heading_deg));
    assert!((-90.0..=90.0).contains(&s.pitch_deg));
    assert!(out.offset.dx.is_finite() && out.offset.dy.is_finite());
}

#[test]
fn selecting_none_clears() {
    let mut c = tracking(3);
    c.select_target(None);
    assert_eq!(c.selection(), None);
}

// =============================================================
// Inset window
// =============================================================

#[test]
fn inset_window_pads_around_center() {
    let w = inset_window(Rect::new(100.0, 100.0, 40.0, 20.0), FRAME).expect("window");
    assert_eq!(w, Rect::new(90.0, 95.0, 60.0, 30.0));
}

#[test]
fn inset_window_clamps_to_frame() {
    let w = inset_window(Rect::new(-10.0, -10.0, 40.0, 40.0), FRAME).expect("window");
    assert_eq!(w.x, 0.0);
    assert_eq!(w.y, 0.0);
    let w = inset_window(Rect::new(1900.0, 1070.0, 40.0, 40.0), FRAME).expect("window");
    assert_eq!(w.right(), 1920.0);
    assert_eq!(w.bottom(), 1080.0);
}

#[test]
fn inset_window_outside_frame_is_none() {
    assert!(inset_window(Rect::new(3000.0, 10.0, 20.0, 20.0), FRAME).is_none());
    assert!(inset_window(Rect::new(10.0, 10.0, 0.0, 20.0), FRAME).is_none());
}
