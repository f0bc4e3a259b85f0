#![allow(clippy::float_cmp)]

use super::*;
use crate::draw::{ApproxMetrics, Primitive};

const EPSILON: f64 = 1e-9;
const CANVAS: Size = Size { width: 1920.0, height: 1080.0 };

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn state(heading: f64, pitch: f64, zoom: f64, focus: f64) -> HudState {
    HudState { heading_deg: heading, pitch_deg: pitch, zoom_level: zoom, focus_level: focus }
}

fn unit() -> ScaleFactor {
    scale::overlay(CANVAS)
}

fn texts(list: &DrawList) -> Vec<String> {
    list.iter()
        .filter_map(|p| match p {
            Primitive::Text { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

fn polygons(list: &DrawList) -> Vec<Vec<Point>> {
    list.iter()
        .filter_map(|p| match p {
            Primitive::FilledPolygon { points, .. } => Some(points.clone()),
            _ => None,
        })
        .collect()
}

// =============================================================
// Heading tape
// =============================================================

#[test]
fn heading_labels_are_multiples_of_ten_in_range() {
    for heading in [0.0, 5.0, 123.4, 359.0] {
        let mut out = DrawList::new();
        heading_tape(&mut out, &state(heading, 0.0, 0.5, 0.5), unit(), CANVAS);
        let labels = texts(&out);
        // Last text is the readout.
        let (readout, ticks) = labels.split_last().expect("readout");
        assert_eq!(readout, &whole_degrees(heading));
        assert!(!ticks.is_empty());
        for label in ticks {
            let deg: i64 = label.parse().expect("numeric label");
            assert_eq!(deg % 10, 0, "{label}");
            assert!((0..360).contains(&deg), "{label}");
        }
    }
}

#[test]
fn heading_tape_wraps_past_north() {
    let mut out = DrawList::new();
    heading_tape(&mut out, &state(5.0, 0.0, 0.5, 0.5), unit(), CANVAS);
    let labels = texts(&out);
    for expected in ["350", "0", "10"] {
        assert!(labels.iter().any(|l| l == expected), "missing {expected}");
    }
}

#[test]
fn heading_spacing_is_inverse_to_scale() {
    let reference = heading_tape_layout(unit(), CANVAS);
    assert!(approx_eq(reference.px_per_deg, 4.0));
    assert!(approx_eq(reference.visible_deg, 200.0));

    let half = heading_tape_layout(ScaleFactor::new(0.5), Size::new(960.0, 540.0));
    assert!(approx_eq(half.px_per_deg, 8.0));
    assert!(approx_eq(half.visible_deg, 50.0));
}

#[test]
fn heading_labels_at_half_scale_stay_on_ten_degree_marks() {
    let canvas = Size::new(960.0, 540.0);
    let mut out = DrawList::new();
    heading_tape(&mut out, &state(90.0, 0.0, 0.5, 0.5), scale::overlay(canvas), canvas);
    let labels = texts(&out);
    let (_, ticks) = labels.split_last().expect("readout");
    for expected in ["70", "90", "110"] {
        assert!(ticks.iter().any(|l| l == expected), "missing {expected}");
    }
    assert!(!ticks.iter().any(|l| l == "150"));
}

#[test]
fn heading_start_snaps_down_to_ten() {
    assert_eq!(heading_tape_start(5.0, 200.0), -100);
    assert_eq!(heading_tape_start(123.0, 200.0), 20);
    assert_eq!(heading_tape_start(0.0, 200.0), -100);
}

#[test]
fn heading_indicator_is_centered() {
    let mut out = DrawList::new();
    heading_tape(&mut out, &state(77.0, 0.0, 0.5, 0.5), unit(), CANVAS);
    let tri = polygons(&out).pop().expect("indicator");
    assert!(approx_eq(tri[0].x, CANVAS.width / 2.0));
    assert!(approx_eq(tri[1].x + tri[2].x, CANVAS.width));
}

#[test]
fn heading_ticks_are_clipped_to_panel() {
    let mut out = DrawList::new();
    heading_tape(&mut out, &state(200.0, 0.0, 0.5, 0.5), unit(), CANVAS);
    let panel = heading_tape_layout(unit(), CANVAS).panel;
    assert!(out.iter().any(|p| matches!(p, Primitive::PushClip { rect } if *rect == panel)));
    for p in out.iter() {
        if let Primitive::Line { from, .. } = p {
            assert!(from.x >= panel.x && from.x <= panel.right());
        }
    }
}

// =============================================================
// Pitch ladder
// =============================================================

#[test]
fn pitch_ladder_labels_only_ends_and_zero() {
    let mut out = DrawList::new();
    pitch_ladder(&mut out, &state(0.0, 12.0, 0.5, 0.5), unit(), CANVAS);
    let labels = texts(&out);
    assert_eq!(labels, vec!["-90", "0", "90", "12"]);
}

#[test]
fn pitch_indicator_tracks_pitch() {
    let layout = pitch_ladder_layout(unit(), CANVAS);
    assert!(approx_eq(layout.y_for(0.0), CANVAS.height / 2.0));
    assert!(approx_eq(layout.y_for(90.0), layout.top_y));
    assert!(approx_eq(layout.y_for(-90.0), layout.top_y + layout.span));

    let mut out = DrawList::new();
    pitch_ladder(&mut out, &state(0.0, 45.0, 0.5, 0.5), unit(), CANVAS);
    let tri = polygons(&out).pop().expect("indicator");
    assert!(approx_eq(tri[0].y, layout.y_for(45.0)));
}

// =============================================================
// Dials
// =============================================================

#[test]
fn compass_needle_points_along_heading() {
    let layout = dial_layout(unit(), CANVAS);
    let c = layout.compass_center;
    let inner = layout.inner_radius();

    let mut out = DrawList::new();
    compass_dial(&mut out, &state(90.0, 0.0, 0.5, 0.5), unit(), CANVAS);
    let tip = polygons(&out)[0][0];
    assert!(approx_eq(tip.x, c.x + inner));
    assert!(approx_eq(tip.y, c.y));

    let mut out = DrawList::new();
    compass_dial(&mut out, &state(0.0, 0.0, 0.5, 0.5), unit(), CANVAS);
    let tip = polygons(&out)[0][0];
    assert!(approx_eq(tip.x, c.x));
    assert!(approx_eq(tip.y, c.y - inner));
}

#[test]
fn compass_shows_cardinals_and_readout() {
    let mut out = DrawList::new();
    compass_dial(&mut out, &state(271.9, 0.0, 0.5, 0.5), unit(), CANVAS);
    assert_eq!(texts(&out), vec!["N", "E", "W", "271°"]);
}

#[test]
fn pitch_dial_is_clipped_to_d_shape() {
    let layout = dial_layout(unit(), CANVAS);
    let mut out = DrawList::new();
    pitch_dial(&mut out, &state(0.0, 30.0, 0.5, 0.5), unit(), CANVAS);
    let clip = out
        .iter()
        .find_map(|p| match p {
            Primitive::PushClip { rect } => Some(*rect),
            _ => None,
        })
        .expect("clip");
    assert!(approx_eq(clip.width, layout.radius + 20.0));
    assert!(approx_eq(clip.x, layout.pitch_center.x - 20.0));
}

#[test]
fn pitch_dial_needle_rises_with_pitch() {
    let layout = dial_layout(unit(), CANVAS);
    let mut out = DrawList::new();
    pitch_dial(&mut out, &state(0.0, 90.0, 0.5, 0.5), unit(), CANVAS);
    let tip = polygons(&out)[0][0];
    assert!(approx_eq(tip.x, layout.pitch_center.x));
    assert!(approx_eq(tip.y, layout.pitch_center.y - layout.inner_radius()));
}

// =============================================================
// Zoom / focus
// =============================================================

#[test]
fn zoom_marker_sits_at_level_fraction() {
    let layout = zoom_layout(unit(), CANVAS);
    assert!(approx_eq(layout.marker_x(0.0), layout.track_start));
    assert!(approx_eq(layout.marker_x(1.0), layout.track_end));
    let quarter = layout.track_start + 0.25 * (layout.track_end - layout.track_start);
    assert!(approx_eq(layout.marker_x(0.25), quarter));

    let mut out = DrawList::new();
    zoom_indicator(&mut out, &state(0.0, 0.0, 0.25, 0.5), unit(), CANVAS);
    let handle = out.iter().find_map(|p| match p {
        Primitive::Line { from, stroke, .. } if stroke.width == 4.0 => Some(*from),
        _ => None,
    });
    assert!(approx_eq(handle.expect("handle").x, quarter));
}

#[test]
fn zoom_draws_four_peaks_two_outlined() {
    let mut out = DrawList::new();
    zoom_indicator(&mut out, &HudState::default(), unit(), CANVAS);
    let paths: Vec<_> = out
        .iter()
        .filter_map(|p| match p {
            Primitive::Path { stroke, .. } => Some(stroke.is_some()),
            _ => None,
        })
        .collect();
    assert_eq!(paths, vec![false, true, false, true]);
}

#[test]
fn zoom_panel_stays_on_canvas() {
    let panel = zoom_layout(unit(), CANVAS).panel;
    assert!(panel.x > 0.0 && panel.right() < CANVAS.width);
    assert!(panel.y > 0.0 && panel.bottom() < CANVAS.height);
}

#[test]
fn focus_emits_six_distance_labels() {
    let mut out = DrawList::new();
    focus_indicator(&mut out, &HudState::default(), unit(), CANVAS);
    assert_eq!(texts(&out), vec!["20", "40", "100", "300", "800", "2000"]);
}

#[test]
fn focus_handle_sits_at_level_fraction() {
    let layout = focus_layout(unit(), CANVAS);
    assert!(approx_eq(layout.label_x(0), layout.slider_start));
    assert!(approx_eq(layout.label_x(5), layout.slider_start + layout.slider_width));

    let mut out = DrawList::new();
    focus_indicator(&mut out, &state(0.0, 0.0, 0.5, 0.8), unit(), CANVAS);
    let handle = out
        .iter()
        .filter_map(|p| match p {
            Primitive::Arc { center, .. } => Some(*center),
            _ => None,
        })
        .last()
        .expect("handle");
    assert!(approx_eq(handle.x, layout.slider_start + 0.8 * layout.slider_width));
}

#[test]
fn focus_panel_sits_below_zoom_panel() {
    let zoom = zoom_layout(unit(), CANVAS);
    let focus = focus_layout(unit(), CANVAS);
    assert!(focus.panel.y > zoom.panel.bottom());
    assert_eq!(focus.panel.x, zoom.panel.x);
}

// =============================================================
// Crosshair
// =============================================================

#[test]
fn crosshair_is_centered() {
    let mut out = DrawList::new();
    crosshair(&mut out, &HudState::default(), unit(), CANVAS);
    let rects: Vec<Rect> = out
        .iter()
        .filter_map(|p| match p {
            Primitive::Rect { rect, .. } => Some(*rect),
            _ => None,
        })
        .collect();
    assert_eq!(rects.len(), 4);
    let left = rects.iter().map(|r| r.x).fold(f64::INFINITY, f64::min);
    let right = rects.iter().map(|r| r.right()).fold(f64::NEG_INFINITY, f64::max);
    let top = rects.iter().map(|r| r.y).fold(f64::INFINITY, f64::min);
    let bottom = rects.iter().map(|r| r.bottom()).fold(f64::NEG_INFINITY, f64::max);
    assert!(approx_eq((left + right) / 2.0, 960.0));
    assert!(approx_eq((top + bottom) / 2.0, 540.0));
    for r in &rects {
        assert!(!r.contains(CANVAS.center()));
    }
}

// =============================================================
// Whole overlay
// =============================================================

#[test]
fn overlay_scales_proportionally() {
    let s = state(42.0, -10.0, 0.3, 0.6);
    let rects = |list: &DrawList| -> Vec<Rect> {
        list.iter()
            .filter_map(|p| match p {
                Primitive::Rect { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect()
    };
    let full = rects(&paint(&s, CANVAS));
    let half = rects(&paint(&s, Size::new(960.0, 540.0)));
    assert_eq!(full.len(), half.len());
    for (a, b) in full.iter().zip(half.iter()) {
        assert!(approx_eq(a.x / 2.0, b.x));
        assert!(approx_eq(a.width / 2.0, b.width));
    }
}

#[test]
fn overlay_clips_are_balanced() {
    let out = paint(&HudState::default(), CANVAS);
    let mut depth = 0_i32;
    for p in out.iter() {
        match p {
            Primitive::PushClip { .. } => depth += 1,
            Primitive::PopClip => depth -= 1,
            _ => {}
        }
        assert!(depth >= 0);
    }
    assert_eq!(depth, 0);
}

#[test]
fn overlay_survives_degenerate_canvas() {
    let out = paint(&HudState::default(), Size::new(0.0, 0.0));
    assert!(!out.is_empty());
}

// =============================================================
// Banner / readouts
// =============================================================

#[test]
fn banner_sits_above_center() {
    let mut out = DrawList::new();
    no_detection_banner(&mut out, unit(), CANVAS, &ApproxMetrics::default());
    let anchor = out
        .iter()
        .find_map(|p| match p {
            Primitive::Text { text, anchor, .. } if text == NO_DETECTION_MESSAGE => Some(*anchor),
            _ => None,
        })
        .expect("banner text");
    assert_eq!(anchor, Point::new(960.0, 320.0));
}

#[test]
fn whole_degrees_never_prints_negative_zero() {
    assert_eq!(whole_degrees(-0.4), "0");
    assert_eq!(whole_degrees(-0.0), "0");
    assert_eq!(whole_degrees(-12.9), "-12");
    assert_eq!(whole_degrees(359.99), "359");
}
