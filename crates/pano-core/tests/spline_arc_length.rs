//! Integration tests: canvas points → spline samples → arc-length readouts.
//!
//! Exercises `SplineInterpolator` together with the arc helpers the way a
//! render pass does: sample once, then measure along the samples.

use pano_core::{
    PlaneTransform, Point, Point3, SplineInterpolator, ViewportTransform, arc_midpoint,
    nearest_sample_index, polyline_length, sample_span_length, scale_or_unit,
};

fn pts(raw: &[(f64, f64)]) -> Vec<Point> {
    raw.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

fn rigid(points: &[Point], angle: f64, dx: f64, dy: f64) -> Vec<Point> {
    let (s, c) = angle.sin_cos();
    points
        .iter()
        .map(|p| Point::new(c * p.x - s * p.y + dx, s * p.x + c * p.y + dy))
        .collect()
}

// ─── Interpolation ──────────────────────────────────────────────────────

#[test]
fn control_points_sit_on_segment_boundaries() {
    let controls = pts(&[(10.0, 10.0), (50.0, 10.0), (50.0, 50.0), (90.0, 70.0)]);
    for res in [1, 4, 12, 20] {
        let spline = SplineInterpolator::new(res);
        let samples = spline.sample(&controls);
        assert_eq!(samples.len(), (controls.len() - 1) * res + 1);
        for (k, &control) in controls.iter().enumerate() {
            assert_eq!(samples[spline.control_sample_index(k)], control, "res {res}, k {k}");
        }
    }
}

#[test]
fn nearest_sample_finds_each_handle() {
    let controls = pts(&[(10.0, 10.0), (50.0, 10.0), (50.0, 50.0)]);
    let spline = SplineInterpolator::default();
    let samples = spline.sample(&controls);
    for (k, &control) in controls.iter().enumerate() {
        assert_eq!(
            nearest_sample_index(&samples, control),
            Some(spline.control_sample_index(k))
        );
    }
}

// ─── Arc length ─────────────────────────────────────────────────────────

#[test]
fn curved_path_is_longer_than_its_chords() {
    let controls = pts(&[(10.0, 10.0), (50.0, 10.0), (50.0, 50.0)]);
    let samples = SplineInterpolator::default().sample(&controls);
    let chords = polyline_length(&controls);
    let arc = polyline_length(&samples);
    assert!(arc > chords, "arc {arc} vs chords {chords}");
    assert!(arc < chords * 1.1, "arc {arc} vs chords {chords}");

    let first_half = sample_span_length(&samples, 0, 12);
    let second_half = sample_span_length(&samples, 24, 12);
    assert!((first_half + second_half - arc).abs() < 1e-9);
}

#[test]
fn length_survives_rigid_motion() {
    let controls = pts(&[(0.0, 0.0), (40.0, 5.0), (70.0, 60.0), (20.0, 90.0)]);
    let spline = SplineInterpolator::default();
    let base = polyline_length(&spline.sample(&controls));
    for (angle, dx, dy) in [(0.3, 10.0, -4.0), (2.0, -150.0, 75.5), (-1.2, 0.0, 0.0)] {
        let moved = polyline_length(&spline.sample(&rigid(&controls, angle, dx, dy)));
        assert!((moved - base).abs() < 1e-6, "{moved} vs {base}");
    }
}

#[test]
fn duplicate_points_do_not_break_length_or_midpoint() {
    let controls = pts(&[(0.0, 0.0), (0.0, 0.0)]);
    assert_eq!(polyline_length(&controls), 0.0);
    assert_eq!(arc_midpoint(&controls), Some(Point::new(0.0, 0.0)));

    let samples = SplineInterpolator::default().sample(&controls);
    assert!(samples.iter().all(|p| p.x == 0.0 && p.y == 0.0));
    assert_eq!(polyline_length(&samples), 0.0);
}

// ─── World scale ────────────────────────────────────────────────────────

#[test]
fn pixel_length_converts_through_the_camera() {
    let camera = PlaneTransform::new(
        Point3::new(-100.0, -100.0, 42.0),
        Point3::new(0.25, 0.0, 0.0),
        Point3::new(0.0, 0.0, -0.25),
    );
    let world = [Point3::new(-100.0, -100.0, 42.0), Point3::new(-80.0, -100.0, 42.0)];
    let canvas: Vec<Point> = world.iter().map(|&w| camera.world_to_canvas(w)).collect();
    let samples = SplineInterpolator::default().sample(&canvas);

    let px = polyline_length(&samples);
    let scale = scale_or_unit(|c| camera.canvas_to_world(c), samples[0]);
    assert!((px - 80.0).abs() < 1e-9);
    assert!((px * scale - 20.0).abs() < 1e-9);
}
