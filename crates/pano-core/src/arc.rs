//! Arc-length math over sampled canvas paths.

use crate::geom::{Point, Point3, Vec2};

/// Sum of consecutive segment lengths.
pub fn polyline_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Point halfway along the path by arc length.
///
/// Returns `None` for an empty path and the first point when the path has
/// zero length.
pub fn arc_midpoint(points: &[Point]) -> Option<Point> {
    let first = *points.first()?;
    let target = polyline_length(points) / 2.0;

    let mut accumulated = 0.0;
    for w in points.windows(2) {
        let seg = w[0].distance(w[1]);
        if accumulated + seg >= target {
            if seg == 0.0 {
                return Some(w[0]);
            }
            return Some(w[0].lerp(w[1], (target - accumulated) / seg));
        }
        accumulated += seg;
    }

    Some(first)
}

/// Index of the sample closest to `target`. Ties resolve to the lowest index.
pub fn nearest_sample_index(points: &[Point], target: Point) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, p) in points.iter().enumerate() {
        let d = (*p - target).hypot2();
        if best.is_none_or(|(_, min)| d < min) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}

/// Path length between two sample indices, in either order.
/// Indices past the end are clamped to the last sample.
pub fn sample_span_length(points: &[Point], a: usize, b: usize) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    let last = points.len() - 1;
    let lo = a.min(b).min(last);
    let hi = a.max(b).min(last);
    polyline_length(&points[lo..=hi])
}

/// Arc length along `samples` between the samples nearest to `from` and `to`.
pub fn span_between(samples: &[Point], from: Point, to: Point) -> f64 {
    match (
        nearest_sample_index(samples, from),
        nearest_sample_index(samples, to),
    ) {
        (Some(a), Some(b)) => sample_span_length(samples, a, b),
        _ => 0.0,
    }
}

/// Approximate world units per screen pixel around `canvas`.
///
/// Maps the point and its +x / +y pixel neighbours to world space and
/// averages the two offset magnitudes. Exact for orthographic, uniformly
/// zoomed views; an approximation under perspective or anisotropic scaling.
pub fn estimate_scale(canvas_to_world: impl Fn(Point) -> Point3, canvas: Point) -> f64 {
    let origin = canvas_to_world(canvas);
    let along_x = canvas_to_world(canvas + Vec2::new(1.0, 0.0));
    let along_y = canvas_to_world(canvas + Vec2::new(0.0, 1.0));
    (along_x.distance(origin) + along_y.distance(origin)) / 2.0
}

/// `estimate_scale`, falling back to 1.0 when the estimate is zero or
/// non-finite so labels degrade to pixel units instead of vanishing.
pub fn scale_or_unit(canvas_to_world: impl Fn(Point) -> Point3, canvas: Point) -> f64 {
    let scale = estimate_scale(canvas_to_world, canvas);
    if scale.is_finite() && scale > 0.0 { scale } else { 1.0 }
}
