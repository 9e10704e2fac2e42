//! Centripetal Catmull-Rom sampling through canvas-space control points.
//!
//! The sampled path interpolates: control point `k` is emitted verbatim at
//! sample index `k * samples_per_segment`. Missing neighbours at either end
//! are filled with a phantom copy of the nearest real endpoint.

use crate::geom::Point;

pub const DEFAULT_SAMPLES_PER_SEGMENT: usize = 12;

/// Upper bound on `samples_per_segment`; sample buffers scale linearly with it.
pub const MAX_SAMPLES_PER_SEGMENT: usize = 256;

/// Knot exponent: 0.0 = uniform, 0.5 = centripetal, 1.0 = chordal.
const CENTRIPETAL_ALPHA: f64 = 0.5;

/// Knot intervals below this are treated as unit length (coincident points).
const KNOT_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplineInterpolator {
    samples_per_segment: usize,
}

impl Default for SplineInterpolator {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLES_PER_SEGMENT)
    }
}

impl SplineInterpolator {
    /// `samples_per_segment` is clamped to `1..=MAX_SAMPLES_PER_SEGMENT`.
    pub fn new(samples_per_segment: usize) -> Self {
        let clamped = samples_per_segment.clamp(1, MAX_SAMPLES_PER_SEGMENT);
        if clamped != samples_per_segment {
            log::warn!(
                "samples_per_segment {samples_per_segment} out of range 1..={MAX_SAMPLES_PER_SEGMENT}; using {clamped}"
            );
        }
        Self {
            samples_per_segment: clamped,
        }
    }

    pub fn samples_per_segment(&self) -> usize {
        self.samples_per_segment
    }

    /// Index in the sampled path at which control point `k` appears.
    pub fn control_sample_index(&self, k: usize) -> usize {
        k * self.samples_per_segment
    }

    /// Sample a smooth path through `points`.
    ///
    /// 0 points → empty, 1 point → that point, n ≥ 2 points →
    /// `(n - 1) * samples_per_segment + 1` samples.
    pub fn sample(&self, points: &[Point]) -> Vec<Point> {
        match points.len() {
            0 => return Vec::new(),
            1 => return vec![points[0]],
            _ => {}
        }

        let n = points.len();
        let steps = self.samples_per_segment;
        let mut out = Vec::with_capacity((n - 1) * steps + 1);

        for seg in 0..n - 1 {
            let p0 = if seg == 0 { points[0] } else { points[seg - 1] };
            let p1 = points[seg];
            let p2 = points[seg + 1];
            let p3 = if seg + 2 < n { points[seg + 2] } else { points[n - 1] };

            out.push(p1);
            for i in 1..steps {
                let u = i as f64 / steps as f64;
                out.push(centripetal_point(p0, p1, p2, p3, u));
            }
        }
        out.push(points[n - 1]);

        out
    }
}

fn knot_interval(a: Point, b: Point) -> f64 {
    let d = (b - a).hypot().powf(CENTRIPETAL_ALPHA);
    if d < KNOT_EPSILON { 1.0 } else { d }
}

fn lerp_knots(a: Point, b: Point, ta: f64, tb: f64, t: f64) -> Point {
    let w = (t - ta) / (tb - ta);
    a.lerp(b, w)
}

/// Barry–Goldman evaluation of the p1→p2 span at `u ∈ [0, 1]`.
fn centripetal_point(p0: Point, p1: Point, p2: Point, p3: Point, u: f64) -> Point {
    let t0 = 0.0;
    let t1 = t0 + knot_interval(p0, p1);
    let t2 = t1 + knot_interval(p1, p2);
    let t3 = t2 + knot_interval(p2, p3);
    let t = t1 + (t2 - t1) * u;

    let a1 = lerp_knots(p0, p1, t0, t1, t);
    let a2 = lerp_knots(p1, p2, t1, t2, t);
    let a3 = lerp_knots(p2, p3, t2, t3, t);
    let b1 = lerp_knots(a1, a2, t0, t2, t);
    let b2 = lerp_knots(a2, a3, t1, t3, t);
    lerp_knots(b1, b2, t1, t2, t)
}
