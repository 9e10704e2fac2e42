//! Curve geometry → drawing primitives.
//!
//! Projects world-space control points through the viewport transform,
//! samples the display spline, and emits polylines, handles, and length
//! readouts to a `DrawingSink`.

use crate::sink::DrawingSink;
use pano_core::{
    CurveConfig, CurveSlot, DrawStyle, Point, Point3, SplineInterpolator, ViewportId,
    ViewportTransform, arc_midpoint, polyline_length, span_between,
};

pub const MEASURE_MARKS_ID: &str = "measure-sel";
pub const MEASURE_LABEL_ID: &str = "measure-label";

/// Element id for a curve, e.g. `panorama-curve-CT_AXIAL-finished-0`.
pub fn curve_uid(viewport: ViewportId, slot: CurveSlot) -> String {
    match slot {
        CurveSlot::Active => format!("panorama-curve-{viewport}-active"),
        CurveSlot::Finished(index) => format!("panorama-curve-{viewport}-finished-{index}"),
    }
}

/// A curve projected to canvas space for one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveGeometry {
    /// Control points in canvas space (handle positions).
    pub handles: Vec<Point>,
    /// Sampled display spline in canvas space.
    pub samples: Vec<Point>,
}

impl CurveGeometry {
    pub fn project(
        points: &[Point3],
        transform: &impl ViewportTransform,
        spline: &SplineInterpolator,
    ) -> Self {
        let handles: Vec<Point> = points.iter().map(|&p| transform.world_to_canvas(p)).collect();
        let samples = spline.sample(&handles);
        Self { handles, samples }
    }

    /// Total arc length in pixels.
    pub fn total_length(&self) -> f64 {
        polyline_length(&self.samples)
    }

    /// Arc length in pixels between handles `a` and `b`, measured along the
    /// spline between their nearest samples. Zero for out-of-range handles.
    pub fn handle_span_length(&self, a: usize, b: usize) -> f64 {
        match (self.handles.get(a), self.handles.get(b)) {
            (Some(&from), Some(&to)) => span_between(&self.samples, from, to),
            _ => 0.0,
        }
    }

    pub fn center(&self) -> Option<Point> {
        arc_midpoint(&self.samples)
    }
}

/// Spline polyline plus control-point handles.
pub fn paint_curve(
    sink: &mut dyn DrawingSink,
    uid: &str,
    geometry: &CurveGeometry,
    config: &CurveConfig,
) {
    sink.draw_polyline(uid, &geometry.samples, &config.styles.curve);
    sink.draw_handles(&format!("{uid}-handles"), &geometry.handles, &config.styles.handles);
}

/// Arc-length midpoint marker. Skipped for single-sample curves.
pub fn paint_center(
    sink: &mut dyn DrawingSink,
    uid: &str,
    geometry: &CurveGeometry,
    style: &DrawStyle,
) {
    if geometry.samples.len() < 2 {
        return;
    }
    if let Some(center) = geometry.center() {
        sink.draw_handle(&format!("{uid}-center"), center, style);
    }
}

/// `Segment` (last span) and `Total` readouts anchored at the last handle.
/// `units_per_px` converts pixel arc length to world units.
pub fn paint_length_label(
    sink: &mut dyn DrawingSink,
    uid: &str,
    geometry: &CurveGeometry,
    units_per_px: f64,
    config: &CurveConfig,
) {
    let n = geometry.handles.len();
    if n < 2 {
        return;
    }
    let segment = geometry.handle_span_length(n - 2, n - 1) * units_per_px;
    let total = geometry.total_length() * units_per_px;
    let lines = [
        format!("Segment: {}", config.format_length(segment)),
        format!("Total: {}", config.format_length(total)),
    ];
    sink.draw_text_box(
        &format!("{uid}-length-label"),
        &lines,
        geometry.handles[n - 1],
        &config.styles.length_label,
    );
}

/// Highlight the selected measurement handles.
pub fn paint_measure_marks(sink: &mut dyn DrawingSink, marks: &[Point], config: &CurveConfig) {
    if marks.is_empty() {
        return;
    }
    log::trace!("PAINT measure marks ({})", marks.len());
    sink.draw_handles(MEASURE_MARKS_ID, marks, &config.styles.measure_marks);
}

/// `Between P<i> and P<j>: <length>` label (1-based handle numbers).
pub fn paint_measure_label(
    sink: &mut dyn DrawingSink,
    first: usize,
    second: usize,
    length: f64,
    anchor: Point,
    config: &CurveConfig,
) {
    let text = format!(
        "Between P{} and P{}: {}",
        first + 1,
        second + 1,
        config.format_length(length)
    );
    sink.draw_text_box(MEASURE_LABEL_ID, &[text], anchor, &config.styles.measure_label);
}
