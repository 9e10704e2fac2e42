//! `PanoramaCurveTool`: the capability object a host drives.
//!
//! Three entry points: `pointer_down` for clicks, `render` for one viewport's
//! render pass, and `command` for discrete host actions. Every mutation
//! returns whether state changed; the host decides when to redraw.

use crate::measure::{MeasurementSession, measure_between};
use crate::store::{CurveState, CurveStore};
use pano_core::{
    Command, CurveConfig, CurveSlot, LedgerEntry, Point, SplineInterpolator, ViewportId,
    ViewportTransform, parse_script, scale_or_unit,
};
use pano_render::{
    CurveGeometry, DrawingSink, curve_uid, hit_test, paint_center, paint_curve,
    paint_length_label, paint_measure_label, paint_measure_marks,
};
use serde::Serialize;
use std::collections::HashMap;

/// Looks up the current transform for a viewport.
///
/// Transforms depend on camera state, so hosts should hand out a fresh one
/// per call rather than caching.
pub trait TransformSource {
    type Transform: ViewportTransform;

    fn transform_for(&self, viewport: ViewportId) -> Option<&Self::Transform>;
}

impl<T: ViewportTransform> TransformSource for HashMap<ViewportId, T> {
    type Transform = T;

    fn transform_for(&self, viewport: ViewportId) -> Option<&T> {
        self.get(&viewport)
    }
}

/// The same transform for every viewport.
#[derive(Debug, Clone, Copy, Default)]
pub struct Uniform<T>(pub T);

impl<T: ViewportTransform> TransformSource for Uniform<T> {
    type Transform = T;

    fn transform_for(&self, _viewport: ViewportId) -> Option<&T> {
        Some(&self.0)
    }
}

/// Snapshot returned by [`PanoramaCurveTool::state`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolState {
    #[serde(flatten)]
    pub curves: CurveState,
    pub measure_mode: bool,
}

#[derive(Debug, Default)]
pub struct PanoramaCurveTool {
    config: CurveConfig,
    spline: SplineInterpolator,
    store: CurveStore,
    measure: MeasurementSession,
    last_viewport: Option<ViewportId>,
}

impl PanoramaCurveTool {
    pub fn new(config: CurveConfig) -> Self {
        let spline = SplineInterpolator::new(config.samples_per_segment);
        Self {
            config,
            spline,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &CurveConfig {
        &self.config
    }

    pub fn store(&self) -> &CurveStore {
        &self.store
    }

    pub fn measurement(&self) -> &MeasurementSession {
        &self.measure
    }

    pub fn last_viewport(&self) -> Option<ViewportId> {
        self.last_viewport
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Handle a primary click at `click` (canvas space) in `viewport`.
    ///
    /// In measurement mode only handle hits matter and the curve is never
    /// edited. Otherwise a handle hit rewinds the active curve there and a
    /// miss appends a new control point.
    pub fn pointer_down(
        &mut self,
        viewport: ViewportId,
        click: Point,
        transform: &impl ViewportTransform,
    ) -> bool {
        self.last_viewport = Some(viewport);
        let hit = hit_test(
            self.store.active(viewport),
            click,
            transform,
            self.config.hit_threshold_px,
        );

        if self.measure.is_enabled() {
            return self.measure.click(viewport, hit, click);
        }

        match hit {
            Some(handle) => {
                let changed = self.store.truncate_at(viewport, handle);
                if changed {
                    self.measure.reset(viewport);
                }
                changed
            }
            None => self
                .store
                .add_point(viewport, transform.canvas_to_world(click)),
        }
    }

    // ─── Commands ────────────────────────────────────────────────────────

    /// Finish the active curve of `viewport`, or of the last-interacted
    /// viewport when `None`.
    pub fn finish_curve(&mut self, viewport: Option<ViewportId>) -> bool {
        let Some(viewport) = viewport.or(self.last_viewport) else {
            log::debug!("finish ignored: no viewport");
            return false;
        };
        let changed = self.store.finish(viewport);
        if changed {
            self.measure.reset(viewport);
        }
        changed
    }

    /// Always changes state: the mode flips even with nothing to measure.
    pub fn toggle_measure_mode(&mut self) -> bool {
        self.measure.toggle();
        true
    }

    /// Undo the most recent curve action across every viewport.
    pub fn undo_last(&mut self) -> bool {
        match self.store.undo_last() {
            Some(LedgerEntry {
                viewport_id,
                curve_index: CurveSlot::Active,
                ..
            }) => {
                self.measure.reset(viewport_id);
                true
            }
            Some(_) => true,
            None => false,
        }
    }

    /// Undo the most recent curve of one viewport (defaults to the
    /// last-interacted one).
    pub fn clear_last(&mut self, viewport: Option<ViewportId>) -> bool {
        let Some(viewport) = viewport.or(self.last_viewport) else {
            return false;
        };
        let changed = self.store.clear_last(viewport);
        if changed {
            self.measure.reset(viewport);
        }
        changed
    }

    pub fn clear_viewport(&mut self, viewport: ViewportId) -> bool {
        self.measure.reset(viewport);
        self.store.clear_viewport(viewport)
    }

    pub fn clear_all(&mut self) -> bool {
        self.measure.clear();
        self.store.clear_all()
    }

    /// Dispatch one host command. Pointer events for viewports the source
    /// has no transform for are rejected.
    pub fn command(&mut self, command: Command, transforms: &impl TransformSource) -> bool {
        log::debug!("command: {command}");
        match command {
            Command::PointerDown { viewport, x, y } => match transforms.transform_for(viewport) {
                Some(transform) => self.pointer_down(viewport, Point::new(x, y), transform),
                None => {
                    log::debug!("no transform for {viewport}; click ignored");
                    false
                }
            },
            Command::Finish { viewport } => self.finish_curve(viewport),
            Command::ToggleMeasure => self.toggle_measure_mode(),
            Command::Undo => self.undo_last(),
            Command::ClearLast { viewport } => self.clear_last(viewport),
            Command::ClearViewport { viewport } => self.clear_viewport(viewport),
            Command::ClearAll => self.clear_all(),
        }
    }

    /// Parse and run a session script. Returns how many commands changed
    /// state.
    ///
    /// # Errors
    /// Returns the parse error; nothing runs if the script is malformed.
    pub fn run_script(
        &mut self,
        script: &str,
        transforms: &impl TransformSource,
    ) -> Result<usize, String> {
        let commands = parse_script(script)?;
        Ok(commands
            .into_iter()
            .filter(|&command| self.command(command, transforms))
            .count())
    }

    pub fn state(&self) -> ToolState {
        ToolState {
            curves: self.store.state(),
            measure_mode: self.measure.is_enabled(),
        }
    }

    // ─── Render ──────────────────────────────────────────────────────────

    /// Draw one viewport's curves. Returns whether anything was drawn.
    ///
    /// Finished curves get line and handles. The active curve also gets its
    /// center marker and length readout, then the measurement overlay when
    /// measurement mode is on.
    pub fn render(
        &self,
        viewport: ViewportId,
        transform: &impl ViewportTransform,
        sink: &mut dyn DrawingSink,
    ) -> bool {
        let finished = self.store.finished(viewport);
        let active = self.store.active(viewport);
        if finished.is_empty() && active.is_empty() {
            return false;
        }
        log::trace!(
            "PAINT {viewport}: {} finished, {} active points",
            finished.len(),
            active.len()
        );

        for (index, curve) in finished.iter().enumerate() {
            let geometry = CurveGeometry::project(curve.points(), transform, &self.spline);
            let uid = curve_uid(viewport, CurveSlot::Finished(index));
            paint_curve(sink, &uid, &geometry, &self.config);
        }

        if active.is_empty() {
            return true;
        }
        let geometry = CurveGeometry::project(active, transform, &self.spline);
        let uid = curve_uid(viewport, CurveSlot::Active);
        paint_curve(sink, &uid, &geometry, &self.config);
        paint_center(sink, &uid, &geometry, &self.config.styles.center);
        if let Some(&first) = geometry.samples.first() {
            let units_per_px = scale_or_unit(|c| transform.canvas_to_world(c), first);
            paint_length_label(sink, &uid, &geometry, units_per_px, &self.config);
        }

        if self.measure.is_enabled() {
            self.render_measurement(viewport, &geometry, transform, sink);
        }
        true
    }

    fn render_measurement(
        &self,
        viewport: ViewportId,
        geometry: &CurveGeometry,
        transform: &impl ViewportTransform,
        sink: &mut dyn DrawingSink,
    ) {
        let Some(selected) = self.measure.selection(viewport) else {
            return;
        };
        let marks: Vec<Point> = selected
            .selection
            .handles()
            .iter()
            .filter_map(|&h| geometry.handles.get(h).copied())
            .collect();
        paint_measure_marks(sink, &marks, &self.config);

        if let Some((first, second)) = selected.selection.pair()
            && let Some(length) = measure_between(geometry, first, second, transform)
        {
            let anchor = selected
                .label_anchor
                .unwrap_or(geometry.handles[second]);
            paint_measure_label(sink, first, second, length, anchor, &self.config);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pano_core::PlaneTransform;
    use pano_render::{DrawList, Primitive};
    use pretty_assertions::assert_eq;

    fn click(tool: &mut PanoramaCurveTool, vp: ViewportId, x: f64, y: f64) -> bool {
        tool.pointer_down(vp, Point::new(x, y), &PlaneTransform::identity())
    }

    fn render(tool: &PanoramaCurveTool, vp: ViewportId) -> DrawList {
        let mut list = DrawList::new();
        tool.render(vp, &PlaneTransform::identity(), &mut list);
        list
    }

    #[test]
    fn clicks_add_points_and_handle_hits_truncate() {
        let vp = ViewportId::intern("tool_click");
        let mut tool = PanoramaCurveTool::default();
        assert!(click(&mut tool, vp, 10.0, 10.0));
        assert!(click(&mut tool, vp, 50.0, 10.0));
        assert!(click(&mut tool, vp, 50.0, 50.0));
        assert_eq!(tool.store().active(vp).len(), 3);

        // Within 8 px of the middle handle: rewind to end there
        assert!(click(&mut tool, vp, 53.0, 14.0));
        assert_eq!(tool.store().active(vp).len(), 2);

        // Last handle: drop just that point
        assert!(click(&mut tool, vp, 50.0, 10.0));
        assert_eq!(tool.store().active(vp).len(), 1);
    }

    #[test]
    fn measure_mode_never_edits_curve() {
        let vp = ViewportId::intern("tool_measure");
        let mut tool = PanoramaCurveTool::default();
        click(&mut tool, vp, 0.0, 0.0);
        click(&mut tool, vp, 100.0, 0.0);
        assert!(tool.toggle_measure_mode());

        assert!(!click(&mut tool, vp, 300.0, 300.0));
        assert!(click(&mut tool, vp, 0.0, 0.0));
        assert!(click(&mut tool, vp, 100.0, 0.0));
        assert_eq!(tool.store().active(vp).len(), 2);

        let list = render(&tool, vp);
        assert_eq!(
            list.text_lines("measure-label").unwrap(),
            &["Between P1 and P2: 100.00 mm".to_string()]
        );
        match list.find("measure-sel") {
            Some(Primitive::Handles { points, .. }) => assert_eq!(points.len(), 2),
            other => panic!("expected measure handles, got {other:?}"),
        }
    }

    #[test]
    fn finish_defaults_to_last_viewport() {
        let a = ViewportId::intern("tool_last_a");
        let b = ViewportId::intern("tool_last_b");
        let mut tool = PanoramaCurveTool::default();
        assert!(!tool.finish_curve(None));
        click(&mut tool, a, 0.0, 0.0);
        click(&mut tool, a, 20.0, 0.0);
        click(&mut tool, b, 0.0, 0.0);
        click(&mut tool, a, 40.0, 0.0);
        assert!(tool.finish_curve(None));
        assert_eq!(tool.store().finished(a).len(), 1);
        assert_eq!(tool.store().active(b).len(), 1);
    }

    #[test]
    fn undo_of_active_curve_resets_selection() {
        let vp = ViewportId::intern("tool_undo_sel");
        let mut tool = PanoramaCurveTool::default();
        click(&mut tool, vp, 0.0, 0.0);
        click(&mut tool, vp, 40.0, 0.0);
        tool.toggle_measure_mode();
        click(&mut tool, vp, 0.0, 0.0);
        assert!(tool.measurement().selection(vp).is_some());

        assert!(tool.undo_last());
        assert!(tool.measurement().selection(vp).is_none());
        assert!(!tool.undo_last());
    }

    #[test]
    fn render_emits_expected_elements() {
        let vp = ViewportId::intern("tool_render");
        let mut tool = PanoramaCurveTool::default();
        assert!(render(&tool, vp).is_empty());

        click(&mut tool, vp, 0.0, 0.0);
        click(&mut tool, vp, 30.0, 0.0);
        tool.finish_curve(Some(vp));
        click(&mut tool, vp, 0.0, 50.0);
        click(&mut tool, vp, 30.0, 50.0);
        click(&mut tool, vp, 60.0, 50.0);

        let list = render(&tool, vp);
        assert_eq!(
            list.ids(),
            vec![
                "panorama-curve-tool_render-finished-0",
                "panorama-curve-tool_render-finished-0-handles",
                "panorama-curve-tool_render-active",
                "panorama-curve-tool_render-active-handles",
                "panorama-curve-tool_render-active-center",
                "panorama-curve-tool_render-active-length-label",
            ]
        );
        assert_eq!(
            list.text_lines("panorama-curve-tool_render-active-length-label")
                .unwrap(),
            &["Segment: 30.00 mm".to_string(), "Total: 60.00 mm".to_string()]
        );
    }

    #[test]
    fn commands_without_transform_are_rejected() {
        let vp = ViewportId::intern("tool_no_camera");
        let mut tool = PanoramaCurveTool::default();
        let cameras: HashMap<ViewportId, PlaneTransform> = HashMap::new();
        assert!(!tool.command(Command::PointerDown { viewport: vp, x: 1.0, y: 1.0 }, &cameras));
        assert!(tool.command(
            Command::PointerDown { viewport: vp, x: 1.0, y: 1.0 },
            &Uniform(PlaneTransform::identity())
        ));
    }

    #[test]
    fn oversized_sampling_config_is_capped() {
        let vp = ViewportId::intern("tool_dense");
        let config = CurveConfig::from_json(r#"{"samplesPerSegment": 1000000000000}"#).unwrap();
        let mut tool = PanoramaCurveTool::new(config);
        click(&mut tool, vp, 0.0, 0.0);
        click(&mut tool, vp, 40.0, 0.0);

        match render(&tool, vp).find("panorama-curve-tool_dense-active") {
            Some(Primitive::Polyline { points, .. }) => {
                assert_eq!(points.len(), pano_core::MAX_SAMPLES_PER_SEGMENT + 1)
            }
            other => panic!("expected active polyline, got {other:?}"),
        }
    }

    #[test]
    fn state_reports_measure_mode() {
        let mut tool = PanoramaCurveTool::default();
        tool.toggle_measure_mode();
        let json = serde_json::to_value(tool.state()).unwrap();
        assert_eq!(json["measureMode"], serde_json::Value::Bool(true));
        assert!(json["perViewport"].is_array());
        assert!(json["ledger"].is_array());
    }
}
