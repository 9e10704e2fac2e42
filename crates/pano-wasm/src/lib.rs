//! WASM bridge for the panorama curve tool.
//!
//! Compiled via `wasm-pack build --target web`. The host viewer owns the
//! cameras: it pushes each viewport's plane with `set_camera` whenever the
//! view pans, zooms, or scrolls, then forwards clicks and asks for overlays.

mod canvas2d;
mod svg;

pub use canvas2d::Canvas2dSink;
pub use svg::SvgSink;

use pano_core::{Command, CurveConfig, PlaneTransform, Point, ViewportId, ViewportTransform};
use pano_editor::PanoramaCurveTool;
use pano_render::DrawList;
use std::collections::HashMap;
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

/// The WASM-facing curve controller.
///
/// One instance serves every viewport of a viewer; all calls are expected
/// on the same (UI) thread.
#[wasm_bindgen]
pub struct PanoramaCurveCanvas {
    tool: PanoramaCurveTool,
    cameras: HashMap<ViewportId, PlaneTransform>,
}

#[wasm_bindgen]
impl PanoramaCurveCanvas {
    /// Create a controller. `config_json` is a partial `CurveConfig`; an
    /// unparseable config falls back to defaults with a warning.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Self {
        console_error_panic_hook_setup();

        let config = match config_json.as_deref().map(CurveConfig::from_json) {
            Some(Ok(config)) => config,
            Some(Err(e)) => {
                log::warn!("{e}; using defaults");
                CurveConfig::default()
            }
            None => CurveConfig::default(),
        };

        Self {
            tool: PanoramaCurveTool::new(config),
            cameras: HashMap::new(),
        }
    }

    /// Set a viewport's camera plane:
    /// `{"origin":[x,y,z],"row":[x,y,z],"column":[x,y,z]}`.
    /// Returns `false` if the JSON is invalid (the old camera is kept).
    pub fn set_camera(&mut self, viewport: &str, camera_json: &str) -> bool {
        match PlaneTransform::from_json(camera_json) {
            Ok(plane) => {
                self.cameras.insert(ViewportId::intern(viewport), plane);
                true
            }
            Err(e) => {
                log::warn!("{viewport}: {e}");
                false
            }
        }
    }

    /// Primary click at canvas `(x, y)`. Returns `true` if state changed.
    pub fn pointer_down(&mut self, viewport: &str, x: f64, y: f64) -> bool {
        let viewport = ViewportId::intern(viewport);
        self.tool
            .command(Command::PointerDown { viewport, x, y }, &self.cameras)
    }

    pub fn finish_curve(&mut self, viewport: Option<String>) -> bool {
        self.tool
            .finish_curve(viewport.as_deref().map(ViewportId::intern))
    }

    pub fn toggle_measure_mode(&mut self) -> bool {
        self.tool.toggle_measure_mode()
    }

    pub fn is_measure_mode(&self) -> bool {
        self.tool.measurement().is_enabled()
    }

    pub fn undo_last(&mut self) -> bool {
        self.tool.undo_last()
    }

    pub fn clear_last(&mut self, viewport: Option<String>) -> bool {
        self.tool
            .clear_last(viewport.as_deref().map(ViewportId::intern))
    }

    pub fn clear_viewport(&mut self, viewport: &str) -> bool {
        self.tool.clear_viewport(ViewportId::intern(viewport))
    }

    pub fn clear_all(&mut self) -> bool {
        self.tool.clear_all()
    }

    /// Run a session script. Returns JSON:
    /// `{"ok":true,"changed":n}` or `{"ok":false,"error":"..."}`.
    pub fn run_script(&mut self, script: &str) -> String {
        let result = match self.tool.run_script(script, &self.cameras) {
            Ok(changed) => serde_json::json!({ "ok": true, "changed": changed }),
            Err(e) => serde_json::json!({ "ok": false, "error": e }),
        };
        result.to_string()
    }

    /// Tool state as JSON: `{"perViewport":[...],"ledger":[...],"measureMode":b}`.
    pub fn get_state(&self) -> String {
        serde_json::to_string(&self.tool.state()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Tool state as a JS object.
    pub fn get_state_object(&self) -> Result<JsValue, JsValue> {
        js_sys::JSON::parse(&self.get_state())
    }

    /// Draw list for one viewport as JSON. Empty for viewports without a
    /// camera.
    pub fn render_json(&self, viewport: &str) -> String {
        let mut list = DrawList::new();
        let viewport = ViewportId::intern(viewport);
        if let Some(camera) = self.cameras.get(&viewport) {
            self.tool.render(viewport, camera, &mut list);
        }
        list.to_json()
    }

    /// SVG overlay for one viewport, sized to its canvas.
    pub fn render_svg(&self, viewport: &str, width: f64, height: f64) -> String {
        let mut sink = SvgSink::new(width, height);
        let viewport = ViewportId::intern(viewport);
        if let Some(camera) = self.cameras.get(&viewport) {
            self.tool.render(viewport, camera, &mut sink);
        }
        sink.finish()
    }

    /// Draw one viewport's overlay onto a Canvas2D context. Returns `false`
    /// if there was nothing to draw.
    pub fn render(&self, ctx: &CanvasRenderingContext2d, viewport: &str) -> bool {
        let viewport = ViewportId::intern(viewport);
        let Some(camera) = self.cameras.get(&viewport) else {
            return false;
        };
        self.tool.render(viewport, camera, &mut Canvas2dSink::new(ctx))
    }

    /// World position under a canvas pixel, as `[x, y, z]`; `undefined` for
    /// viewports without a camera.
    pub fn canvas_to_world(&self, viewport: &str, x: f64, y: f64) -> Option<Vec<f64>> {
        let camera = self.cameras.get(&ViewportId::intern(viewport))?;
        let world = camera.canvas_to_world(Point::new(x, y));
        Some(vec![world.x, world.y, world.z])
    }
}

/// Route panics to the browser console.
fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("pano-wasm panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
