//! Measurement mode: pick two handles of the active curve and read the arc
//! length between them.
//!
//! Per-viewport selection state machine:
//!
//! ```text
//! Empty ──hit h──▶ One(h) ──hit k≠h──▶ Pair(h, k) ──hit m──▶ One(m)
//!                    ▲ │
//!                    └─┘ hit h (self-click never forms a pair)
//! ```
//!
//! Only clicks that land on a handle drive transitions.

use pano_core::{
    Point, ViewportId, ViewportTransform, nearest_sample_index, sample_span_length, scale_or_unit,
};
use pano_render::CurveGeometry;
use serde::Serialize;
use smallvec::SmallVec;
use std::collections::BTreeMap;

/// Handles picked so far, in click order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum Selection {
    #[default]
    Empty,
    One { first: usize },
    Pair { first: usize, second: usize },
}

impl Selection {
    /// Next state after a click on handle `hit`.
    pub fn advance(self, hit: usize) -> Self {
        match self {
            Selection::Empty => Selection::One { first: hit },
            Selection::One { first } if first == hit => self,
            Selection::One { first } => Selection::Pair { first, second: hit },
            Selection::Pair { .. } => Selection::One { first: hit },
        }
    }

    pub fn handles(&self) -> SmallVec<[usize; 2]> {
        match *self {
            Selection::Empty => SmallVec::new(),
            Selection::One { first } => smallvec::smallvec![first],
            Selection::Pair { first, second } => smallvec::smallvec![first, second],
        }
    }

    pub fn pair(&self) -> Option<(usize, usize)> {
        match *self {
            Selection::Pair { first, second } => Some((first, second)),
            _ => None,
        }
    }
}

/// One viewport's selection plus where its label goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementSelection {
    pub selection: Selection,
    /// Canvas position of the most recent handle click.
    pub label_anchor: Option<Point>,
}

impl MeasurementSelection {
    fn click(&mut self, hit: usize, at: Point) {
        self.selection = self.selection.advance(hit);
        self.label_anchor = Some(at);
    }
}

#[derive(Debug, Clone, Default)]
pub struct MeasurementSession {
    enabled: bool,
    selections: BTreeMap<ViewportId, MeasurementSelection>,
}

impl MeasurementSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Flip measurement mode. Switching it off forgets every selection.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        if !self.enabled {
            self.selections.clear();
        }
        log::debug!("measure mode {}", if self.enabled { "on" } else { "off" });
        self.enabled
    }

    /// Feed a click that was hit-tested against the active curve's handles.
    /// Misses and clicks outside measurement mode are ignored.
    pub fn click(&mut self, viewport: ViewportId, hit: Option<usize>, at: Point) -> bool {
        if !self.enabled {
            return false;
        }
        let Some(hit) = hit else {
            return false;
        };
        let entry = self.selections.entry(viewport).or_default();
        entry.click(hit, at);
        log::debug!("measure {viewport}: {:?}", entry.selection);
        true
    }

    pub fn selection(&self, viewport: ViewportId) -> Option<&MeasurementSelection> {
        self.selections.get(&viewport)
    }

    /// Forget one viewport's selection, e.g. after its handles changed.
    pub fn reset(&mut self, viewport: ViewportId) {
        self.selections.remove(&viewport);
    }

    /// Forget every selection, leaving the mode as is.
    pub fn clear(&mut self) {
        self.selections.clear();
    }
}

/// World-unit arc length between handles `a` and `b` of a projected curve.
///
/// Each handle maps to its nearest spline sample; the pixel length between
/// the two samples is scaled by the world/pixel ratio at the lower one.
/// `None` if either handle is out of range.
pub fn measure_between(
    geometry: &CurveGeometry,
    a: usize,
    b: usize,
    transform: &impl ViewportTransform,
) -> Option<f64> {
    let from = nearest_sample_index(&geometry.samples, *geometry.handles.get(a)?)?;
    let to = nearest_sample_index(&geometry.samples, *geometry.handles.get(b)?)?;
    let pixels = sample_span_length(&geometry.samples, from, to);
    let scale = scale_or_unit(
        |c| transform.canvas_to_world(c),
        geometry.samples[from.min(to)],
    );
    Some(pixels * scale)
}
