//! Viewport transforms: world ↔ canvas mapping.
//!
//! The host owns the camera. A transform is only valid for the camera state
//! it was built from, so callers must fetch a fresh one after any pan, zoom,
//! or slice change. Both directions are assumed to return finite coordinates.

use crate::geom::{Point, Point3};
use serde::{Deserialize, Serialize};

/// World ↔ canvas projection for one viewport.
pub trait ViewportTransform {
    /// Where should this world point be drawn on screen?
    fn world_to_canvas(&self, world: Point3) -> Point;

    /// Where in the dataset is this canvas pixel?
    fn canvas_to_world(&self, canvas: Point) -> Point3;
}

impl<T: ViewportTransform + ?Sized> ViewportTransform for &T {
    fn world_to_canvas(&self, world: Point3) -> Point {
        (**self).world_to_canvas(world)
    }

    fn canvas_to_world(&self, canvas: Point) -> Point3 {
        (**self).canvas_to_world(canvas)
    }
}

/// Orthographic view of a world-space plane.
///
/// `origin` is the world point under canvas pixel (0, 0); `row` and `column`
/// are the world-space steps for one pixel along canvas x and y. The two
/// steps must be orthogonal and non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneTransform {
    pub origin: Point3,
    pub row: Point3,
    pub column: Point3,
}

impl Default for PlaneTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl PlaneTransform {
    pub fn new(origin: Point3, row: Point3, column: Point3) -> Self {
        Self {
            origin,
            row,
            column,
        }
    }

    /// Axial plane at z = 0, one world unit per pixel.
    pub fn identity() -> Self {
        Self::scaled(1.0)
    }

    /// Axial plane at z = 0 with `units_per_px` world units per pixel.
    pub fn scaled(units_per_px: f64) -> Self {
        Self {
            origin: Point3::ZERO,
            row: Point3::new(units_per_px, 0.0, 0.0),
            column: Point3::new(0.0, units_per_px, 0.0),
        }
    }

    /// Parse a camera plane from JSON:
    /// `{"origin":[x,y,z],"row":[x,y,z],"column":[x,y,z]}`.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let plane: PlaneTransform =
            serde_json::from_str(json).map_err(|e| format!("Camera parse error: {e}"))?;
        if plane.row.length() == 0.0 || plane.column.length() == 0.0 {
            return Err("Camera parse error: row and column steps must be non-zero".to_string());
        }
        Ok(plane)
    }
}

impl ViewportTransform for PlaneTransform {
    fn world_to_canvas(&self, world: Point3) -> Point {
        let d = world - self.origin;
        Point::new(
            d.dot(self.row) / self.row.dot(self.row),
            d.dot(self.column) / self.column.dot(self.column),
        )
    }

    fn canvas_to_world(&self, canvas: Point) -> Point3 {
        self.origin + self.row * canvas.x + self.column * canvas.y
    }
}
