//! Hit testing: click → control-point handle lookup.
//!
//! The threshold is in screen pixels, so a handle is equally easy to grab
//! at any zoom level.

use pano_core::{Point, Point3, ViewportTransform};

/// Index of the first handle within `threshold_px` of `click`.
/// Returns `None` if no handle is hit.
pub fn hit_test(
    control_points: &[Point3],
    click: Point,
    transform: &impl ViewportTransform,
    threshold_px: f64,
) -> Option<usize> {
    control_points
        .iter()
        .position(|&world| transform.world_to_canvas(world).distance(click) <= threshold_px)
}
