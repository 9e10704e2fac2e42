pub mod arc;
pub mod command;
pub mod config;
pub mod geom;
pub mod id;
pub mod model;
pub mod spline;
pub mod transform;

pub use arc::{
    arc_midpoint, estimate_scale, nearest_sample_index, polyline_length, sample_span_length,
    scale_or_unit, span_between,
};
pub use command::{Command, parse_script};
pub use config::{CurveConfig, CurveStyles, DrawStyle};
pub use geom::{Point, Point3, Vec2};
pub use id::ViewportId;
pub use model::{CurveSlot, LedgerEntry};
pub use spline::{MAX_SAMPLES_PER_SEGMENT, SplineInterpolator};
pub use transform::{PlaneTransform, ViewportTransform};
