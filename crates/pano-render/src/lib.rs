pub mod hit;
pub mod paint;
pub mod sink;

pub use hit::hit_test;
pub use paint::{
    CurveGeometry, MEASURE_LABEL_ID, MEASURE_MARKS_ID, curve_uid, paint_center, paint_curve,
    paint_length_label, paint_measure_label, paint_measure_marks,
};
pub use sink::{DrawList, DrawingSink, Primitive};
