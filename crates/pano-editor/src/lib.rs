pub mod ledger;
pub mod measure;
pub mod store;
pub mod tool;

pub use ledger::GlobalUndoLedger;
pub use measure::{MeasurementSelection, MeasurementSession, Selection, measure_between};
pub use store::{Curve, CurveState, CurveStore, ViewportCurveState, ViewportSummary};
pub use tool::{PanoramaCurveTool, ToolState, TransformSource, Uniform};
