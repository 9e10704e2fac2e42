//! Curve addressing and undo-ledger records.

use crate::id::ViewportId;
use serde::{Deserialize, Serialize};

/// Which of a viewport's curves something refers to.
///
/// Serialized as a single integer: `-1` for the active (unfinished) curve,
/// `n ≥ 0` for the finished curve at index `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum CurveSlot {
    Active,
    Finished(usize),
}

impl From<CurveSlot> for i64 {
    fn from(slot: CurveSlot) -> i64 {
        match slot {
            CurveSlot::Active => -1,
            CurveSlot::Finished(index) => index as i64,
        }
    }
}

impl TryFrom<i64> for CurveSlot {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(CurveSlot::Active),
            n if n >= 0 => Ok(CurveSlot::Finished(n as usize)),
            n => Err(format!("invalid curve index {n}")),
        }
    }
}

/// One curve-lifecycle event in the global undo ledger.
///
/// `sequence` is a process-wide, strictly increasing counter (not a clock),
/// so entries created in the same instant still have a total order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub viewport_id: ViewportId,
    pub curve_index: CurveSlot,
    pub sequence: u64,
}

impl LedgerEntry {
    pub fn new(viewport_id: ViewportId, curve_index: CurveSlot, sequence: u64) -> Self {
        Self {
            viewport_id,
            curve_index,
            sequence,
        }
    }

    pub fn is_active(&self) -> bool {
        self.curve_index == CurveSlot::Active
    }
}
