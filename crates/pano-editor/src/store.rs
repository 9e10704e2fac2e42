//! Per-viewport curve state and the mutations that keep the undo ledger in
//! step with it.
//!
//! Each viewport has at most one active (in-progress) control-point list and
//! an ordered list of finished curves. State is created on first use.
//!
//! Invariants:
//! - A finished curve always has ≥ 2 control points.
//! - The ledger holds a `CurveSlot::Active` entry for a viewport exactly
//!   while that viewport's active list is non-empty.
//! - Every `CurveSlot::Finished(i)` entry names an existing finished curve.
//!
//! Every mutation returns whether state actually changed, so the caller can
//! decide whether to request a redraw.

use crate::ledger::GlobalUndoLedger;
use pano_core::{CurveSlot, LedgerEntry, Point3, ViewportId};
use serde::Serialize;
use std::collections::BTreeMap;

/// A finalized, immutable curve.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    points: Vec<Point3>,
    /// Ledger sequence of the "finished" event that created it.
    sequence: u64,
}

impl Curve {
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// One viewport's curves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewportCurveState {
    active: Vec<Point3>,
    /// Ledger sequence of the "curve started" event, while `active` is non-empty.
    active_sequence: Option<u64>,
    finished: Vec<Curve>,
}

impl ViewportCurveState {
    pub fn active(&self) -> &[Point3] {
        &self.active
    }

    pub fn finished(&self) -> &[Curve] {
        &self.finished
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.finished.is_empty()
    }

    fn clear_active(&mut self) {
        self.active.clear();
        self.active_sequence = None;
    }

    /// Ledger entries implied by this viewport's current contents.
    fn ledger_entries(&self, viewport: ViewportId) -> impl Iterator<Item = LedgerEntry> + '_ {
        let active = self
            .active_sequence
            .filter(|_| !self.active.is_empty())
            .map(|seq| LedgerEntry::new(viewport, CurveSlot::Active, seq));
        let finished = self
            .finished
            .iter()
            .enumerate()
            .map(move |(i, c)| LedgerEntry::new(viewport, CurveSlot::Finished(i), c.sequence));
        active.into_iter().chain(finished)
    }
}

/// Counts for one viewport in a [`CurveState`] snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportSummary {
    pub viewport_id: ViewportId,
    pub active_points: usize,
    pub finished_curves: usize,
}

/// Inspection snapshot of every viewport plus the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurveState {
    pub per_viewport: Vec<ViewportSummary>,
    pub ledger: Vec<LedgerEntry>,
}

/// Owns every viewport's curves and the global undo ledger.
#[derive(Debug, Default)]
pub struct CurveStore {
    viewports: BTreeMap<ViewportId, ViewportCurveState>,
    ledger: GlobalUndoLedger,
}

impl CurveStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn viewport(&self, viewport: ViewportId) -> Option<&ViewportCurveState> {
        self.viewports.get(&viewport)
    }

    /// Active control points, empty if the viewport has none.
    pub fn active(&self, viewport: ViewportId) -> &[Point3] {
        self.viewports
            .get(&viewport)
            .map(ViewportCurveState::active)
            .unwrap_or(&[])
    }

    pub fn finished(&self, viewport: ViewportId) -> &[Curve] {
        self.viewports
            .get(&viewport)
            .map(ViewportCurveState::finished)
            .unwrap_or(&[])
    }

    pub fn ledger(&self) -> &GlobalUndoLedger {
        &self.ledger
    }

    // ─── Curve lifecycle ─────────────────────────────────────────────────

    /// Append a world point to the viewport's active curve. The first point
    /// of a curve records a "curve started" ledger entry.
    pub fn add_point(&mut self, viewport: ViewportId, world: Point3) -> bool {
        let state = self.viewports.entry(viewport).or_default();
        if state.active.is_empty() {
            state.active_sequence = Some(self.ledger.record_start(viewport));
            log::debug!("curve started in {viewport}");
        }
        state.active.push(world);
        true
    }

    /// Rewind the active curve at a clicked handle.
    ///
    /// The last handle removes just that point; any earlier handle drops every
    /// point after it, keeping the clicked one.
    pub fn truncate_at(&mut self, viewport: ViewportId, handle: usize) -> bool {
        let Some(state) = self.viewports.get_mut(&viewport) else {
            return false;
        };
        let len = state.active.len();
        if handle >= len {
            log::debug!("truncate ignored: handle {handle} of {len} in {viewport}");
            return false;
        }

        if handle == len - 1 {
            state.active.pop();
        } else {
            state.active.truncate(handle + 1);
        }

        if state.active.is_empty() {
            state.clear_active();
            self.ledger.retire_start(viewport);
        }
        true
    }

    /// Finalize the active curve if it has ≥ 2 points; the active list is
    /// cleared either way. Shorter attempts are discarded together with their
    /// "curve started" entry.
    pub fn finish(&mut self, viewport: ViewportId) -> bool {
        let Some(state) = self.viewports.get_mut(&viewport) else {
            return false;
        };
        if state.active.is_empty() {
            return false;
        }

        let points = std::mem::take(&mut state.active);
        state.clear_active();
        self.ledger.retire_start(viewport);

        if points.len() < 2 {
            log::debug!("discarded {}-point curve in {viewport}", points.len());
            return true;
        }

        let index = state.finished.len();
        let sequence = self.ledger.record_finish(viewport, index);
        log::debug!("curve finished in {viewport}: #{index}, {} points", points.len());
        state.finished.push(Curve { points, sequence });
        true
    }

    /// Drop the viewport's active and finished curves and their ledger entries.
    pub fn clear_viewport(&mut self, viewport: ViewportId) -> bool {
        let Some(state) = self.viewports.remove(&viewport) else {
            return false;
        };
        self.rebuild_ledger();
        log::debug!("cleared {viewport}");
        !state.is_empty()
    }

    /// Drop every viewport's state and the whole ledger.
    pub fn clear_all(&mut self) -> bool {
        let changed = self.viewports.values().any(|s| !s.is_empty());
        self.viewports.clear();
        self.ledger.clear();
        log::debug!("cleared all viewports");
        changed
    }

    // ─── Undo ────────────────────────────────────────────────────────────

    /// Undo the single most recent curve action anywhere.
    ///
    /// Returns the undone entry, or `None` when the ledger is empty.
    pub fn undo_last(&mut self) -> Option<LedgerEntry> {
        let entry = self.ledger.pop()?;
        let viewport = entry.viewport_id;

        let Some(state) = self.viewports.get_mut(&viewport) else {
            self.bookkeeping_violation(&entry, "viewport has no state");
            return None;
        };

        match entry.curve_index {
            CurveSlot::Active => {
                if state.active.is_empty() {
                    self.bookkeeping_violation(&entry, "active curve is empty");
                    return None;
                }
                state.clear_active();
                log::debug!("undo: cleared active curve in {viewport}");
            }
            CurveSlot::Finished(index) => {
                if index >= state.finished.len() {
                    self.bookkeeping_violation(&entry, "finished curve index out of range");
                    return None;
                }
                state.finished.remove(index);
                self.rebuild_ledger();
                log::debug!("undo: removed finished curve #{index} in {viewport}");
            }
        }
        Some(entry)
    }

    /// Undo the most recent curve of one viewport: its active curve if it has
    /// points, otherwise its newest finished curve.
    pub fn clear_last(&mut self, viewport: ViewportId) -> bool {
        let Some(state) = self.viewports.get_mut(&viewport) else {
            return false;
        };

        if !state.active.is_empty() {
            state.clear_active();
        } else if state.finished.pop().is_none() {
            return false;
        }

        self.rebuild_ledger();
        log::debug!("clear-last in {viewport}");
        true
    }

    fn rebuild_ledger(&mut self) {
        let entries: Vec<LedgerEntry> = self
            .viewports
            .iter()
            .flat_map(|(&id, state)| state.ledger_entries(id))
            .collect();
        self.ledger.rebuild(entries);
    }

    /// A ledger entry named state that does not exist: an index/rebuild bug.
    /// Fails loudly in debug builds; release builds resync and carry on.
    fn bookkeeping_violation(&mut self, entry: &LedgerEntry, reason: &str) {
        if cfg!(debug_assertions) {
            panic!("ledger entry {entry:?} is stale: {reason}");
        }
        log::error!("ledger entry {entry:?} is stale: {reason}");
        self.rebuild_ledger();
    }

    // ─── Inspection ──────────────────────────────────────────────────────

    pub fn state(&self) -> CurveState {
        CurveState {
            per_viewport: self
                .viewports
                .iter()
                .map(|(&viewport_id, s)| ViewportSummary {
                    viewport_id,
                    active_points: s.active.len(),
                    finished_curves: s.finished.len(),
                })
                .collect(),
            ledger: self.ledger.entries().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    fn store_with(viewport: ViewportId, n: usize) -> CurveStore {
        let mut store = CurveStore::new();
        for i in 0..n {
            store.add_point(viewport, p(i as f64 * 10.0, 0.0));
        }
        store
    }

    #[test]
    fn first_point_records_start() {
        let vp = ViewportId::intern("store_start");
        let store = store_with(vp, 3);
        assert_eq!(store.active(vp).len(), 3);
        assert_eq!(
            store.ledger().entries(),
            &[LedgerEntry::new(vp, CurveSlot::Active, 1)]
        );
    }

    #[test]
    fn truncate_last_removes_one_point() {
        let vp = ViewportId::intern("store_trunc_last");
        let mut store = store_with(vp, 4);
        assert!(store.truncate_at(vp, 3));
        assert_eq!(store.active(vp).len(), 3);
    }

    #[test]
    fn truncate_interior_keeps_clicked_point() {
        let vp = ViewportId::intern("store_trunc_mid");
        for k in 0..4 {
            let mut store = store_with(vp, 5);
            assert!(store.truncate_at(vp, k));
            assert_eq!(store.active(vp).len(), k + 1);
            assert_eq!(store.active(vp)[k], p(k as f64 * 10.0, 0.0));
        }
    }

    #[test]
    fn truncating_to_empty_retires_start_entry() {
        let vp = ViewportId::intern("store_trunc_empty");
        let mut store = store_with(vp, 1);
        assert!(store.truncate_at(vp, 0));
        assert!(store.active(vp).is_empty());
        assert!(store.ledger().is_empty());
        assert!(!store.truncate_at(vp, 0));
    }

    #[test]
    fn short_curves_are_never_finished() {
        let vp = ViewportId::intern("store_short");
        let mut store = store_with(vp, 1);
        assert!(store.finish(vp));
        assert!(store.finished(vp).is_empty());
        assert!(store.active(vp).is_empty());
        assert!(store.ledger().is_empty());
        // Nothing left to finish
        assert!(!store.finish(vp));
    }

    #[test]
    fn finish_replaces_start_with_finish_entry() {
        let vp = ViewportId::intern("store_finish");
        let mut store = store_with(vp, 3);
        assert!(store.finish(vp));
        assert_eq!(store.finished(vp)[0].len(), 3);
        assert!(store.active(vp).is_empty());
        assert_eq!(
            store.ledger().entries(),
            &[LedgerEntry::new(vp, CurveSlot::Finished(0), 2)]
        );
    }

    #[test]
    fn undo_finished_curve_reindexes_later_curves() {
        let a = ViewportId::intern("store_reindex_a");
        let b = ViewportId::intern("store_reindex_b");
        let mut store = CurveStore::new();
        for _ in 0..3 {
            store.add_point(a, p(0.0, 0.0));
            store.add_point(a, p(1.0, 1.0));
            store.finish(a);
        }
        store.add_point(b, p(5.0, 5.0));

        // Point the newest entry at a's middle curve so undo has to shift #2
        store.ledger.rebuild([
            LedgerEntry::new(a, CurveSlot::Finished(0), 2),
            LedgerEntry::new(a, CurveSlot::Finished(2), 6),
            LedgerEntry::new(b, CurveSlot::Active, 7),
            LedgerEntry::new(a, CurveSlot::Finished(1), 8),
        ]);
        assert_eq!(
            store.undo_last(),
            Some(LedgerEntry::new(a, CurveSlot::Finished(1), 8))
        );

        // a's former #2 shifts down to #1 and keeps its original sequence
        assert_eq!(
            store.ledger().entries(),
            &[
                LedgerEntry::new(a, CurveSlot::Finished(0), 2),
                LedgerEntry::new(a, CurveSlot::Finished(1), 6),
                LedgerEntry::new(b, CurveSlot::Active, 7),
            ]
        );
        assert_eq!(store.finished(a).len(), 2);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "is stale")]
    fn stale_finished_entry_fails_loudly_in_debug() {
        let vp = ViewportId::intern("store_stale");
        let mut store = store_with(vp, 2);
        store.finish(vp);
        store
            .ledger
            .rebuild([LedgerEntry::new(vp, CurveSlot::Finished(5), 2)]);
        store.undo_last();
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "is stale")]
    fn entry_for_unknown_viewport_fails_loudly_in_debug() {
        let mut store = CurveStore::new();
        store.ledger.rebuild([LedgerEntry::new(
            ViewportId::intern("store_stale_missing"),
            CurveSlot::Active,
            1,
        )]);
        store.undo_last();
    }

    #[test]
    fn undo_on_empty_ledger_is_noop() {
        let mut store = CurveStore::new();
        assert_eq!(store.undo_last(), None);
    }

    #[test]
    fn clear_last_prefers_active_then_finished() {
        let vp = ViewportId::intern("store_clear_last");
        let mut store = store_with(vp, 2);
        store.finish(vp);
        store.add_point(vp, p(9.0, 9.0));

        assert!(store.clear_last(vp));
        assert!(store.active(vp).is_empty());
        assert_eq!(store.finished(vp).len(), 1);

        assert!(store.clear_last(vp));
        assert!(store.finished(vp).is_empty());
        assert!(store.ledger().is_empty());

        assert!(!store.clear_last(vp));
    }

    #[test]
    fn clear_viewport_leaves_others() {
        let a = ViewportId::intern("store_clear_a");
        let b = ViewportId::intern("store_clear_b");
        let mut store = store_with(a, 2);
        store.add_point(b, p(1.0, 1.0));
        store.finish(a);

        assert!(store.clear_viewport(a));
        assert!(store.viewport(a).is_none());
        assert_eq!(
            store.ledger().entries(),
            &[LedgerEntry::new(b, CurveSlot::Active, 2)]
        );
        assert!(!store.clear_viewport(a));
    }

    #[test]
    fn clear_all_empties_everything() {
        let a = ViewportId::intern("store_all_a");
        let mut store = store_with(a, 2);
        assert!(store.clear_all());
        assert!(store.ledger().is_empty());
        assert!(store.state().per_viewport.is_empty());
        assert!(!store.clear_all());
    }

    #[test]
    fn state_snapshot_counts() {
        let a = ViewportId::intern("store_state_a");
        let mut store = store_with(a, 2);
        store.finish(a);
        store.add_point(a, p(3.0, 3.0));
        assert_eq!(
            store.state().per_viewport,
            vec![ViewportSummary {
                viewport_id: a,
                active_points: 1,
                finished_curves: 1,
            }]
        );
    }
}
