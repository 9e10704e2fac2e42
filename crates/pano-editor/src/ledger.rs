//! Global undo ledger: a time-ordered log of curve-lifecycle events across
//! every viewport.
//!
//! Entries are ordered by a monotonically increasing `sequence` owned by the
//! ledger, so the last entry is always the most recent action system-wide.
//! After any structural removal the ledger is rebuilt from the store's
//! contents instead of patched in place, keeping every `curve_index` in step
//! with the shifted finished lists.

use pano_core::{CurveSlot, LedgerEntry, ViewportId};

#[derive(Debug, Default)]
pub struct GlobalUndoLedger {
    entries: Vec<LedgerEntry>,
    /// Last sequence number handed out (0 = none yet).
    sequence: u64,
}

impl GlobalUndoLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_sequence(&mut self) -> u64 {
        self.sequence += 1;
        self.sequence
    }

    fn push(&mut self, viewport: ViewportId, slot: CurveSlot) -> u64 {
        let sequence = self.next_sequence();
        self.entries.push(LedgerEntry::new(viewport, slot, sequence));
        sequence
    }

    /// A viewport's active curve received its first point.
    pub fn record_start(&mut self, viewport: ViewportId) -> u64 {
        self.push(viewport, CurveSlot::Active)
    }

    /// A viewport's active curve was finalized at `curve_index`.
    pub fn record_finish(&mut self, viewport: ViewportId, curve_index: usize) -> u64 {
        self.push(viewport, CurveSlot::Finished(curve_index))
    }

    /// Drop the "curve started" entry of a viewport whose active curve is gone.
    pub fn retire_start(&mut self, viewport: ViewportId) {
        self.entries
            .retain(|e| !(e.viewport_id == viewport && e.is_active()));
    }

    /// The most recent action, if any.
    pub fn last(&self) -> Option<&LedgerEntry> {
        self.entries.last()
    }

    /// Remove and return the most recent action.
    pub fn pop(&mut self) -> Option<LedgerEntry> {
        self.entries.pop()
    }

    /// Replace every entry with ones derived from current store contents.
    ///
    /// Each item carries the sequence it was stamped with when recorded, so
    /// the rebuilt ledger keeps its chronological order while every index is
    /// re-derived from the item's current position.
    pub fn rebuild(&mut self, entries: impl IntoIterator<Item = LedgerEntry>) {
        let mut rebuilt: Vec<LedgerEntry> = entries.into_iter().collect();
        rebuilt.sort_by_key(|e| e.sequence);
        debug_assert!(
            rebuilt.windows(2).all(|w| w[0].sequence < w[1].sequence),
            "ledger sequences must be unique"
        );
        self.entries = rebuilt;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sequences_strictly_increase() {
        let mut ledger = GlobalUndoLedger::new();
        let v1 = ViewportId::intern("V1");
        let v2 = ViewportId::intern("V2");
        let a = ledger.record_start(v1);
        let b = ledger.record_start(v2);
        let c = ledger.record_finish(v1, 0);
        assert!(a < b && b < c);
        assert_eq!(ledger.last().map(|e| e.sequence), Some(c));
    }

    #[test]
    fn retire_start_only_touches_that_viewport() {
        let mut ledger = GlobalUndoLedger::new();
        let v1 = ViewportId::intern("V1");
        let v2 = ViewportId::intern("V2");
        ledger.record_start(v1);
        ledger.record_start(v2);
        ledger.record_finish(v1, 0);
        ledger.retire_start(v1);
        let slots: Vec<_> = ledger
            .entries()
            .iter()
            .map(|e| (e.viewport_id, e.curve_index))
            .collect();
        assert_eq!(
            slots,
            vec![(v2, CurveSlot::Active), (v1, CurveSlot::Finished(0))]
        );
    }

    #[test]
    fn rebuild_sorts_by_sequence_and_keeps_counter() {
        let mut ledger = GlobalUndoLedger::new();
        let v1 = ViewportId::intern("V1");
        ledger.record_start(v1);
        ledger.record_finish(v1, 0);
        ledger.record_finish(v1, 1);
        ledger.rebuild([
            LedgerEntry::new(v1, CurveSlot::Finished(0), 3),
            LedgerEntry::new(v1, CurveSlot::Active, 1),
        ]);
        assert_eq!(
            ledger.entries(),
            &[
                LedgerEntry::new(v1, CurveSlot::Active, 1),
                LedgerEntry::new(v1, CurveSlot::Finished(0), 3),
            ]
        );
        // The counter never rewinds, even after a rebuild
        assert_eq!(ledger.record_start(v1), 4);
    }

    #[test]
    fn pop_on_empty_is_none() {
        let mut ledger = GlobalUndoLedger::new();
        assert!(ledger.pop().is_none());
        assert!(ledger.is_empty());
    }
}
