// history.rs
// Ordered, replace-wholesale store of solver iteration snapshots. A running
// solve lands as one atomic replace when it completes; there is no
// incremental append and snapshots never mutate once ingested.

use crate::solver::HistorySnapshot;

#[derive(Clone, Debug, Default)]
pub struct HistoryStore {
    snapshots: Vec<HistorySnapshot>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap the entire sequence. The caller resets its cursor to 0 alongside.
    pub fn replace(&mut self, snapshots: Vec<HistorySnapshot>) {
        self.snapshots = snapshots;
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Snapshot at `i`, clamped into range. `None` only when the store is empty.
    pub fn at(&self, i: usize) -> Option<&HistorySnapshot> {
        let last = self.snapshots.len().checked_sub(1)?;
        self.snapshots.get(i.min(last))
    }

    /// Inclusive prefix `[0..=i]`, clamped. Read-only derived view used to
    /// build chart series.
    pub fn prefix(&self, i: usize) -> &[HistorySnapshot] {
        match self.snapshots.len().checked_sub(1) {
            Some(last) => &self.snapshots[..=i.min(last)],
            None => &[],
        }
    }

    pub fn last(&self) -> Option<&HistorySnapshot> {
        self.snapshots.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshots(n: u64) -> Vec<HistorySnapshot> {
        (0..n)
            .map(|i| HistorySnapshot {
                iteration: i,
                cost: 100.0 - i as f64,
                temperature: None,
                route: Default::default(),
            })
            .collect()
    }

    #[test]
    fn at_clamps_out_of_range_indices() {
        let mut store = HistoryStore::new();
        store.replace(snapshots(3));
        assert_eq!(store.at(0).unwrap().iteration, 0);
        assert_eq!(store.at(2).unwrap().iteration, 2);
        assert_eq!(store.at(1_000_000).unwrap().iteration, 2, "clamped to last");
    }

    #[test]
    fn empty_store_yields_nothing() {
        let store = HistoryStore::new();
        assert!(store.at(0).is_none());
        assert!(store.prefix(5).is_empty());
        assert!(store.last().is_none());
    }

    #[test]
    fn prefix_is_inclusive_and_clamped() {
        let mut store = HistoryStore::new();
        store.replace(snapshots(4));
        assert_eq!(store.prefix(0).len(), 1);
        assert_eq!(store.prefix(2).len(), 3);
        assert_eq!(store.prefix(99).len(), 4);
    }

    #[test]
    fn replace_is_wholesale() {
        let mut store = HistoryStore::new();
        store.replace(snapshots(5));
        store.replace(snapshots(2));
        assert_eq!(store.len(), 2);
        assert_eq!(store.at(4).unwrap().iteration, 1, "old tail is gone");
    }
}
