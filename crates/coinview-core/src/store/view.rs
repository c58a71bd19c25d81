use std::cmp::Ordering;
use std::collections::HashSet;

use crate::models::CoinId;
use crate::stats::SharedProjectionStats;
use crate::store::{SortComparator, WorkingSet};

/// Sorted sequence of working-set ids.
///
/// Kept sorted incrementally: inserts go after any equal items, removals are
/// by identity. Batches larger than the reset threshold are applied as a
/// single stable re-sort instead; both paths produce the same order.
#[derive(Debug)]
pub struct SortedView {
    order: Vec<CoinId>,
    reset_threshold: usize,
}

impl SortedView {
    pub fn new(reset_threshold: usize) -> Self {
        Self {
            order: Vec::new(),
            reset_threshold,
        }
    }

    pub fn ids(&self) -> &[CoinId] {
        &self.order
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    pub fn position(&self, id: &CoinId) -> Option<usize> {
        self.order.iter().position(|candidate| candidate == id)
    }

    pub(crate) fn insert_batch(
        &mut self,
        ids: &[CoinId],
        items: &WorkingSet,
        comparator: &SortComparator,
        stats: &SharedProjectionStats,
    ) {
        if ids.len() > self.reset_threshold {
            self.order.extend_from_slice(ids);
            self.rebuild(items, comparator, stats);
            return;
        }
        for id in ids {
            self.insert_sorted(*id, items, comparator);
        }
        stats.record_moves(ids.len());
    }

    pub(crate) fn remove_batch(&mut self, ids: &[CoinId], stats: &SharedProjectionStats) {
        if ids.len() > self.reset_threshold {
            let doomed: HashSet<&CoinId> = ids.iter().collect();
            self.order.retain(|id| !doomed.contains(id));
            stats.record_rebuild();
            return;
        }
        let mut moved = 0;
        for id in ids {
            if let Some(pos) = self.position(id) {
                self.order.remove(pos);
                moved += 1;
            }
        }
        stats.record_moves(moved);
    }

    pub(crate) fn clear(&mut self) {
        self.order.clear();
    }

    /// Full stable re-sort, used when the comparator changes.
    pub(crate) fn rebuild(
        &mut self,
        items: &WorkingSet,
        comparator: &SortComparator,
        stats: &SharedProjectionStats,
    ) {
        self.order
            .sort_by(|a, b| compare_ids(items, comparator, a, b));
        stats.record_rebuild();
    }

    /// Move one item whose sort field changed. Returns true if its index changed.
    pub(crate) fn reposition(
        &mut self,
        id: CoinId,
        items: &WorkingSet,
        comparator: &SortComparator,
        stats: &SharedProjectionStats,
    ) -> bool {
        let Some(old) = self.position(&id) else {
            return false;
        };
        self.order.remove(old);
        let new = self.insert_sorted(id, items, comparator);
        stats.record_moves(1);
        old != new
    }

    fn insert_sorted(&mut self, id: CoinId, items: &WorkingSet, comparator: &SortComparator) -> usize {
        let pos = self
            .order
            .partition_point(|candidate| compare_ids(items, comparator, candidate, &id) != Ordering::Greater);
        self.order.insert(pos, id);
        pos
    }
}

fn compare_ids(items: &WorkingSet, comparator: &SortComparator, a: &CoinId, b: &CoinId) -> Ordering {
    match (items.get(a), items.get(b)) {
        (Some(a), Some(b)) => comparator.compare(a, b),
        _ => Ordering::Equal,
    }
}
