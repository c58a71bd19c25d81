use std::sync::{Arc, RwLock};

/// Counters describing what the coin list has processed
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProjectionStats {
    /// Coins offered by Add notifications
    pub adds: u64,
    /// Coins named by Remove notifications
    pub removes: u64,
    pub resets: u64,
    /// Per-coin property changes that altered a cached field
    pub property_changes: u64,
    /// Single positional inserts, removals and moves in the sorted view
    pub incremental_moves: u64,
    /// Full rebuilds of the sorted view (comparator change or oversized batch)
    pub full_rebuilds: u64,
    pub history_resolved: u64,
    pub history_failed: u64,
    /// History results dropped because a newer refresh had started
    pub history_stale: u64,
}

/// Thread-safe wrapper for projection stats. History lookups record their
/// failures from runtime worker threads.
#[derive(Debug, Clone)]
pub struct SharedProjectionStats {
    inner: Arc<RwLock<ProjectionStats>>,
}

impl Default for SharedProjectionStats {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedProjectionStats {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(ProjectionStats::default())),
        }
    }

    pub fn snapshot(&self) -> ProjectionStats {
        self.inner.read().map(|s| s.clone()).unwrap_or_default()
    }

    pub(crate) fn record_adds(&self, count: usize) {
        self.update(|s| s.adds += count as u64);
    }

    pub(crate) fn record_removes(&self, count: usize) {
        self.update(|s| s.removes += count as u64);
    }

    pub(crate) fn record_reset(&self) {
        self.update(|s| s.resets += 1);
    }

    pub(crate) fn record_property_change(&self) {
        self.update(|s| s.property_changes += 1);
    }

    pub(crate) fn record_moves(&self, count: usize) {
        self.update(|s| s.incremental_moves += count as u64);
    }

    pub(crate) fn record_rebuild(&self) {
        self.update(|s| s.full_rebuilds += 1);
    }

    pub(crate) fn record_history_resolved(&self) {
        self.update(|s| s.history_resolved += 1);
    }

    pub(crate) fn record_history_failed(&self) {
        self.update(|s| s.history_failed += 1);
    }

    pub(crate) fn record_history_stale(&self) {
        self.update(|s| s.history_stale += 1);
    }

    fn update(&self, apply: impl FnOnce(&mut ProjectionStats)) {
        if let Ok(mut stats) = self.inner.write() {
            apply(&mut stats);
        }
    }
}
