use std::cmp::Ordering;

use crate::models::CoinProperty;
use crate::store::CoinItem;

/// Direction shown on a sortable column header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    #[default]
    None,
    Increasing,
    Decreasing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Amount,
    /// Anonymity set size
    Privacy,
    History,
    Status,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Amount,
        SortKey::Privacy,
        SortKey::History,
        SortKey::Status,
    ];

    /// Whether a change to `property` can move an item under this key.
    pub fn depends_on(self, property: CoinProperty) -> bool {
        matches!(
            (self, property),
            (SortKey::Amount, CoinProperty::Amount)
                | (SortKey::Privacy, CoinProperty::AnonymitySet)
                | (SortKey::Status, CoinProperty::Status)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Compares items on a single field. Equal fields compare `Equal`; callers
/// rely on stable sorting to keep ties in their existing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortComparator {
    pub key: SortKey,
    pub direction: Direction,
}

impl SortComparator {
    pub const fn new(key: SortKey, direction: Direction) -> Self {
        Self { key, direction }
    }

    pub fn compare(&self, a: &CoinItem, b: &CoinItem) -> Ordering {
        let ascending = match self.key {
            SortKey::Amount => a.amount().cmp(&b.amount()),
            SortKey::Privacy => a.anonymity_set().cmp(&b.anonymity_set()),
            SortKey::History => a.history().cmp(b.history()),
            SortKey::Status => a.status().cmp(&b.status()),
        };
        match self.direction {
            Direction::Ascending => ascending,
            Direction::Descending => ascending.reverse(),
        }
    }
}

impl Default for SortComparator {
    fn default() -> Self {
        Self::new(SortKey::Amount, Direction::Descending)
    }
}

/// The four sort columns.
///
/// Stored as a single optional active comparator, so at most one column can
/// report a direction other than [`SortOrder::None`]. Clearing the active
/// column keeps the last comparator in force; the list is never unsorted.
#[derive(Debug, Clone)]
pub struct SortPolicy {
    active: Option<SortComparator>,
    comparator: SortComparator,
}

impl SortPolicy {
    pub fn new(initial: SortComparator) -> Self {
        Self {
            active: Some(initial),
            comparator: initial,
        }
    }

    pub fn direction(&self, key: SortKey) -> SortOrder {
        match self.active {
            Some(active) if active.key == key => match active.direction {
                Direction::Ascending => SortOrder::Increasing,
                Direction::Descending => SortOrder::Decreasing,
            },
            _ => SortOrder::None,
        }
    }

    /// Comparator currently ordering the view.
    pub fn comparator(&self) -> SortComparator {
        self.comparator
    }

    /// Set one column's direction. A non-`None` order deactivates the other
    /// three columns. Returns the new comparator when the view must re-sort.
    pub fn set_direction(&mut self, key: SortKey, order: SortOrder) -> Option<SortComparator> {
        let direction = match order {
            SortOrder::None => {
                if self.active.is_some_and(|active| active.key == key) {
                    self.active = None;
                }
                return None;
            }
            SortOrder::Increasing => Direction::Ascending,
            SortOrder::Decreasing => Direction::Descending,
        };

        let next = SortComparator::new(key, direction);
        self.active = Some(next);
        if next == self.comparator {
            return None;
        }
        self.comparator = next;
        Some(next)
    }

    pub fn active_count(&self) -> usize {
        SortKey::ALL
            .iter()
            .filter(|key| self.direction(**key) != SortOrder::None)
            .count()
    }
}

impl Default for SortPolicy {
    fn default() -> Self {
        Self::new(SortComparator::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_amount_descending() {
        let policy = SortPolicy::default();
        assert_eq!(policy.direction(SortKey::Amount), SortOrder::Decreasing);
        assert_eq!(policy.direction(SortKey::Privacy), SortOrder::None);
        assert_eq!(policy.active_count(), 1);
    }

    #[test]
    fn test_activating_one_key_clears_the_others() {
        let mut policy = SortPolicy::default();
        let changed = policy.set_direction(SortKey::Privacy, SortOrder::Increasing);

        assert_eq!(
            changed,
            Some(SortComparator::new(SortKey::Privacy, Direction::Ascending))
        );
        assert_eq!(policy.direction(SortKey::Amount), SortOrder::None);
        assert_eq!(policy.direction(SortKey::Privacy), SortOrder::Increasing);
        assert_eq!(policy.active_count(), 1);
    }

    #[test]
    fn test_clearing_active_key_keeps_comparator() {
        let mut policy = SortPolicy::default();
        assert_eq!(policy.set_direction(SortKey::Amount, SortOrder::None), None);
        assert_eq!(policy.active_count(), 0);
        assert_eq!(policy.comparator(), SortComparator::default());
    }

    #[test]
    fn test_clearing_inactive_key_is_noop() {
        let mut policy = SortPolicy::default();
        assert_eq!(policy.set_direction(SortKey::Status, SortOrder::None), None);
        assert_eq!(policy.direction(SortKey::Amount), SortOrder::Decreasing);
    }

    #[test]
    fn test_reactivating_same_comparator_needs_no_resort() {
        let mut policy = SortPolicy::default();
        policy.set_direction(SortKey::Amount, SortOrder::None);
        assert_eq!(policy.set_direction(SortKey::Amount, SortOrder::Decreasing), None);
        assert_eq!(policy.direction(SortKey::Amount), SortOrder::Decreasing);
    }

    #[test]
    fn test_flipping_direction_changes_comparator() {
        let mut policy = SortPolicy::default();
        let changed = policy.set_direction(SortKey::Amount, SortOrder::Increasing);
        assert_eq!(
            changed.map(|c| c.direction),
            Some(Direction::Ascending)
        );
    }

    #[test]
    fn test_history_is_not_moved_by_property_changes() {
        assert!(SortKey::Amount.depends_on(CoinProperty::Amount));
        assert!(SortKey::Privacy.depends_on(CoinProperty::AnonymitySet));
        assert!(!SortKey::History.depends_on(CoinProperty::Selected));
        assert!(!SortKey::Amount.depends_on(CoinProperty::Status));
    }
}
