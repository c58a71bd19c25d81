use std::collections::HashMap;

use crate::models::CoinId;
use crate::store::CoinItem;

/// Identity-keyed set of the coin items currently shown. Unordered; the
/// [`crate::store::SortedView`] carries the order.
#[derive(Debug, Default)]
pub struct WorkingSet {
    items: HashMap<CoinId, CoinItem>,
}

impl WorkingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless the coin is already present. Returns false for duplicates,
    /// leaving the existing item (and its subscription) in place.
    pub(crate) fn insert(&mut self, item: CoinItem) -> bool {
        let id = item.id();
        if self.items.contains_key(&id) {
            return false;
        }
        self.items.insert(id, item);
        true
    }

    pub(crate) fn remove(&mut self, id: &CoinId) -> Option<CoinItem> {
        self.items.remove(id)
    }

    pub(crate) fn clear(&mut self) -> usize {
        let count = self.items.len();
        self.items.clear();
        count
    }

    pub fn get(&self, id: &CoinId) -> Option<&CoinItem> {
        self.items.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &CoinId) -> Option<&mut CoinItem> {
        self.items.get_mut(id)
    }

    pub fn contains(&self, id: &CoinId) -> bool {
        self.items.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CoinItem> {
        self.items.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch;
    use crate::models::{Amount, Coin};

    #[test]
    fn test_duplicate_insert_keeps_single_subscription() {
        let (handle, _mailbox) = dispatch::channel();
        let coin = Coin::new(Amount::from_sat(1), 1);
        let mut set = WorkingSet::new();

        assert!(set.insert(CoinItem::new(coin.clone(), &handle)));
        assert!(!set.insert(CoinItem::new(coin.clone(), &handle)));
        assert_eq!(set.len(), 1);
        // The rejected duplicate was dropped and released its subscription.
        assert_eq!(coin.subscriber_count(), 1);
    }

    #[test]
    fn test_remove_and_clear() {
        let (handle, _mailbox) = dispatch::channel();
        let a = Coin::new(Amount::from_sat(1), 1);
        let b = Coin::new(Amount::from_sat(2), 1);
        let mut set = WorkingSet::new();
        set.insert(CoinItem::new(a.clone(), &handle));
        set.insert(CoinItem::new(b.clone(), &handle));

        assert!(set.remove(&a.id()).is_some());
        assert!(set.remove(&a.id()).is_none());
        assert_eq!(a.subscriber_count(), 0);

        assert_eq!(set.clear(), 1);
        assert!(set.is_empty());
        assert_eq!(b.subscriber_count(), 0);
    }
}
