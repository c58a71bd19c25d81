use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use uuid::Uuid;

use crate::models::{Amount, CoinStatus};
use crate::observe::{Observers, Subscription};

/// Identity of a coin. Unique per [`Coin`] allocation, so two wrappers of the
/// same coin always compare equal even across resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoinId(Uuid);

impl CoinId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CoinId {
    fn default() -> Self {
        Self::new()
    }
}

/// Short form (first 8 hex digits) for logs and tables.
impl fmt::Display for CoinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let simple = self.0.simple().to_string();
        f.write_str(&simple[..8])
    }
}

/// Mutable coin fields the coin list watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoinProperty {
    Selected,
    Unspent,
    Status,
    Amount,
    AnonymitySet,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinState {
    pub amount: Amount,
    pub anonymity_set: u32,
    pub status: CoinStatus,
    pub selected: bool,
    pub unspent: bool,
}

impl CoinState {
    /// A confirmed, unspent, unselected coin.
    pub fn new(amount: Amount, anonymity_set: u32) -> Self {
        Self {
            amount,
            anonymity_set,
            status: CoinStatus::Confirmed,
            selected: false,
            unspent: true,
        }
    }
}

/// A coin owned by the wallet service. Shared between the wallet thread and
/// the coin list; every setter notifies subscribers on the calling thread
/// when the value actually changes.
pub struct Coin {
    id: CoinId,
    state: RwLock<CoinState>,
    observers: Observers<CoinProperty>,
}

impl Coin {
    pub fn new(amount: Amount, anonymity_set: u32) -> Arc<Self> {
        Self::with_state(CoinState::new(amount, anonymity_set))
    }

    pub fn with_state(state: CoinState) -> Arc<Self> {
        Arc::new(Self {
            id: CoinId::new(),
            state: RwLock::new(state),
            observers: Observers::new(),
        })
    }

    pub fn id(&self) -> CoinId {
        self.id
    }

    pub fn snapshot(&self) -> CoinState {
        self.state.read().clone()
    }

    pub fn amount(&self) -> Amount {
        self.state.read().amount
    }

    pub fn anonymity_set(&self) -> u32 {
        self.state.read().anonymity_set
    }

    pub fn status(&self) -> CoinStatus {
        self.state.read().status
    }

    pub fn is_selected(&self) -> bool {
        self.state.read().selected
    }

    pub fn is_unspent(&self) -> bool {
        self.state.read().unspent
    }

    pub fn set_selected(&self, selected: bool) -> bool {
        self.update(CoinProperty::Selected, |s| replace(&mut s.selected, selected))
    }

    pub fn set_unspent(&self, unspent: bool) -> bool {
        self.update(CoinProperty::Unspent, |s| replace(&mut s.unspent, unspent))
    }

    pub fn set_status(&self, status: CoinStatus) -> bool {
        self.update(CoinProperty::Status, |s| replace(&mut s.status, status))
    }

    pub fn set_amount(&self, amount: Amount) -> bool {
        self.update(CoinProperty::Amount, |s| replace(&mut s.amount, amount))
    }

    pub fn set_anonymity_set(&self, anonymity_set: u32) -> bool {
        self.update(CoinProperty::AnonymitySet, |s| {
            replace(&mut s.anonymity_set, anonymity_set)
        })
    }

    /// Register a property-change listener. Dropping the returned
    /// [`Subscription`] unregisters it.
    pub fn subscribe(
        self: &Arc<Self>,
        listener: impl Fn(&CoinProperty) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.observers.add(listener);
        let coin: Weak<Coin> = Arc::downgrade(self);
        Subscription::new(move || {
            if let Some(coin) = coin.upgrade() {
                coin.observers.remove(id);
            }
        })
    }

    pub fn subscriber_count(&self) -> usize {
        self.observers.len()
    }

    fn update(&self, property: CoinProperty, apply: impl FnOnce(&mut CoinState) -> bool) -> bool {
        // The write guard is released before listeners run.
        let changed = apply(&mut self.state.write());
        if changed {
            self.observers.notify(&property);
        }
        changed
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

impl fmt::Debug for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coin")
            .field("id", &self.id)
            .field("state", &*self.state.read())
            .field("observers", &self.observers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_new_coin_is_confirmed_and_unspent() {
        let coin = Coin::new(Amount::from_sat(1_000), 3);
        let state = coin.snapshot();
        assert!(state.unspent);
        assert!(!state.selected);
        assert_eq!(state.status, CoinStatus::Confirmed);
        assert_eq!(coin.anonymity_set(), 3);
    }

    #[test]
    fn test_ids_are_unique_per_coin() {
        let a = Coin::new(Amount::from_sat(1), 1);
        let b = Coin::new(Amount::from_sat(1), 1);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.id().to_string().len(), 8);
    }

    #[test]
    fn test_setter_notifies_only_on_change() {
        let coin = Coin::new(Amount::from_sat(1_000), 1);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let _sub = coin.subscribe(move |p| sink.lock().push(*p));

        assert!(coin.set_selected(true));
        assert!(!coin.set_selected(true));
        assert!(coin.set_status(CoinStatus::MixingSigning));
        assert!(coin.set_unspent(false));

        assert_eq!(
            *seen.lock(),
            vec![
                CoinProperty::Selected,
                CoinProperty::Status,
                CoinProperty::Unspent
            ]
        );
    }

    #[test]
    fn test_dropping_subscription_unsubscribes() {
        let coin = Coin::new(Amount::from_sat(1_000), 1);
        let sub = coin.subscribe(|_| {});
        assert_eq!(coin.subscriber_count(), 1);
        drop(sub);
        assert_eq!(coin.subscriber_count(), 0);
    }

    #[test]
    fn test_listener_may_read_coin_during_notify() {
        let coin = Coin::new(Amount::from_sat(1_000), 1);
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        let weak = Arc::downgrade(&coin);
        let _sub = coin.subscribe(move |_| {
            if let Some(coin) = weak.upgrade() {
                *sink.lock() = Some(coin.amount());
            }
        });

        coin.set_amount(Amount::from_sat(42));
        assert_eq!(*seen.lock(), Some(Amount::from_sat(42)));
    }
}
