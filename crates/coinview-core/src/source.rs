//! The authoritative coin collection and its change notifications.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::{Coin, CoinId};
use crate::observe::{Observers, Subscription};

/// A change to the wallet's coin collection. Batches may be empty.
#[derive(Debug, Clone)]
pub enum CollectionChange {
    Add(Vec<Arc<Coin>>),
    Remove(Vec<Arc<Coin>>),
    Reset,
}

impl CollectionChange {
    pub fn kind(&self) -> &'static str {
        match self {
            CollectionChange::Add(_) => "add",
            CollectionChange::Remove(_) => "remove",
            CollectionChange::Reset => "reset",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            CollectionChange::Add(coins) | CollectionChange::Remove(coins) => coins.len(),
            CollectionChange::Reset => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A coin collection that can be observed from any thread.
pub trait CoinSource: Send + Sync {
    /// Current contents, spent coins included.
    fn coins(&self) -> Vec<Arc<Coin>>;

    /// Listen for collection changes. Listeners run on the mutating thread.
    fn subscribe(
        &self,
        listener: Box<dyn Fn(&CollectionChange) + Send + Sync>,
    ) -> Subscription;
}

/// In-memory observable coin collection, as kept by a wallet service.
///
/// Spent coins stay in the collection until removed; it is the coin list's job
/// to hide them.
#[derive(Debug, Clone, Default)]
pub struct WalletCoins {
    inner: Arc<WalletCoinsInner>,
}

#[derive(Debug, Default)]
struct WalletCoinsInner {
    coins: Mutex<Vec<Arc<Coin>>>,
    observers: Observers<CollectionChange>,
    // Serializes mutate+notify so listeners see changes in mutation order.
    emit: Mutex<()>,
}

impl WalletCoins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add coins, skipping ones already present. Notifies only when something
    /// was added.
    pub fn add(&self, coins: impl IntoIterator<Item = Arc<Coin>>) -> usize {
        let _emit = self.inner.emit.lock();
        let added: Vec<Arc<Coin>> = {
            let mut current = self.inner.coins.lock();
            let mut added = Vec::new();
            for coin in coins {
                if current.iter().any(|c| c.id() == coin.id()) {
                    continue;
                }
                current.push(coin.clone());
                added.push(coin);
            }
            added
        };

        let count = added.len();
        if count > 0 {
            self.inner.observers.notify(&CollectionChange::Add(added));
        }
        count
    }

    /// Remove coins by id, returning the ones that were present.
    pub fn remove(&self, ids: &[CoinId]) -> Vec<Arc<Coin>> {
        let _emit = self.inner.emit.lock();
        let removed: Vec<Arc<Coin>> = {
            let mut current = self.inner.coins.lock();
            let mut removed = Vec::new();
            current.retain(|coin| {
                if ids.contains(&coin.id()) {
                    removed.push(coin.clone());
                    false
                } else {
                    true
                }
            });
            removed
        };

        if !removed.is_empty() {
            self.inner
                .observers
                .notify(&CollectionChange::Remove(removed.clone()));
        }
        removed
    }

    pub fn clear(&self) {
        let _emit = self.inner.emit.lock();
        self.inner.coins.lock().clear();
        self.inner.observers.notify(&CollectionChange::Reset);
    }

    pub fn get(&self, id: CoinId) -> Option<Arc<Coin>> {
        self.inner
            .coins
            .lock()
            .iter()
            .find(|coin| coin.id() == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.coins.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.observers.len()
    }
}

impl CoinSource for WalletCoins {
    fn coins(&self) -> Vec<Arc<Coin>> {
        self.inner.coins.lock().clone()
    }

    fn subscribe(
        &self,
        listener: Box<dyn Fn(&CollectionChange) + Send + Sync>,
    ) -> Subscription {
        let id = self.inner.observers.add(listener);
        let inner = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = inner.upgrade() {
                inner.observers.remove(id);
            }
        })
    }
}
