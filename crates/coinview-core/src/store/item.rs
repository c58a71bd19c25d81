use std::sync::Arc;

use crate::dispatch::DispatchHandle;
use crate::models::{Amount, Coin, CoinId, CoinProperty, CoinState, CoinStatus};
use crate::observe::Subscription;

/// Presentation handle around one coin.
///
/// Fields are cached copies of the coin's state and only change on the owning
/// thread, when the matching property notification is processed. That keeps
/// the sorted view and aggregates consistent with what they were computed
/// from, whatever the wallet thread is doing meanwhile.
#[derive(Debug)]
pub struct CoinItem {
    coin: Arc<Coin>,
    state: CoinState,
    history: String,
    _subscription: Subscription,
}

impl CoinItem {
    pub(crate) fn new(coin: Arc<Coin>, dispatch: &DispatchHandle) -> Self {
        let id = coin.id();
        let handle = dispatch.clone();
        // Subscribe before taking the snapshot so no change falls in between.
        let subscription = coin.subscribe(move |property| handle.coin_changed(id, *property));
        let state = coin.snapshot();
        Self {
            coin,
            state,
            history: String::new(),
            _subscription: subscription,
        }
    }

    pub fn id(&self) -> CoinId {
        self.coin.id()
    }

    pub fn coin(&self) -> &Arc<Coin> {
        &self.coin
    }

    pub fn is_selected(&self) -> bool {
        self.state.selected
    }

    pub fn is_unspent(&self) -> bool {
        self.state.unspent
    }

    pub fn amount(&self) -> Amount {
        self.state.amount
    }

    pub fn anonymity_set(&self) -> u32 {
        self.state.anonymity_set
    }

    pub fn status(&self) -> CoinStatus {
        self.state.status
    }

    pub fn history(&self) -> &str {
        &self.history
    }

    /// Re-read one property from the coin. Returns true if the cached value changed.
    pub(crate) fn refresh(&mut self, property: CoinProperty) -> bool {
        let coin = &self.coin;
        match property {
            CoinProperty::Selected => replace(&mut self.state.selected, coin.is_selected()),
            CoinProperty::Unspent => replace(&mut self.state.unspent, coin.is_unspent()),
            CoinProperty::Status => replace(&mut self.state.status, coin.status()),
            CoinProperty::Amount => replace(&mut self.state.amount, coin.amount()),
            CoinProperty::AnonymitySet => {
                replace(&mut self.state.anonymity_set, coin.anonymity_set())
            }
        }
    }

    pub(crate) fn cache_selected(&mut self, selected: bool) -> bool {
        replace(&mut self.state.selected, selected)
    }

    pub(crate) fn set_history(&mut self, history: String) -> bool {
        replace(&mut self.history, history)
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
