//! Sorted, selectable coin list kept in sync with a concurrently mutated wallet.
//!
//! ## Threading
//! [`CoinListViewModel`] is confined to the thread that created it (it is
//! neither `Send` nor `Sync`). Wallet threads never touch it: their collection
//! and per-coin notifications are posted to a queue, and the owning thread
//! applies them in arrival order with [`CoinListViewModel::process_pending`].
//!
//! ## Trigger map
//! | change                  | working set | view          | checkboxes | status column |
//! |-------------------------|-------------|---------------|------------|---------------|
//! | Add / Remove / Reset    | yes         | insert/remove | yes        | yes           |
//! | `selected`              |             |               | yes        |               |
//! | `unspent` -> false      | remove      | remove        | yes        | yes           |
//! | `status`                |             | if sorted by  |            | yes           |
//! | `amount`                |             | if sorted by  |            |               |
//! | `anonymity_set`         |             | if sorted by  | yes        |               |
//! | history resolved        |             | if sorted by  |            |               |

use std::collections::VecDeque;
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;

use crate::config::CoinListConfig;
use crate::constants::{MAX_PENDING_EVENTS, STATUS_COLUMN_COLLAPSED_WIDTH};
use crate::dispatch::{self, CoinListMessage, DispatchHandle, Mailbox};
use crate::events::CoinListEvent;
use crate::history::{HistoryProvider, HistoryRefresher};
use crate::models::{Coin, CoinId, CoinProperty};
use crate::observe::Subscription;
use crate::source::{CoinSource, CollectionChange};
use crate::stats::SharedProjectionStats;
use crate::store::{
    AggregateState, CoinItem, SelectionFilter, SortComparator, SortKey, SortOrder, SortPolicy,
    SortedView, TriState, WorkingSet,
};

/// Outbound [`CoinListEvent`]s are buffered until the owner calls
/// [`CoinListViewModel::drain_events`], which it should do after each pump.
pub struct CoinListViewModel {
    config: CoinListConfig,
    privacy_threshold: u32,
    working_set: WorkingSet,
    view: SortedView,
    sort: SortPolicy,
    aggregates: AggregateState,
    focused: Option<CoinId>,
    events: VecDeque<CoinListEvent>,
    dispatch: DispatchHandle,
    mailbox: Mailbox,
    history: HistoryRefresher,
    stats: SharedProjectionStats,
    _source_subscription: Option<Subscription>,
    // Confines the view model to its creating thread.
    _not_send: PhantomData<Rc<()>>,
}

impl CoinListViewModel {
    /// Build the list over `source`: subscribe to its changes, then load every
    /// coin that is currently unspent. History lookups run on `runtime`.
    pub fn new(
        config: CoinListConfig,
        source: &dyn CoinSource,
        history: Arc<dyn HistoryProvider>,
        runtime: Handle,
    ) -> Self {
        let mut model = Self::detached(config, history, runtime);

        // Subscribe before the snapshot; an Add racing with it is deduplicated
        // by identity when processed.
        let handle = model.dispatch.clone();
        model._source_subscription = Some(source.subscribe(Box::new(move |change: &CollectionChange| {
            handle.source_changed(change.clone());
        })));

        let seed: Vec<Arc<Coin>> = source
            .coins()
            .into_iter()
            .filter(|coin| coin.is_unspent())
            .collect();
        tracing::debug!(coins = seed.len(), "seeding coin list");
        model.insert_coins(seed);
        model.after_membership_change();
        model
    }

    /// Build an empty list fed only through [`Self::dispatcher`].
    pub fn detached(
        config: CoinListConfig,
        history: Arc<dyn HistoryProvider>,
        runtime: Handle,
    ) -> Self {
        let (dispatch, mailbox) = dispatch::channel();
        let stats = SharedProjectionStats::new();
        let history = HistoryRefresher::new(history, runtime, dispatch.clone(), stats.clone());

        let mut model = Self {
            privacy_threshold: config.privacy_level_strong,
            view: SortedView::new(config.reset_threshold),
            config,
            working_set: WorkingSet::new(),
            sort: SortPolicy::new(SortComparator::default()),
            aggregates: AggregateState::default(),
            focused: None,
            events: VecDeque::new(),
            dispatch,
            mailbox,
            history,
            stats,
            _source_subscription: None,
            _not_send: PhantomData,
        };
        model.recompute_selection();
        model.recompute_status_column();
        model
    }

    /// Cloneable, `Send` handle for posting notifications from other threads.
    pub fn dispatcher(&self) -> DispatchHandle {
        self.dispatch.clone()
    }

    pub fn stats(&self) -> SharedProjectionStats {
        self.stats.clone()
    }

    pub fn config(&self) -> &CoinListConfig {
        &self.config
    }

    // ===== Message pump =====

    /// Apply every queued notification in arrival order. Returns how many were processed.
    pub fn process_pending(&mut self) -> usize {
        let mut processed = 0;
        while let Some(message) = self.mailbox.try_next() {
            self.handle_message(message);
            processed += 1;
        }
        processed
    }

    /// Wait up to `timeout` for the first notification, then drain the queue.
    pub fn process_pending_timeout(&mut self, timeout: Duration) -> usize {
        let Some(first) = self.mailbox.next_timeout(timeout) else {
            return 0;
        };
        self.handle_message(first);
        1 + self.process_pending()
    }

    fn handle_message(&mut self, message: CoinListMessage) {
        match message {
            CoinListMessage::SourceChanged(change) => self.apply_source_change(change),
            CoinListMessage::CoinChanged { id, property } => self.apply_coin_change(id, property),
            CoinListMessage::HistoryResolved {
                id,
                generation,
                history,
            } => self.apply_history(id, generation, history),
        }
    }

    // ===== Source synchronization =====

    fn apply_source_change(&mut self, change: CollectionChange) {
        tracing::debug!(kind = change.kind(), coins = change.len(), "collection changed");
        match change {
            CollectionChange::Add(coins) => {
                self.stats.record_adds(coins.len());
                let unspent: Vec<Arc<Coin>> =
                    coins.into_iter().filter(|coin| coin.is_unspent()).collect();
                self.insert_coins(unspent);
            }
            CollectionChange::Remove(coins) => {
                self.stats.record_removes(coins.len());
                let ids: Vec<CoinId> = coins.iter().map(|coin| coin.id()).collect();
                self.remove_ids(&ids);
            }
            CollectionChange::Reset => {
                self.stats.record_reset();
                self.clear();
            }
        }
        self.after_membership_change();
    }

    fn insert_coins(&mut self, coins: Vec<Arc<Coin>>) {
        let mut inserted = Vec::with_capacity(coins.len());
        for coin in coins {
            let id = coin.id();
            if self.working_set.contains(&id) {
                tracing::trace!(coin = %id, "coin already listed");
                continue;
            }
            self.working_set.insert(CoinItem::new(coin, &self.dispatch));
            inserted.push(id);
        }
        let comparator = self.sort.comparator();
        self.view
            .insert_batch(&inserted, &self.working_set, &comparator, &self.stats);
    }

    fn remove_ids(&mut self, ids: &[CoinId]) {
        let removed: Vec<CoinId> = ids
            .iter()
            .filter(|id| self.working_set.remove(id).is_some())
            .copied()
            .collect();
        if removed.len() != ids.len() {
            tracing::trace!(
                requested = ids.len(),
                removed = removed.len(),
                "remove named coins not in the list"
            );
        }
        self.view.remove_batch(&removed, &self.stats);
        for id in &removed {
            self.history.forget(id);
        }
        if self.focused.is_some_and(|id| removed.contains(&id)) {
            self.focused = None;
        }
    }

    fn clear(&mut self) {
        let dropped = self.working_set.clear();
        self.view.clear();
        self.history.forget_all();
        self.focused = None;
        tracing::debug!(dropped, "coin list reset");
    }

    fn after_membership_change(&mut self) {
        debug_assert_eq!(self.view.len(), self.working_set.len());
        self.recompute_selection();
        self.recompute_status_column();
        self.refresh_histories();
    }

    fn refresh_histories(&mut self) {
        let coins: Vec<Arc<Coin>> = self
            .view
            .ids()
            .iter()
            .filter_map(|id| self.working_set.get(id))
            .map(|item| item.coin().clone())
            .collect();
        self.history.refresh(coins.iter());
    }

    // ===== Per-coin changes =====

    fn apply_coin_change(&mut self, id: CoinId, property: CoinProperty) {
        let Some(item) = self.working_set.get_mut(&id) else {
            tracing::trace!(coin = %id, ?property, "change for coin not in list");
            return;
        };
        if !item.refresh(property) {
            return;
        }
        let still_unspent = item.is_unspent();
        self.stats.record_property_change();

        match property {
            CoinProperty::Selected => {
                self.push_event(CoinListEvent::FocusChanged(id));
                self.recompute_selection();
            }
            CoinProperty::Unspent => {
                if !still_unspent {
                    tracing::debug!(coin = %id, "coin spent, removing from list");
                    self.remove_ids(&[id]);
                    self.after_membership_change();
                }
            }
            CoinProperty::Status => {
                self.recompute_status_column();
                self.reposition_if_sorted_by(id, property);
            }
            CoinProperty::Amount => {
                self.reposition_if_sorted_by(id, property);
            }
            CoinProperty::AnonymitySet => {
                self.recompute_selection();
                self.reposition_if_sorted_by(id, property);
            }
        }
    }

    fn apply_history(&mut self, id: CoinId, generation: u64, history: String) {
        if !self.working_set.contains(&id) || !self.history.accept(id, generation) {
            tracing::trace!(coin = %id, generation, "dropping stale history result");
            self.stats.record_history_stale();
            return;
        }
        let Some(item) = self.working_set.get_mut(&id) else {
            return;
        };
        self.stats.record_history_resolved();
        if item.set_history(history) && self.sort.comparator().key == SortKey::History {
            let comparator = self.sort.comparator();
            self.view
                .reposition(id, &self.working_set, &comparator, &self.stats);
        }
    }

    fn reposition_if_sorted_by(&mut self, id: CoinId, property: CoinProperty) {
        let comparator = self.sort.comparator();
        if comparator.key.depends_on(property) {
            self.view
                .reposition(id, &self.working_set, &comparator, &self.stats);
        }
    }

    // ===== Aggregates =====

    fn recompute_selection(&mut self) {
        if self
            .aggregates
            .recompute_selection(&self.working_set, self.privacy_threshold)
        {
            tracing::trace!(aggregates = ?self.aggregates, "selection state changed");
        }
    }

    fn recompute_status_column(&mut self) {
        self.aggregates.recompute_status_column(&self.working_set);
    }

    pub fn selection_state(&self, filter: SelectionFilter) -> TriState {
        self.aggregates.get(filter)
    }

    pub fn aggregates(&self) -> AggregateState {
        self.aggregates
    }

    pub fn status_column_visible(&self) -> bool {
        self.aggregates.status_column_visible
    }

    pub fn status_column_width(&self) -> u16 {
        if self.aggregates.status_column_visible {
            self.config.status_column_width
        } else {
            STATUS_COLUMN_COLLAPSED_WIDTH
        }
    }

    pub fn privacy_threshold(&self) -> u32 {
        self.privacy_threshold
    }

    pub fn set_privacy_threshold(&mut self, threshold: u32) {
        if self.privacy_threshold != threshold {
            self.privacy_threshold = threshold;
            self.recompute_selection();
        }
    }

    // ===== Selection commands =====

    pub fn select_matching(&mut self, filter: SelectionFilter) {
        self.set_selected_matching(filter, true);
    }

    pub fn deselect_matching(&mut self, filter: SelectionFilter) {
        self.set_selected_matching(filter, false);
    }

    /// Checkbox click semantics: `Selected` selects every matching coin,
    /// `Deselected` deselects them, and `Mixed` resolves to all deselected.
    pub fn apply_check_box(&mut self, filter: SelectionFilter, requested: TriState) {
        match requested {
            TriState::Selected => self.select_matching(filter),
            TriState::Deselected => self.deselect_matching(filter),
            TriState::Mixed => {
                self.deselect_matching(filter);
                self.aggregates.set(filter, TriState::Deselected);
            }
        }
    }

    /// Toggle one coin's selection. Unknown ids are ignored.
    pub fn set_coin_selected(&mut self, id: CoinId, selected: bool) {
        if self.write_selected(id, selected) {
            self.recompute_selection();
        }
    }

    fn set_selected_matching(&mut self, filter: SelectionFilter, selected: bool) {
        let threshold = self.privacy_threshold;
        let targets: Vec<CoinId> = self
            .view
            .ids()
            .iter()
            .filter_map(|id| self.working_set.get(id))
            .filter(|item| filter.matches(item.anonymity_set(), threshold))
            .map(|item| item.id())
            .collect();

        for id in &targets {
            self.write_selected(*id, selected);
        }
        self.recompute_selection();
    }

    /// Write through to the coin and update the cache in one step. The write
    /// is unconditional: the cache may lag a change still queued from another
    /// thread. Echoes of the write find nothing to change.
    fn write_selected(&mut self, id: CoinId, selected: bool) -> bool {
        let Some(item) = self.working_set.get_mut(&id) else {
            return false;
        };
        item.coin().set_selected(selected);
        if item.cache_selected(selected) {
            self.push_event(CoinListEvent::FocusChanged(id));
            true
        } else {
            false
        }
    }

    // ===== Sorting =====

    pub fn sort_direction(&self, key: SortKey) -> SortOrder {
        self.sort.direction(key)
    }

    /// Set one column's sort direction; any other active column is cleared.
    pub fn set_sort_direction(&mut self, key: SortKey, order: SortOrder) {
        if let Some(comparator) = self.sort.set_direction(key, order) {
            tracing::debug!(?comparator, "sort order changed");
            self.view
                .rebuild(&self.working_set, &comparator, &self.stats);
        }
        debug_assert!(self.sort.active_count() <= 1);
    }

    pub fn comparator(&self) -> SortComparator {
        self.sort.comparator()
    }

    // ===== Focus and mixing queue =====

    pub fn focused(&self) -> Option<&CoinItem> {
        self.focused.and_then(|id| self.working_set.get(&id))
    }

    /// Focus a listed coin, or clear focus with `None`. Unlisted ids clear focus.
    pub fn set_focused(&mut self, id: Option<CoinId>) {
        self.focused = id.filter(|id| self.working_set.contains(id));
    }

    pub fn can_dequeue(&self) -> bool {
        self.focused()
            .is_some_and(|item| item.status().is_mixing())
    }

    pub fn enqueue_focused(&mut self) {
        if let Some(id) = self.focused {
            self.push_event(CoinListEvent::EnqueueRequested(id));
        }
    }

    pub fn dequeue_focused(&mut self) {
        if self.can_dequeue() {
            self.push_event(CoinListEvent::DequeueRequested);
        }
    }

    /// Take every buffered event, oldest first.
    ///
    /// The buffer holds at most [`MAX_PENDING_EVENTS`]; once full, the oldest
    /// event is dropped for each new one.
    pub fn drain_events(&mut self) -> Vec<CoinListEvent> {
        self.events.drain(..).collect()
    }

    fn push_event(&mut self, event: CoinListEvent) {
        if self.events.len() == MAX_PENDING_EVENTS {
            self.events.pop_front();
            tracing::trace!("event buffer full, dropping oldest event");
        }
        self.events.push_back(event);
    }

    // ===== Read access =====

    /// Listed coins in display order.
    pub fn coins(&self) -> impl Iterator<Item = &CoinItem> {
        self.view
            .ids()
            .iter()
            .filter_map(|id| self.working_set.get(id))
    }

    pub fn ids(&self) -> &[CoinId] {
        self.view.ids()
    }

    pub fn get(&self, id: &CoinId) -> Option<&CoinItem> {
        self.working_set.get(id)
    }

    pub fn len(&self) -> usize {
        self.working_set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.working_set.is_empty()
    }
}
