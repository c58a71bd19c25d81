//! Listener registry shared by coins and coin sources.
//!
//! Listeners are invoked on whatever thread raised the change. They are
//! expected to do nothing heavier than posting a message to the consumer
//! queue; see [`crate::dispatch`].

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

pub(crate) struct Observers<E> {
    inner: Mutex<ObserverList<E>>,
}

struct ObserverList<E> {
    next_id: u64,
    entries: Vec<(u64, Callback<E>)>,
}

impl<E> Observers<E> {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(ObserverList {
                next_id: 0,
                entries: Vec::new(),
            }),
        }
    }

    pub(crate) fn add(&self, callback: impl Fn(&E) + Send + Sync + 'static) -> u64 {
        let mut list = self.inner.lock();
        let id = list.next_id;
        list.next_id += 1;
        list.entries.push((id, Arc::new(callback)));
        id
    }

    /// Returns false if the listener was already gone.
    pub(crate) fn remove(&self, id: u64) -> bool {
        let mut list = self.inner.lock();
        let before = list.entries.len();
        list.entries.retain(|(entry_id, _)| *entry_id != id);
        list.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub(crate) fn notify(&self, event: &E) {
        // Snapshot first: callbacks may subscribe or unsubscribe re-entrantly.
        let callbacks: Vec<Callback<E>> = self
            .inner
            .lock()
            .entries
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect();
        for callback in callbacks {
            callback(event);
        }
    }
}

impl<E> Default for Observers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Observers<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers").field("len", &self.len()).finish()
    }
}

/// Handle to a registered listener. The listener is released exactly once,
/// when the handle is dropped.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub(crate) fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}
