//! Dispatch boundary between producer threads and the coin list's owning thread.
//!
//! Producers never touch coin list state. They post [`CoinListMessage`]s
//! through a cloneable [`DispatchHandle`]; the owning thread drains the
//! [`Mailbox`] in arrival order.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

use crate::models::{CoinId, CoinProperty};
use crate::source::CollectionChange;

#[derive(Debug)]
pub(crate) enum CoinListMessage {
    SourceChanged(CollectionChange),
    CoinChanged {
        id: CoinId,
        property: CoinProperty,
    },
    HistoryResolved {
        id: CoinId,
        generation: u64,
        history: String,
    },
}

/// Sending half of the coin list queue. `Send + Clone`; safe to hand to any
/// thread that produces coin notifications.
#[derive(Debug, Clone)]
pub struct DispatchHandle {
    tx: Sender<CoinListMessage>,
}

impl DispatchHandle {
    /// Post a collection notification, for sources that do not implement
    /// [`crate::CoinSource`].
    pub fn source_changed(&self, change: CollectionChange) {
        self.post(CoinListMessage::SourceChanged(change));
    }

    /// Post a per-coin property notification.
    pub fn coin_changed(&self, id: CoinId, property: CoinProperty) {
        self.post(CoinListMessage::CoinChanged { id, property });
    }

    pub(crate) fn post(&self, message: CoinListMessage) {
        // The coin list may already be gone during teardown; that is fine.
        if let Err(err) = self.tx.send(message) {
            tracing::trace!(message = ?err.0, "coin list dropped, discarding message");
        }
    }
}

pub(crate) struct Mailbox {
    rx: Receiver<CoinListMessage>,
}

impl Mailbox {
    pub(crate) fn try_next(&self) -> Option<CoinListMessage> {
        match self.rx.try_recv() {
            Ok(message) => Some(message),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    pub(crate) fn next_timeout(&self, timeout: Duration) -> Option<CoinListMessage> {
        match self.rx.recv_timeout(timeout) {
            Ok(message) => Some(message),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

pub(crate) fn channel() -> (DispatchHandle, Mailbox) {
    let (tx, rx) = mpsc::channel();
    (DispatchHandle { tx }, Mailbox { rx })
}
