//! Asynchronous, best-effort lookup of each coin's transaction history.
//!
//! Lookups run on a tokio runtime and never block the coin list. Results are
//! posted back through the dispatch queue; failures are logged and counted,
//! nothing more.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::{self, BoxFuture};
use thiserror::Error;
use tokio::runtime::Handle;

use crate::dispatch::{CoinListMessage, DispatchHandle};
use crate::models::{Coin, CoinId};
use crate::stats::SharedProjectionStats;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("No transaction history for coin {id}")]
    NotFound { id: CoinId },
    #[error("History backend unavailable: {message}")]
    Unavailable { message: String },
}

/// Resolves the orderable history label of a coin, usually by asking the
/// wallet's transaction store or a remote indexer.
pub trait HistoryProvider: Send + Sync + 'static {
    fn lookup(&self, coin: Arc<Coin>) -> BoxFuture<'static, Result<String, HistoryError>>;
}

/// Provider that resolves every coin to an empty history.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHistory;

impl HistoryProvider for NoHistory {
    fn lookup(&self, _coin: Arc<Coin>) -> BoxFuture<'static, Result<String, HistoryError>> {
        Box::pin(future::ready(Ok(String::new())))
    }
}

/// Fires history lookups tagged with a refresh generation.
///
/// A result is accepted when it is newer than the last result applied to the
/// same coin. A newer refresh does not void older lookups still in flight for
/// other coins, or for this coin until its newer result lands.
pub(crate) struct HistoryRefresher {
    provider: Arc<dyn HistoryProvider>,
    runtime: Handle,
    dispatch: DispatchHandle,
    stats: SharedProjectionStats,
    generation: u64,
    applied: HashMap<CoinId, u64>,
}

impl HistoryRefresher {
    pub(crate) fn new(
        provider: Arc<dyn HistoryProvider>,
        runtime: Handle,
        dispatch: DispatchHandle,
        stats: SharedProjectionStats,
    ) -> Self {
        Self {
            provider,
            runtime,
            dispatch,
            stats,
            generation: 0,
            applied: HashMap::new(),
        }
    }

    /// Start one lookup per coin. Fire-and-forget: the join handles are dropped.
    pub(crate) fn refresh<'a>(&mut self, coins: impl IntoIterator<Item = &'a Arc<Coin>>) -> u64 {
        self.generation += 1;
        let generation = self.generation;

        for coin in coins {
            let id = coin.id();
            let lookup = self.provider.lookup(coin.clone());
            let dispatch = self.dispatch.clone();
            let stats = self.stats.clone();
            self.runtime.spawn(async move {
                match lookup.await {
                    Ok(history) => dispatch.post(CoinListMessage::HistoryResolved {
                        id,
                        generation,
                        history,
                    }),
                    Err(err) => {
                        stats.record_history_failed();
                        tracing::debug!(coin = %id, error = %err, "history lookup failed");
                    }
                }
            });
        }
        generation
    }

    /// Record a result for `id` if it is newer than the one last applied.
    pub(crate) fn accept(&mut self, id: CoinId, generation: u64) -> bool {
        let last = self.applied.entry(id).or_insert(0);
        if generation <= *last {
            return false;
        }
        *last = generation;
        true
    }

    pub(crate) fn forget(&mut self, id: &CoinId) {
        self.applied.remove(id);
    }

    pub(crate) fn forget_all(&mut self) {
        self.applied.clear();
    }
}
