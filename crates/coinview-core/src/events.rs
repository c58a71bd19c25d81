use crate::models::CoinId;

/// Outbound notifications for the presentation layer, drained with
/// [`crate::CoinListViewModel::drain_events`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoinListEvent {
    /// A coin's selection flag toggled
    FocusChanged(CoinId),
    /// User asked to queue the focused coin for mixing
    EnqueueRequested(CoinId),
    /// User asked to pull the focused coin out of mixing
    DequeueRequested,
}
