pub mod config;
pub mod constants;
pub mod dispatch;
pub mod events;
pub mod history;
pub mod models;
pub mod observe;
pub mod source;
pub mod stats;
pub mod store;
pub mod view_model;

// Re-export the consumer-facing surface at crate root for convenience
pub use config::CoinListConfig;
pub use events::CoinListEvent;
pub use history::{HistoryError, HistoryProvider, NoHistory};
pub use models::{Amount, Coin, CoinId, CoinProperty, CoinState, CoinStatus};
pub use source::{CoinSource, CollectionChange, WalletCoins};
pub use store::{SelectionFilter, SortKey, SortOrder, TriState};
pub use view_model::CoinListViewModel;
