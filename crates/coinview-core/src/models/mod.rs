pub mod amount;
pub mod coin;
pub mod status;

pub use amount::Amount;
pub use coin::{Coin, CoinId, CoinProperty, CoinState};
pub use status::CoinStatus;
