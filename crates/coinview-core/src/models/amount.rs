use std::fmt;

use crate::constants::SATS_PER_BTC;

/// Coin value in satoshis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Amount(u64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    #[must_use]
    pub const fn from_sat(sats: u64) -> Self {
        Self(sats)
    }

    #[must_use]
    pub const fn to_sat(self) -> u64 {
        self.0
    }
}

impl From<u64> for Amount {
    fn from(sats: u64) -> Self {
        Self(sats)
    }
}

/// Formats as BTC with eight decimals, e.g. `0.00012000`.
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:08}", self.0 / SATS_PER_BTC, self.0 % SATS_PER_BTC)
    }
}
