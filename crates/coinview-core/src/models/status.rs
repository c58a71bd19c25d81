use std::cmp::Ordering;
use std::fmt;

/// Lifecycle stage of a coin as reported by the wallet service.
///
/// Sorting by status uses [`CoinStatus::rank`], which follows the coin's
/// lifecycle: unconfirmed, confirmed, the mixing stages in protocol order,
/// banned, and finally spent according to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CoinStatus {
    #[default]
    Unconfirmed,
    Confirmed,
    MixingOnWaitingList,
    MixingWaitingForConfirmation,
    MixingInputRegistration,
    MixingConnectionConfirmation,
    MixingOutputRegistration,
    MixingSigning,
    MixingBanned,
    SpentAccordingToBackend,
}

impl CoinStatus {
    pub const ALL: [CoinStatus; 10] = [
        CoinStatus::Unconfirmed,
        CoinStatus::Confirmed,
        CoinStatus::MixingOnWaitingList,
        CoinStatus::MixingWaitingForConfirmation,
        CoinStatus::MixingInputRegistration,
        CoinStatus::MixingConnectionConfirmation,
        CoinStatus::MixingOutputRegistration,
        CoinStatus::MixingSigning,
        CoinStatus::MixingBanned,
        CoinStatus::SpentAccordingToBackend,
    ];

    /// Explicit sort rank. Kept separate from declaration order so reordering
    /// the variants cannot silently change the status sort.
    pub const fn rank(self) -> u8 {
        match self {
            CoinStatus::Unconfirmed => 0,
            CoinStatus::Confirmed => 1,
            CoinStatus::MixingOnWaitingList => 2,
            CoinStatus::MixingWaitingForConfirmation => 3,
            CoinStatus::MixingInputRegistration => 4,
            CoinStatus::MixingConnectionConfirmation => 5,
            CoinStatus::MixingOutputRegistration => 6,
            CoinStatus::MixingSigning => 7,
            CoinStatus::MixingBanned => 8,
            CoinStatus::SpentAccordingToBackend => 9,
        }
    }

    /// True while the coin is enrolled with a mixing round and can be dequeued.
    pub const fn is_mixing(self) -> bool {
        matches!(
            self,
            CoinStatus::MixingOnWaitingList
                | CoinStatus::MixingWaitingForConfirmation
                | CoinStatus::MixingInputRegistration
                | CoinStatus::MixingConnectionConfirmation
                | CoinStatus::MixingOutputRegistration
                | CoinStatus::MixingSigning
        )
    }

    /// Statuses that need the status column: mixing in progress or spend settling.
    pub const fn needs_status_column(self) -> bool {
        self.is_mixing() || matches!(self, CoinStatus::SpentAccordingToBackend)
    }

    pub const fn label(self) -> &'static str {
        match self {
            CoinStatus::Unconfirmed => "unconfirmed",
            CoinStatus::Confirmed => "confirmed",
            CoinStatus::MixingOnWaitingList => "waiting list",
            CoinStatus::MixingWaitingForConfirmation => "waiting for confirmation",
            CoinStatus::MixingInputRegistration => "input registration",
            CoinStatus::MixingConnectionConfirmation => "connection confirmation",
            CoinStatus::MixingOutputRegistration => "output registration",
            CoinStatus::MixingSigning => "signing",
            CoinStatus::MixingBanned => "banned",
            CoinStatus::SpentAccordingToBackend => "spent (backend)",
        }
    }
}

impl Ord for CoinStatus {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for CoinStatus {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for CoinStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
