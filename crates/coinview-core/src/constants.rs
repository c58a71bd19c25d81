/// Anonymity set size at which a coin counts as "private".
pub const DEFAULT_PRIVACY_LEVEL_STRONG: u32 = 50;

/// Batches larger than this are applied to the sorted view as one full rebuild
/// instead of one positional move per item.
pub const DEFAULT_RESET_THRESHOLD: usize = 5;

/// Width of the mixing status column while any coin is mixing or settling.
pub const STATUS_COLUMN_WIDTH: u16 = 180;

/// Width of the status column when it is collapsed.
pub const STATUS_COLUMN_COLLAPSED_WIDTH: u16 = 0;

pub const SATS_PER_BTC: u64 = 100_000_000;

/// Undrained outbound events kept before the oldest are dropped.
pub const MAX_PENDING_EVENTS: usize = 1024;
