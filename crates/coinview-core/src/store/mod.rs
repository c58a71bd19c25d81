pub mod aggregate;
pub mod item;
pub mod sort;
pub mod view;
pub mod working_set;

pub use aggregate::{AggregateState, SelectionFilter, TriState};
pub use item::CoinItem;
pub use sort::{Direction, SortComparator, SortKey, SortOrder, SortPolicy};
pub use view::SortedView;
pub use working_set::WorkingSet;
