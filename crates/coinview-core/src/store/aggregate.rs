//! Derived selection and layout state over the working set.
//!
//! Everything here is a pure function of the items at evaluation time.

use crate::store::{CoinItem, WorkingSet};

/// Checkbox state over a filtered subset of coins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TriState {
    Selected,
    #[default]
    Deselected,
    /// Some but not all matching coins are selected
    Mixed,
}

impl From<TriState> for Option<bool> {
    fn from(state: TriState) -> Self {
        match state {
            TriState::Selected => Some(true),
            TriState::Deselected => Some(false),
            TriState::Mixed => None,
        }
    }
}

impl From<Option<bool>> for TriState {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => TriState::Selected,
            Some(false) => TriState::Deselected,
            None => TriState::Mixed,
        }
    }
}

/// Subsets the three "select all" checkboxes operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionFilter {
    All,
    /// Anonymity set at or above the privacy threshold
    Private,
    NonPrivate,
}

impl SelectionFilter {
    pub const ALL: [SelectionFilter; 3] = [
        SelectionFilter::All,
        SelectionFilter::Private,
        SelectionFilter::NonPrivate,
    ];

    pub fn matches(self, anonymity_set: u32, threshold: u32) -> bool {
        match self {
            SelectionFilter::All => true,
            SelectionFilter::Private => anonymity_set >= threshold,
            SelectionFilter::NonPrivate => anonymity_set < threshold,
        }
    }
}

/// Selection state of the items matching `filter`. An empty subset is
/// `Deselected`, never `Mixed` or `Selected`.
pub fn selection_state<'a>(
    items: impl IntoIterator<Item = &'a CoinItem>,
    filter: SelectionFilter,
    threshold: u32,
) -> TriState {
    let mut any_selected = false;
    let mut any_unselected = false;
    for item in items
        .into_iter()
        .filter(|item| filter.matches(item.anonymity_set(), threshold))
    {
        if item.is_selected() {
            any_selected = true;
        } else {
            any_unselected = true;
        }
        if any_selected && any_unselected {
            return TriState::Mixed;
        }
    }
    if any_selected {
        TriState::Selected
    } else {
        TriState::Deselected
    }
}

pub fn status_column_visible<'a>(items: impl IntoIterator<Item = &'a CoinItem>) -> bool {
    items
        .into_iter()
        .any(|item| item.status().needs_status_column())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AggregateState {
    pub all: TriState,
    pub private: TriState,
    pub non_private: TriState,
    pub status_column_visible: bool,
}

impl AggregateState {
    pub fn get(&self, filter: SelectionFilter) -> TriState {
        match filter {
            SelectionFilter::All => self.all,
            SelectionFilter::Private => self.private,
            SelectionFilter::NonPrivate => self.non_private,
        }
    }

    pub(crate) fn set(&mut self, filter: SelectionFilter, state: TriState) -> bool {
        let slot = match filter {
            SelectionFilter::All => &mut self.all,
            SelectionFilter::Private => &mut self.private,
            SelectionFilter::NonPrivate => &mut self.non_private,
        };
        if *slot == state {
            return false;
        }
        *slot = state;
        true
    }

    /// Recompute the three checkbox states. Returns true if any changed.
    pub(crate) fn recompute_selection(&mut self, items: &WorkingSet, threshold: u32) -> bool {
        let mut changed = false;
        for filter in SelectionFilter::ALL {
            changed |= self.set(filter, selection_state(items.iter(), filter, threshold));
        }
        changed
    }

    pub(crate) fn recompute_status_column(&mut self, items: &WorkingSet) -> bool {
        let visible = status_column_visible(items.iter());
        let changed = self.status_column_visible != visible;
        self.status_column_visible = visible;
        changed
    }
}
