//! Property-based invariant tests for the coin list projection.
//!
//! Drives a `WalletCoins` collection with arbitrary operation sequences and
//! checks, once the queue is drained:
//!
//! 1. Listed coins are exactly the wallet's unspent coins
//! 2. Display order is sorted under the current comparator
//! 3. At most one sort column is active
//! 4. Checkbox states match a recount over the coins
//! 5. Status column visibility matches a recount over the coins
//! 6. Each listed coin carries exactly one subscription, unlisted coins none

use std::cmp::Ordering;
use std::sync::{Arc, OnceLock};

use coinview_core::store::{SortOrder, TriState};
use coinview_core::{
    Amount, Coin, CoinListConfig, CoinListViewModel, CoinSource, CoinStatus, NoHistory,
    SelectionFilter, SortKey, WalletCoins,
};
use proptest::prelude::*;

// ── Helpers ──────────────────────────────────────────────────────────

fn runtime() -> &'static tokio::runtime::Runtime {
    static RUNTIME: OnceLock<tokio::runtime::Runtime> = OnceLock::new();
    RUNTIME.get_or_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("test runtime")
    })
}

#[derive(Debug, Clone)]
enum Op {
    Add {
        amount: u64,
        anonymity_set: u32,
        status: usize,
        spent: bool,
    },
    /// One collection change carrying several coins: (amount, anonymity, status, spent)
    AddBatch(Vec<(u64, u32, usize, bool)>),
    Remove(usize),
    RemoveBatch(Vec<usize>),
    Spend(usize),
    SetAmount(usize, u64),
    SetAnonymity(usize, u32),
    SetStatus(usize, usize),
    Select(usize, bool),
    Reset,
    Sort(usize, usize),
    CheckBox(usize, usize),
    Threshold(u32),
    Pump,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u64..50, 0u32..100, 0usize..10, any::<bool>()).prop_map(
            |(amount, anonymity_set, status, spent)| Op::Add {
                amount,
                anonymity_set,
                status,
                spent,
            }
        ),
        2 => proptest::collection::vec((0u64..50, 0u32..100, 0usize..10, any::<bool>()), 2..9)
            .prop_map(Op::AddBatch),
        1 => any::<usize>().prop_map(Op::Remove),
        1 => proptest::collection::vec(any::<usize>(), 2..7).prop_map(Op::RemoveBatch),
        1 => any::<usize>().prop_map(Op::Spend),
        2 => (any::<usize>(), 0u64..50).prop_map(|(i, a)| Op::SetAmount(i, a)),
        2 => (any::<usize>(), 0u32..100).prop_map(|(i, a)| Op::SetAnonymity(i, a)),
        2 => (any::<usize>(), 0usize..10).prop_map(|(i, s)| Op::SetStatus(i, s)),
        2 => (any::<usize>(), any::<bool>()).prop_map(|(i, s)| Op::Select(i, s)),
        1 => Just(Op::Reset),
        2 => (0usize..4, 0usize..3).prop_map(|(k, o)| Op::Sort(k, o)),
        1 => (0usize..3, 0usize..3).prop_map(|(f, s)| Op::CheckBox(f, s)),
        1 => (0u32..100).prop_map(Op::Threshold),
        2 => Just(Op::Pump),
    ]
}

const ORDERS: [SortOrder; 3] = [SortOrder::None, SortOrder::Increasing, SortOrder::Decreasing];
const STATES: [TriState; 3] = [TriState::Selected, TriState::Deselected, TriState::Mixed];

fn pick(wallet: &WalletCoins, index: usize) -> Option<Arc<Coin>> {
    let coins = wallet.coins();
    if coins.is_empty() {
        None
    } else {
        Some(coins[index % coins.len()].clone())
    }
}

fn new_coin(amount: u64, anonymity_set: u32, status: usize, spent: bool) -> Arc<Coin> {
    let coin = Coin::new(Amount::from_sat(amount), anonymity_set);
    coin.set_status(CoinStatus::ALL[status]);
    coin.set_unspent(!spent);
    coin
}

fn apply(op: &Op, wallet: &WalletCoins, model: &mut CoinListViewModel) {
    match op {
        Op::Add {
            amount,
            anonymity_set,
            status,
            spent,
        } => {
            wallet.add([new_coin(*amount, *anonymity_set, *status, *spent)]);
        }
        Op::AddBatch(coins) => {
            wallet.add(
                coins
                    .iter()
                    .map(|(amount, anonymity_set, status, spent)| {
                        new_coin(*amount, *anonymity_set, *status, *spent)
                    })
                    .collect::<Vec<_>>(),
            );
        }
        Op::RemoveBatch(indices) => {
            let ids: Vec<_> = indices
                .iter()
                .filter_map(|i| pick(wallet, *i))
                .map(|coin| coin.id())
                .collect();
            wallet.remove(&ids);
        }
        Op::Remove(i) => {
            if let Some(coin) = pick(wallet, *i) {
                wallet.remove(&[coin.id()]);
            }
        }
        Op::Spend(i) => {
            if let Some(coin) = pick(wallet, *i) {
                coin.set_unspent(false);
            }
        }
        Op::SetAmount(i, amount) => {
            if let Some(coin) = pick(wallet, *i) {
                coin.set_amount(Amount::from_sat(*amount));
            }
        }
        Op::SetAnonymity(i, anonymity_set) => {
            if let Some(coin) = pick(wallet, *i) {
                coin.set_anonymity_set(*anonymity_set);
            }
        }
        Op::SetStatus(i, status) => {
            if let Some(coin) = pick(wallet, *i) {
                coin.set_status(CoinStatus::ALL[*status]);
            }
        }
        Op::Select(i, selected) => {
            if let Some(coin) = pick(wallet, *i) {
                coin.set_selected(*selected);
            }
        }
        Op::Reset => wallet.clear(),
        Op::Sort(key, order) => model.set_sort_direction(SortKey::ALL[*key], ORDERS[*order]),
        Op::CheckBox(filter, state) => {
            model.apply_check_box(SelectionFilter::ALL[*filter], STATES[*state])
        }
        Op::Threshold(threshold) => model.set_privacy_threshold(*threshold),
        Op::Pump => {
            model.process_pending();
        }
    }
}

fn expected_state(coins: &[Arc<Coin>], filter: SelectionFilter, threshold: u32) -> TriState {
    let selected: Vec<bool> = coins
        .iter()
        .filter(|c| filter.matches(c.anonymity_set(), threshold))
        .map(|c| c.is_selected())
        .collect();
    if selected.is_empty() || selected.iter().all(|s| !s) {
        TriState::Deselected
    } else if selected.iter().all(|s| *s) {
        TriState::Selected
    } else {
        TriState::Mixed
    }
}

fn run(ops: &[Op]) -> (WalletCoins, CoinListViewModel) {
    let wallet = WalletCoins::new();
    let mut model = CoinListViewModel::new(
        CoinListConfig::default().with_reset_threshold(3),
        &wallet,
        Arc::new(NoHistory),
        runtime().handle().clone(),
    );
    for op in ops {
        apply(op, &wallet, &mut model);
    }
    model.process_pending();
    (wallet, model)
}

fn unspent(wallet: &WalletCoins) -> Vec<Arc<Coin>> {
    wallet
        .coins()
        .into_iter()
        .filter(|c| c.is_unspent())
        .collect()
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Membership
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn listed_coins_are_unspent_wallet_coins(ops in proptest::collection::vec(arb_op(), 0..60)) {
        let (wallet, model) = run(&ops);
        let mut expected: Vec<_> = unspent(&wallet).iter().map(|c| c.id()).collect();
        let mut listed = model.ids().to_vec();
        expected.sort();
        listed.sort();
        prop_assert_eq!(listed, expected);
        prop_assert_eq!(model.len(), model.ids().len());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2-3. Ordering and sort column exclusivity
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn view_is_sorted_under_comparator(ops in proptest::collection::vec(arb_op(), 0..60)) {
        let (_wallet, model) = run(&ops);
        let comparator = model.comparator();
        let items: Vec<_> = model.coins().collect();
        for pair in items.windows(2) {
            prop_assert_ne!(
                comparator.compare(pair[0], pair[1]),
                Ordering::Greater,
                "out of order under {:?}",
                comparator
            );
        }
    }

    #[test]
    fn at_most_one_sort_column_active(ops in proptest::collection::vec(arb_op(), 0..40)) {
        let (_wallet, model) = run(&ops);
        let active = SortKey::ALL
            .iter()
            .filter(|key| model.sort_direction(**key) != SortOrder::None)
            .count();
        prop_assert!(active <= 1, "{} active sort columns", active);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4-5. Aggregates
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn checkbox_states_match_recount(ops in proptest::collection::vec(arb_op(), 0..60)) {
        let (wallet, model) = run(&ops);
        let coins = unspent(&wallet);
        for filter in SelectionFilter::ALL {
            prop_assert_eq!(
                model.selection_state(filter),
                expected_state(&coins, filter, model.privacy_threshold()),
                "filter {:?}",
                filter
            );
        }
    }

    #[test]
    fn status_column_matches_recount(ops in proptest::collection::vec(arb_op(), 0..60)) {
        let (wallet, model) = run(&ops);
        let expected = unspent(&wallet)
            .iter()
            .any(|c| c.status().needs_status_column());
        prop_assert_eq!(model.status_column_visible(), expected);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Subscription bookkeeping
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn one_subscription_per_listed_coin(ops in proptest::collection::vec(arb_op(), 0..60)) {
        let (wallet, model) = run(&ops);
        for coin in wallet.coins() {
            let expected = usize::from(model.get(&coin.id()).is_some());
            prop_assert_eq!(coin.subscriber_count(), expected);
        }
        prop_assert_eq!(wallet.subscriber_count(), 1);
    }
}
