use std::fmt::Write;

use coinview_core::store::CoinItem;
use coinview_core::{CoinListViewModel, SelectionFilter, SortKey, SortOrder, TriState};

fn check_box(state: TriState) -> &'static str {
    match state {
        TriState::Selected => "[x]",
        TriState::Deselected => "[ ]",
        TriState::Mixed => "[-]",
    }
}

fn header(model: &CoinListViewModel, key: SortKey, title: &str) -> String {
    let arrow = match model.sort_direction(key) {
        SortOrder::None => "",
        SortOrder::Increasing => " ^",
        SortOrder::Decreasing => " v",
    };
    format!("{title}{arrow}")
}

fn row(out: &mut String, item: &CoinItem, focused: bool, with_status: bool) {
    let marker = if focused { '>' } else { ' ' };
    let selected = if item.is_selected() { "[x]" } else { "[ ]" };
    let _ = write!(
        out,
        "{marker} {selected} {id}  {amount:>14}  {anon:>5}  {history:<10}",
        id = item.id(),
        amount = item.amount().to_string(),
        anon = item.anonymity_set(),
        history = item.history(),
    );
    if with_status {
        let _ = write!(out, "  {}", item.status());
    }
    out.push('\n');
}

/// Plain-text table of the current view followed by the three checkboxes.
pub fn render(model: &CoinListViewModel) -> String {
    let mut out = String::new();
    let with_status = model.status_column_visible();
    let focused = model.focused().map(|item| item.id());

    let _ = write!(
        out,
        "      {:<8}  {:>14}  {:>5}  {:<10}",
        "coin",
        header(model, SortKey::Amount, "amount"),
        header(model, SortKey::Privacy, "anon"),
        header(model, SortKey::History, "history"),
    );
    if with_status {
        let _ = write!(out, "  {}", header(model, SortKey::Status, "status"));
    }
    out.push('\n');

    for item in model.coins() {
        row(&mut out, item, focused == Some(item.id()), with_status);
    }

    let _ = writeln!(
        out,
        "{} all  {} private  {} non-private  (threshold {}, {} coins)",
        check_box(model.selection_state(SelectionFilter::All)),
        check_box(model.selection_state(SelectionFilter::Private)),
        check_box(model.selection_state(SelectionFilter::NonPrivate)),
        model.privacy_threshold(),
        model.len(),
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinview_core::{Amount, Coin, CoinListConfig, CoinStatus, NoHistory, WalletCoins};
    use std::sync::Arc;

    #[test]
    fn test_render_shows_rows_and_check_boxes() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let wallet = WalletCoins::new();
        let mixing = Coin::new(Amount::from_sat(20_000), 60);
        mixing.set_status(CoinStatus::MixingSigning);
        mixing.set_selected(true);
        wallet.add([Coin::new(Amount::from_sat(10_000), 1), mixing]);

        let model = CoinListViewModel::new(
            CoinListConfig::default(),
            &wallet,
            Arc::new(NoHistory),
            runtime.handle().clone(),
        );
        let text = render(&model);

        assert!(text.contains("amount v"));
        assert!(text.contains("signing"));
        assert!(text.contains("[-] all  [x] private  [ ] non-private"));
        assert_eq!(text.lines().count(), 4);
    }
}
