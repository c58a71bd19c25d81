//! Scripted wallet activity, run on its own thread to exercise cross-thread
//! delivery into the coin list.

use std::collections::HashMap;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;

use coinview_core::{
    Amount, Coin, CoinId, CoinSource, CoinStatus, HistoryError, HistoryProvider, WalletCoins,
};
use futures::future::BoxFuture;
use parking_lot::Mutex;

const LABELS: [&str; 6] = ["salary", "exchange", "change", "mining", "refund", "gift"];

/// History provider backed by labels the simulated wallet assigns as it
/// receives coins. Every third coin is left unlabeled so lookups can fail.
#[derive(Debug, Clone, Default)]
pub struct DemoHistory {
    labels: Arc<Mutex<HashMap<CoinId, String>>>,
    latency: Duration,
}

impl DemoHistory {
    pub fn new(latency: Duration) -> Self {
        Self {
            labels: Arc::default(),
            latency,
        }
    }

    fn label(&self, id: CoinId, label: &str) {
        self.labels.lock().insert(id, label.to_string());
    }
}

impl HistoryProvider for DemoHistory {
    fn lookup(&self, coin: Arc<Coin>) -> BoxFuture<'static, Result<String, HistoryError>> {
        let labels = self.labels.clone();
        let latency = self.latency;
        Box::pin(async move {
            tokio::time::sleep(latency).await;
            let id = coin.id();
            labels
                .lock()
                .get(&id)
                .cloned()
                .ok_or(HistoryError::NotFound { id })
        })
    }
}

/// What the wallet thread did in one step.
#[derive(Debug, Clone)]
pub struct StepReport {
    pub index: usize,
    pub description: String,
}

pub struct Simulation {
    wallet: WalletCoins,
    history: DemoHistory,
    steps: usize,
    received: usize,
}

impl Simulation {
    pub fn new(wallet: WalletCoins, history: DemoHistory, steps: usize) -> Self {
        Self {
            wallet,
            history,
            steps,
            received: 0,
        }
    }

    /// Run every step, reporting each one. Stops early if the receiver hangs up.
    pub fn run(mut self, reports: Sender<StepReport>, pause: Duration) {
        for index in 0..self.steps {
            let description = self.step(index);
            tracing::debug!(step = index, %description, "wallet step");
            if reports.send(StepReport { index, description }).is_err() {
                tracing::warn!(step = index, "report receiver gone, stopping simulation");
                return;
            }
            std::thread::sleep(pause);
        }
    }

    fn step(&mut self, index: usize) -> String {
        if index == 0 {
            let added: Vec<u64> = (0..6).map(|n| self.receive(n)).collect();
            return format!("received {} coins ({:?} sat)", added.len(), added);
        }
        if index + 1 == self.steps && self.steps > 2 {
            self.wallet.clear();
            return "wallet reloaded (reset)".to_string();
        }

        match index % 5 {
            1 => match self.pick(index) {
                Some(coin) => {
                    let next = next_status(coin.status());
                    coin.set_status(next);
                    format!("coin {} status -> {}", coin.id(), next)
                }
                None => "nothing to mix".to_string(),
            },
            2 => match self.pick(index) {
                Some(coin) => {
                    let anonymity_set = coin.anonymity_set() + 25;
                    coin.set_anonymity_set(anonymity_set);
                    format!("coin {} anonymity set -> {}", coin.id(), anonymity_set)
                }
                None => "nothing to mix".to_string(),
            },
            3 => {
                let sat = self.receive(self.received);
                format!("received {} sat", sat)
            }
            4 => match self.pick(index) {
                Some(coin) => {
                    coin.set_unspent(false);
                    format!("spent coin {}", coin.id())
                }
                None => "nothing to spend".to_string(),
            },
            _ => match self.pick(index) {
                Some(coin) => {
                    let amount = Amount::from_sat(coin.amount().to_sat() + 5_000);
                    coin.set_amount(amount);
                    format!("coin {} amount -> {}", coin.id(), amount)
                }
                None => "nothing to update".to_string(),
            },
        }
    }

    fn receive(&mut self, n: usize) -> u64 {
        let sat = 10_000 + (n as u64 * 7_919) % 90_000;
        let anonymity_set = (n as u32 * 13) % 70 + 1;
        let coin = Coin::new(Amount::from_sat(sat), anonymity_set);
        if n % 3 != 2 {
            self.history.label(coin.id(), LABELS[n % LABELS.len()]);
        }
        self.wallet.add([coin]);
        self.received += 1;
        sat
    }

    fn pick(&self, index: usize) -> Option<Arc<Coin>> {
        let unspent: Vec<Arc<Coin>> = self
            .wallet
            .coins()
            .into_iter()
            .filter(|coin| coin.is_unspent())
            .collect();
        if unspent.is_empty() {
            None
        } else {
            Some(unspent[index % unspent.len()].clone())
        }
    }
}

/// Walk a coin forward through the mixing lifecycle, wrapping back to confirmed.
fn next_status(status: CoinStatus) -> CoinStatus {
    match status {
        CoinStatus::Unconfirmed => CoinStatus::Confirmed,
        CoinStatus::Confirmed => CoinStatus::MixingOnWaitingList,
        CoinStatus::MixingOnWaitingList => CoinStatus::MixingInputRegistration,
        CoinStatus::MixingWaitingForConfirmation => CoinStatus::MixingInputRegistration,
        CoinStatus::MixingInputRegistration => CoinStatus::MixingConnectionConfirmation,
        CoinStatus::MixingConnectionConfirmation => CoinStatus::MixingOutputRegistration,
        CoinStatus::MixingOutputRegistration => CoinStatus::MixingSigning,
        CoinStatus::MixingSigning => CoinStatus::SpentAccordingToBackend,
        CoinStatus::MixingBanned | CoinStatus::SpentAccordingToBackend => CoinStatus::Confirmed,
    }
}
