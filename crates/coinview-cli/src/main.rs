mod render;
mod simulation;
mod tracing_setup;

use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use coinview_core::{CoinListConfig, CoinListViewModel, SelectionFilter, SortKey, SortOrder, TriState, WalletCoins};

use crate::simulation::{DemoHistory, Simulation, StepReport};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    Amount,
    Privacy,
    History,
    Status,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Amount => SortKey::Amount,
            SortArg::Privacy => SortKey::Privacy,
            SortArg::History => SortKey::History,
            SortArg::Status => SortKey::Status,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OrderArg {
    Increasing,
    Decreasing,
}

impl From<OrderArg> for SortOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Increasing => SortOrder::Increasing,
            OrderArg::Decreasing => SortOrder::Decreasing,
        }
    }
}

#[derive(Parser)]
#[command(name = "coinview-cli")]
#[command(about = "Watch a simulated wallet through a sorted, selectable coin list")]
struct Cli {
    /// Path to JSON config file (privacyLevelStrong, resetThreshold, statusColumnWidth)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Anonymity set at which a coin counts as private
    #[arg(long, short = 't')]
    threshold: Option<u32>,

    /// Column to sort by
    #[arg(long, value_enum, default_value = "amount")]
    sort: SortArg,

    /// Sort direction
    #[arg(long, value_enum, default_value = "decreasing")]
    order: OrderArg,

    /// Number of wallet steps to simulate
    #[arg(long, default_value_t = 12)]
    steps: usize,

    /// Pause between wallet steps, in milliseconds
    #[arg(long, default_value_t = 150)]
    pause_ms: u64,
}

fn load_config(cli: &Cli) -> Result<CoinListConfig> {
    let config = match &cli.config {
        Some(path) => CoinListConfig::load(path)?,
        None => CoinListConfig::default(),
    };
    Ok(match cli.threshold {
        Some(threshold) => config.with_privacy_level_strong(threshold),
        None => config,
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_setup::init_tracing()?;

    let config = load_config(&cli)?;
    tracing::info!(?config, "starting coin list");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("Failed to start tokio runtime")?;

    let wallet = WalletCoins::new();
    let history = DemoHistory::new(Duration::from_millis(30));
    let mut model = CoinListViewModel::new(
        config,
        &wallet,
        Arc::new(history.clone()),
        runtime.handle().clone(),
    );
    model.set_sort_direction(cli.sort.into(), cli.order.into());

    let (reports_tx, reports_rx) = mpsc::channel::<StepReport>();
    let pause = Duration::from_millis(cli.pause_ms);
    let simulation = Simulation::new(wallet.clone(), history, cli.steps);
    let worker = std::thread::Builder::new()
        .name("wallet".to_string())
        .spawn(move || simulation.run(reports_tx, pause))
        .context("Failed to spawn wallet thread")?;

    loop {
        match reports_rx.recv_timeout(Duration::from_secs(5)) {
            Ok(report) => {
                // Let in-flight history lookups land before drawing.
                model.process_pending_timeout(pause.max(Duration::from_millis(50)));
                model.process_pending();

                println!("step {}: {}", report.index, report.description);
                if report.index == 2 {
                    println!("user: select private coins");
                    model.apply_check_box(SelectionFilter::Private, TriState::Selected);
                    model.process_pending();
                }
                for event in model.drain_events() {
                    tracing::debug!(?event, "view event");
                }
                print!("{}", render::render(&model));
                println!();
            }
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!("wallet thread stalled");
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    if worker.join().is_err() {
        anyhow::bail!("wallet thread panicked");
    }

    let stats = model.stats().snapshot();
    tracing::info!(?stats, "simulation finished");
    println!(
        "processed {} adds, {} removes, {} resets, {} property changes; {} history lookups failed",
        stats.adds, stats.removes, stats.resets, stats.property_changes, stats.history_failed
    );
    Ok(())
}
