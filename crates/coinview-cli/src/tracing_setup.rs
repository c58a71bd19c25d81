use std::fs::OpenOptions;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Console logging on stderr, filtered by `RUST_LOG` (default `info`).
///
/// Setting `COINVIEW_LOG_FILE` additionally appends DEBUG output to that file.
pub fn init_tracing() -> Result<()> {
    let file_logging = std::env::var("COINVIEW_LOG_FILE").ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter);

    let registry = tracing_subscriber::registry().with(console);

    if let Some(log_path) = file_logging {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Failed to open log file {log_path}"))?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(true)
            .with_filter(tracing_subscriber::filter::LevelFilter::DEBUG);

        registry.with(file_layer).init();
        eprintln!("File logging enabled: {}", log_path);
    } else {
        registry.init();
    }
    Ok(())
}
