use std::sync::Arc;
use std::time::Duration;

use quoteday_core::notify::TracingNotifier;
use quoteday_core::sync::spawn_periodic;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::commands::common::{load_sync_config, open_orchestrator_with, CliPaths};
use crate::error::CliError;

pub async fn run_watch(interval_override: Option<u64>, paths: &CliPaths) -> Result<(), CliError> {
    let config = load_sync_config(&paths.config)?;
    let period = watch_period(interval_override, config.sync_interval);
    // Long-running: notifications go through the timestamped log output
    let orchestrator = Arc::new(open_orchestrator_with(paths, &config, TracingNotifier)?);
    let mut status = orchestrator.subscribe();
    let handle = spawn_periodic(Arc::clone(&orchestrator), period);

    match period {
        Some(period) => println!(
            "Syncing with {} every {}s. Press Enter to sync now, Ctrl+C to stop.",
            orchestrator.remote().endpoint(),
            period.as_secs()
        ),
        None => println!(
            "Automatic sync disabled for {}. Press Enter to sync now, Ctrl+C to stop.",
            orchestrator.remote().endpoint()
        ),
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let interrupted = tokio::signal::ctrl_c();
    tokio::pin!(interrupted);

    loop {
        tokio::select! {
            result = &mut interrupted => {
                result?;
                break;
            }
            line = lines.next_line(), if stdin_open => {
                if line?.is_some() {
                    handle.trigger();
                } else {
                    stdin_open = false;
                }
            }
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = *status.borrow_and_update();
                println!("{} {current}", chrono::Local::now().format("%H:%M:%S"));
            }
        }
    }

    handle.shutdown().await;
    println!("Stopped.");
    Ok(())
}

/// `--interval 0` disables the timer; no flag keeps the configured interval
pub fn watch_period(interval_override: Option<u64>, configured: Option<Duration>) -> Option<Duration> {
    match interval_override {
        Some(0) => None,
        Some(seconds) => Some(Duration::from_secs(seconds)),
        None => configured,
    }
}
