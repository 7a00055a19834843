use quoteday_core::sync::{SyncOutcome, SyncReport};

use crate::commands::common::{format_sync_timestamp, open_orchestrator, CliPaths};
use crate::error::CliError;

pub async fn run_sync(paths: &CliPaths) -> Result<(), CliError> {
    let orchestrator = open_orchestrator(paths)?;

    match orchestrator.sync_now().await? {
        SyncOutcome::Completed(report) => {
            for line in format_sync_report(&report) {
                println!("{line}");
            }
        }
        SyncOutcome::Skipped => println!("Sync already in progress"),
    }
    Ok(())
}

pub fn format_sync_report(report: &SyncReport) -> Vec<String> {
    let mut lines = vec![format!(
        "Sync completed at {}: fetched {}, added {}",
        format_sync_timestamp(report.synced_at),
        report.fetched,
        report.adopted
    )];
    if report.conflicts > 0 || report.pending_conflicts > 0 {
        lines.push(format!(
            "{} new conflicts, {} pending. Run `quoteday conflicts list` to review.",
            report.conflicts, report.pending_conflicts
        ));
    }
    lines
}
