use std::path::Path;

use crate::commands::common::{open_orchestrator, CliPaths};
use crate::error::CliError;

pub async fn run_import(input_path: &Path, paths: &CliPaths) -> Result<(), CliError> {
    let payload = std::fs::read_to_string(input_path)?;

    let orchestrator = open_orchestrator(paths)?;
    let summary = orchestrator.import_quotes(&payload).await?;

    println!(
        "Imported {} quotes ({} skipped, {} reassigned)",
        summary.added, summary.skipped, summary.reassigned
    );
    Ok(())
}
