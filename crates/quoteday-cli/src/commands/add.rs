use quoteday_core::QuoteDraft;

use crate::commands::common::{normalize_quote_text, open_orchestrator, CliPaths};
use crate::error::CliError;

pub async fn run_add(text_parts: &[String], category: &str, paths: &CliPaths) -> Result<(), CliError> {
    let text = normalize_quote_text(text_parts)?;

    let orchestrator = open_orchestrator(paths)?;
    let quote = orchestrator.add_quote(QuoteDraft::new(text, category)).await?;

    println!("{}", quote.id);
    Ok(())
}
