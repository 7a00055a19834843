use crate::cli::{ConflictCommands, ConflictSide};
use crate::commands::common::{open_book, open_orchestrator, CliPaths, TextConflictPresenter};
use crate::error::CliError;

pub async fn run_conflicts(command: ConflictCommands, paths: &CliPaths) -> Result<(), CliError> {
    match command {
        ConflictCommands::List { json } => run_conflicts_list(json, paths),
        ConflictCommands::Resolve { index, side } => run_conflicts_resolve(index, side, paths).await,
    }
}

fn run_conflicts_list(as_json: bool, paths: &CliPaths) -> Result<(), CliError> {
    let book = open_book(&paths.state)?;
    let resolver = book.resolver();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&resolver.views())?);
        return Ok(());
    }

    if resolver.present_to(&TextConflictPresenter) == 0 {
        println!("No pending conflicts.");
    }
    Ok(())
}

async fn run_conflicts_resolve(
    index: usize,
    side: ConflictSide,
    paths: &CliPaths,
) -> Result<(), CliError> {
    let orchestrator = open_orchestrator(paths)?;
    let resolution = orchestrator.resolve_conflict(index, side.into()).await?;

    if resolution.applied {
        let kept = resolution.conflict.chosen(resolution.choice);
        println!(
            "Kept {} version of quote {}: \"{}\"",
            resolution.choice,
            kept.id,
            kept.preview(60)
        );
    } else {
        println!(
            "Quote {} no longer exists; conflict dropped",
            resolution.conflict.id()
        );
    }
    if resolution.remaining > 0 {
        println!("{} conflicts remaining", resolution.remaining);
        orchestrator.present_conflicts(&TextConflictPresenter).await;
    }
    Ok(())
}
