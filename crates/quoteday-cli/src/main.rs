//! quoteday - random quotes by category, synced with a remote collection

mod cli;
mod commands;
mod config_file;
mod error;


use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::categories::run_categories;
use crate::commands::common::CliPaths;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::conflicts::run_conflicts;
use crate::commands::export::run_export;
use crate::commands::filter::run_filter;
use crate::commands::import::run_import;
use crate::commands::show::run_show;
use crate::commands::sync::run_sync;
use crate::commands::watch::run_watch;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "quoteday=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Some(Commands::Completions { shell, output }) = &cli.command {
        return run_completions(*shell, output.as_deref());
    }

    let paths = CliPaths::resolve(cli.state_path, cli.config)?;

    match cli.command {
        None => run_show(None, false, &paths.state)?,
        Some(Commands::Show { category, last }) => {
            run_show(category.as_deref(), last, &paths.state)?;
        }
        Some(Commands::Add { text, category }) => run_add(&text, &category, &paths).await?,
        Some(Commands::Categories { json }) => run_categories(json, &paths.state)?,
        Some(Commands::Filter { category }) => run_filter(&category, &paths.state)?,
        Some(Commands::Export { output }) => run_export(output.as_deref(), &paths.state)?,
        Some(Commands::Import { path }) => run_import(&path, &paths).await?,
        Some(Commands::Sync) => run_sync(&paths).await?,
        Some(Commands::Watch { interval }) => run_watch(interval, &paths).await?,
        Some(Commands::Conflicts { command }) => run_conflicts(command, &paths).await?,
        Some(Commands::Config { command }) => run_config(command, &paths)?,
        Some(Commands::Completions { .. }) => {}
    }

    Ok(())
}
