use quoteday_core::util::now_millis;

use crate::cli::ConfigCommands;
use crate::commands::common::{
    format_last_sync, load_config, load_sync_config, open_book, CliPaths,
};
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, paths: &CliPaths) -> Result<(), CliError> {
    match command {
        ConfigCommands::Show => run_config_show(paths),
        ConfigCommands::SetEndpoint { url } => {
            update_config(paths, |config| {
                let endpoint = config.set_endpoint(url)?;
                Ok(format!("Endpoint set to {endpoint}"))
            })
        }
        ConfigCommands::SetInterval { seconds } => update_config(paths, |config| {
            config.sync_interval_secs = Some(seconds);
            Ok(if seconds == 0 {
                "Automatic sync disabled".to_string()
            } else {
                format!("Sync interval set to {seconds}s")
            })
        }),
        ConfigCommands::SetFetchLimit { limit } => update_config(paths, |config| {
            config.fetch_limit = Some(limit);
            Ok(if limit == 0 {
                "Fetch limit removed".to_string()
            } else {
                format!("Fetch limit set to {limit}")
            })
        }),
    }
}

fn run_config_show(paths: &CliPaths) -> Result<(), CliError> {
    let config = load_sync_config(&paths.config)?;
    let last_sync = open_book(&paths.state)?.last_sync();

    println!("config file:   {}", paths.config.display());
    println!("state file:    {}", paths.state.display());
    println!("endpoint:      {}", config.endpoint);
    println!(
        "sync interval: {}",
        config
            .sync_interval
            .map_or_else(|| "disabled".to_string(), |interval| format!("{}s", interval.as_secs()))
    );
    println!(
        "fetch limit:   {}",
        config
            .fetch_limit
            .map_or_else(|| "unlimited".to_string(), |limit| limit.to_string())
    );
    println!("last sync:     {}", format_last_sync(last_sync, now_millis()));
    Ok(())
}

fn update_config(
    paths: &CliPaths,
    apply: impl FnOnce(&mut crate::config_file::CliConfig) -> Result<String, CliError>,
) -> Result<(), CliError> {
    let mut config = load_config(&paths.config)?;
    let message = apply(&mut config)?;
    config
        .save_to_path(&paths.config)
        .map_err(CliError::Config)?;
    println!("{message}");
    println!("Saved {}", paths.config.display());
    Ok(())
}
