use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use quoteday_core::config::SyncConfig;
use quoteday_core::conflicts::{ConflictPresenter, ConflictView};
use quoteday_core::notify::{NotificationSink, Severity};
use quoteday_core::persistence::JsonFileStore;
use quoteday_core::remote::HttpRemoteSource;
use quoteday_core::sync::{QuoteBook, SyncOrchestrator};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::config_file::{resolve_config_path, CliConfig};
use crate::error::CliError;

pub const STATE_PATH_ENV: &str = "QUOTEDAY_STATE_PATH";

pub type Orchestrator<N = ConsoleNotifier> = SyncOrchestrator<JsonFileStore, HttpRemoteSource, N>;

/// File locations shared by every command
#[derive(Debug, Clone)]
pub struct CliPaths {
    pub state: PathBuf,
    pub config: PathBuf,
}

impl CliPaths {
    pub fn resolve(
        cli_state_path: Option<PathBuf>,
        cli_config_path: Option<PathBuf>,
    ) -> Result<Self, CliError> {
        Ok(Self {
            state: resolve_state_path(cli_state_path)?,
            config: resolve_config_path(cli_config_path)?,
        })
    }
}

pub fn resolve_state_path(cli_state_path: Option<PathBuf>) -> Result<PathBuf, CliError> {
    match cli_state_path.or_else(|| env::var_os(STATE_PATH_ENV).map(PathBuf::from)) {
        Some(path) => Ok(path),
        None => default_state_path(),
    }
}

pub fn default_state_path() -> Result<PathBuf, CliError> {
    dirs::data_dir()
        .map(|dir| dir.join("quoteday").join("state.json"))
        .ok_or(CliError::MissingDirectory("data"))
}

pub fn open_book(state_path: &Path) -> Result<QuoteBook<JsonFileStore>, CliError> {
    let store = JsonFileStore::open(state_path)?;
    Ok(QuoteBook::open(store)?)
}

pub fn load_config(config_path: &Path) -> Result<CliConfig, CliError> {
    CliConfig::load_from_path(config_path).map_err(CliError::Config)
}

/// Effective sync configuration from the config file and `QUOTEDAY_*` variables
pub fn load_sync_config(config_path: &Path) -> Result<SyncConfig, CliError> {
    load_config(config_path)?.to_sync_config(|name| env::var(name).ok())
}

pub fn open_orchestrator(paths: &CliPaths) -> Result<Orchestrator, CliError> {
    let config = load_sync_config(&paths.config)?;
    open_orchestrator_with(paths, &config, ConsoleNotifier)
}

pub fn open_orchestrator_with<N: NotificationSink>(
    paths: &CliPaths,
    config: &SyncConfig,
    notifier: N,
) -> Result<Orchestrator<N>, CliError> {
    let book = open_book(&paths.state)?;
    let remote = HttpRemoteSource::new(config)?;
    tracing::debug!("Using remote endpoint {}", remote.endpoint());
    Ok(SyncOrchestrator::new(
        Arc::new(Mutex::new(book)),
        remote,
        notifier,
    ))
}

/// Prints notifications to stderr with a severity prefix
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl NotificationSink for ConsoleNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        eprintln!("{}", format_notification(message, severity));
    }
}

pub fn format_notification(message: &str, severity: Severity) -> String {
    format!("[{severity}] {message}")
}

/// Prints pending conflicts to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct TextConflictPresenter;

impl ConflictPresenter for TextConflictPresenter {
    fn present(&self, views: &[ConflictView]) {
        for line in format_conflict_lines(views) {
            println!("{line}");
        }
    }
}

pub fn format_conflict_lines(views: &[ConflictView]) -> Vec<String> {
    let mut lines = Vec::with_capacity(views.len() * 3);
    for view in views {
        lines.push(format!("[{}] quote {}", view.index, view.id));
        lines.push(format!(
            "    local:  \"{}\" ({}, {})",
            view.local_text,
            view.local_category,
            format_sync_timestamp(view.local_timestamp)
        ));
        lines.push(format!(
            "    server: \"{}\" ({}, {})",
            view.server_text,
            view.server_category,
            format_sync_timestamp(view.server_timestamp)
        ));
    }
    lines
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct CategoryItem {
    pub name: String,
    pub count: usize,
    pub selected: bool,
}

pub fn format_category_lines(items: &[CategoryItem]) -> Vec<String> {
    items
        .iter()
        .map(|item| {
            let marker = if item.selected { '*' } else { ' ' };
            format!("{marker} {} ({})", item.name, item.count)
        })
        .collect()
}

pub fn format_sync_timestamp(timestamp_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms).map_or_else(
        || timestamp_ms.to_string(),
        |date_time| date_time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else {
        format!("{}d ago", diff / day)
    }
}

pub fn format_last_sync(last_sync: i64, now_ms: i64) -> String {
    if last_sync <= 0 {
        "never".to_string()
    } else {
        format!(
            "{} ({})",
            format_sync_timestamp(last_sync),
            format_relative_time(last_sync, now_ms)
        )
    }
}

pub fn normalize_quote_text(parts: &[String]) -> Result<String, CliError> {
    let text = parts.join(" ");
    let text = text.trim();
    if text.is_empty() {
        Err(CliError::EmptyText)
    } else {
        Ok(text.to_string())
    }
}
