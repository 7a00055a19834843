use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use quoteday_core::ConflictChoice;

#[derive(Parser)]
#[command(name = "quoteday")]
#[command(about = "Random quotes by category, synced with a remote collection")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to the local state file (defaults to QUOTEDAY_STATE_PATH or the data directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub state_path: Option<PathBuf>,

    /// Path to the CLI config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show a random quote
    Show {
        /// Category to pick from (defaults to the last selected one)
        #[arg(short, long)]
        category: Option<String>,
        /// Print the last viewed quote instead of picking a new one
        #[arg(long, conflicts_with = "category")]
        last: bool,
    },
    /// Add a new quote
    #[command(alias = "new")]
    Add {
        /// Quote text
        #[arg(required = true)]
        text: Vec<String>,
        /// Quote category
        #[arg(short, long)]
        category: String,
    },
    /// List quote categories
    Categories {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remember a category for `show`
    Filter {
        /// Category name, or `all`
        category: String,
    },
    /// Export all quotes as JSON
    Export {
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Import quotes from a JSON file
    Import {
        /// JSON file containing an array of quotes
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
    /// Run one sync cycle with the remote
    Sync,
    /// Keep syncing periodically (Enter syncs now, Ctrl+C stops)
    Watch {
        /// Seconds between automatic syncs; 0 disables the timer
        #[arg(long, value_name = "SECS")]
        interval: Option<u64>,
    },
    /// Inspect and resolve sync conflicts
    Conflicts {
        #[command(subcommand)]
        command: ConflictCommands,
    },
    /// Show or change persisted CLI configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ConflictSide {
    /// Keep the local version
    Local,
    /// Take the server version
    Server,
}

impl From<ConflictSide> for ConflictChoice {
    fn from(side: ConflictSide) -> Self {
        match side {
            ConflictSide::Local => Self::Local,
            ConflictSide::Server => Self::Server,
        }
    }
}

#[derive(Subcommand)]
pub enum ConflictCommands {
    /// List pending conflicts
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve one conflict by index
    Resolve {
        /// Conflict index as shown by `conflicts list`
        index: usize,
        /// Side to keep
        #[arg(value_enum)]
        side: ConflictSide,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Set the remote endpoint
    SetEndpoint {
        #[arg(value_name = "URL")]
        url: String,
    },
    /// Set the automatic sync interval in seconds (0 disables it)
    SetInterval {
        #[arg(value_name = "SECS")]
        seconds: u64,
    },
    /// Set the maximum records kept per fetch (0 keeps everything)
    SetFetchLimit {
        #[arg(value_name = "N")]
        limit: usize,
    },
}
