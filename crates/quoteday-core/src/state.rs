//! Shared cross-front-end state types.

use std::fmt;

/// Sync status published by the orchestrator
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SyncStatus {
    #[default]
    Idle,
    Syncing,
    Synced,
    Error,
}

impl SyncStatus {
    /// Short label for status lines
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "Up to date",
            Self::Syncing => "Syncing...",
            Self::Synced => "Last synced: Just now",
            Self::Error => "Sync failed",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
