//! Sync conflict model

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Quote, QuoteId};

/// A local and a server record sharing an id but disagreeing on timestamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConflict {
    /// Record held in the local store when the conflict was detected
    pub local: Quote,
    /// Record reported by the remote source
    pub server: Quote,
}

impl SyncConflict {
    #[must_use]
    pub const fn new(local: Quote, server: Quote) -> Self {
        Self { local, server }
    }

    /// Id shared by both sides
    #[must_use]
    pub const fn id(&self) -> QuoteId {
        self.local.id
    }

    /// Record for the chosen side
    #[must_use]
    pub const fn chosen(&self, choice: ConflictChoice) -> &Quote {
        match choice {
            ConflictChoice::Local => &self.local,
            ConflictChoice::Server => &self.server,
        }
    }
}

/// Side picked by the user when resolving a conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictChoice {
    /// Keep the local record
    Local,
    /// Take the server record
    Server,
}

impl fmt::Display for ConflictChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Server => f.write_str("server"),
        }
    }
}
