//! Local/remote synchronization
//!
//! [`QuoteBook`] holds the session state behind one async mutex,
//! [`SyncOrchestrator`] runs guarded fetch/merge/push cycles over it, and
//! [`spawn_periodic`] drives the orchestrator from a timer and manual
//! triggers.

mod book;
mod orchestrator;
mod periodic;

#[cfg(test)]
mod testing;

pub use book::QuoteBook;
pub use orchestrator::{
    SyncOrchestrator, SyncOutcome, SyncReport, CONFLICT_RESOLVED, IMPORT_FAILED,
    IMPORT_SUCCEEDED, PUSH_FAILED, QUOTE_ADDED, SYNC_FAILED, SYNC_SUCCEEDED,
};
pub use periodic::{spawn_periodic, PeriodicSync};
