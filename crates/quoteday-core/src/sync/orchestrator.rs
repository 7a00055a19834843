//! Sync cycle driver

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{watch, Mutex};

use super::QuoteBook;
use crate::conflicts::{ConflictPresenter, Resolution};
use crate::error::{Error, Result};
use crate::merge::merge;
use crate::models::{ConflictChoice, Quote, QuoteDraft};
use crate::notify::{NotificationSink, Severity};
use crate::persistence::KeyValueStore;
use crate::remote::RemoteSource;
use crate::state::SyncStatus;
use crate::transfer::ImportSummary;
use crate::util::now_millis;

pub const SYNC_SUCCEEDED: &str = "Quotes synced with server";
pub const SYNC_FAILED: &str = "Failed to sync quotes. Please try again later.";
pub const PUSH_FAILED: &str = "Quotes saved locally but upload failed. Please try again later.";
pub const IMPORT_SUCCEEDED: &str = "Quotes imported successfully!";
pub const IMPORT_FAILED: &str = "Error importing quotes. Please ensure valid JSON format.";
pub const CONFLICT_RESOLVED: &str = "Conflict resolved successfully";
pub const QUOTE_ADDED: &str = "Quote added successfully!";

/// Counts from one completed sync cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Records returned by the remote
    pub fetched: usize,
    /// Remote records appended locally
    pub adopted: usize,
    /// Conflicts detected in this cycle
    pub conflicts: usize,
    /// Conflicts awaiting resolution after this cycle
    pub pending_conflicts: usize,
    /// New `lastSync` value (Unix ms)
    pub synced_at: i64,
}

/// Result of a sync request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Completed(SyncReport),
    /// Another cycle was already running
    Skipped,
}

enum CycleFailure {
    Load(Error),
    Fetch(Error),
    Commit(Error),
    Push(Error),
}

impl CycleFailure {
    const fn message(&self) -> &'static str {
        match self {
            Self::Load(_) | Self::Fetch(_) | Self::Commit(_) => SYNC_FAILED,
            Self::Push(_) => PUSH_FAILED,
        }
    }

    fn into_error(self) -> Error {
        match self {
            Self::Load(error) | Self::Fetch(error) | Self::Commit(error) | Self::Push(error) => {
                error
            }
        }
    }
}

/// Holds the `Syncing` status for one cycle
///
/// A cycle dropped before [`CycleGuard::finish`] (timeout, `select!`, task
/// abort) leaves the status at `Error` so later triggers can run.
struct CycleGuard<'a> {
    status: &'a watch::Sender<SyncStatus>,
    finished: bool,
}

impl<'a> CycleGuard<'a> {
    fn start(status: &'a watch::Sender<SyncStatus>) -> Option<Self> {
        let started = status.send_if_modified(|current| {
            if *current == SyncStatus::Syncing {
                false
            } else {
                *current = SyncStatus::Syncing;
                true
            }
        });
        started.then_some(Self {
            status,
            finished: false,
        })
    }

    fn finish(mut self, status: SyncStatus) {
        self.finished = true;
        self.status.send_replace(status);
    }
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!("Sync cycle cancelled before completion");
            self.status.send_replace(SyncStatus::Error);
        }
    }
}

/// Runs sync cycles against a shared [`QuoteBook`] and publishes status
pub struct SyncOrchestrator<K, R, N> {
    book: Arc<Mutex<QuoteBook<K>>>,
    remote: R,
    notifier: N,
    status: watch::Sender<SyncStatus>,
}

impl<K, R, N> SyncOrchestrator<K, R, N>
where
    K: KeyValueStore,
    R: RemoteSource,
    N: NotificationSink,
{
    pub fn new(book: Arc<Mutex<QuoteBook<K>>>, remote: R, notifier: N) -> Self {
        let (status, _) = watch::channel(SyncStatus::Idle);
        Self {
            book,
            remote,
            notifier,
            status,
        }
    }

    /// Shared handle to the session state
    #[must_use]
    pub fn book(&self) -> Arc<Mutex<QuoteBook<K>>> {
        Arc::clone(&self.book)
    }

    #[must_use]
    pub const fn remote(&self) -> &R {
        &self.remote
    }

    #[must_use]
    pub fn status(&self) -> SyncStatus {
        *self.status.borrow()
    }

    /// Watch status transitions
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SyncStatus> {
        self.status.subscribe()
    }

    /// Run one sync cycle unless another is already in flight
    ///
    /// Fetch and push run without holding the book lock; the book is reloaded
    /// from its store before the merge so writes made meanwhile by other
    /// handles are merged rather than overwritten. A failure sets the
    /// status to [`SyncStatus::Error`], notifies the user, and returns the
    /// underlying error.
    pub async fn sync_now(&self) -> Result<SyncOutcome> {
        let Some(guard) = CycleGuard::start(&self.status) else {
            tracing::debug!("Sync already in progress; skipping trigger");
            return Ok(SyncOutcome::Skipped);
        };

        match self.run_cycle().await {
            Ok(report) => {
                guard.finish(SyncStatus::Synced);
                tracing::info!(
                    "Sync completed: fetched {}, adopted {}, conflicts {}",
                    report.fetched,
                    report.adopted,
                    report.conflicts
                );
                self.notifier.notify(SYNC_SUCCEEDED, Severity::Info);
                Ok(SyncOutcome::Completed(report))
            }
            Err(failure) => {
                guard.finish(SyncStatus::Error);
                self.notifier.notify(failure.message(), Severity::Error);
                let error = failure.into_error();
                tracing::warn!("Sync failed: {error}");
                Err(error)
            }
        }
    }

    async fn run_cycle(&self) -> std::result::Result<SyncReport, CycleFailure> {
        let since = {
            let mut book = self.book.lock().await;
            book.reload().map_err(CycleFailure::Load)?;
            book.last_sync()
        };
        tracing::debug!("Fetching remote changes since {since}");
        let remote = self
            .remote
            .fetch_since(since)
            .await
            .map_err(CycleFailure::Fetch)?;

        let (merged, conflicts, adopted, pending_conflicts) = {
            let mut book = self.book.lock().await;
            book.reload().map_err(CycleFailure::Load)?;
            let outcome = merge(book.quotes(), &remote);
            let conflicts = outcome.conflicts.len();
            let adopted = outcome.adopted;
            book.commit_merge(outcome).map_err(CycleFailure::Commit)?;
            (
                book.quotes().to_vec(),
                conflicts,
                adopted,
                book.conflicts().len(),
            )
        };
        if conflicts > 0 {
            self.notifier.notify(
                &format!("{conflicts} quote conflicts found."),
                Severity::Warning,
            );
        }

        self.remote
            .push(&merged)
            .await
            .map_err(CycleFailure::Push)?;

        let synced_at = now_millis();
        self.book
            .lock()
            .await
            .mark_synced(synced_at)
            .map_err(CycleFailure::Commit)?;

        Ok(SyncReport {
            fetched: remote.len(),
            adopted,
            conflicts,
            pending_conflicts,
            synced_at,
        })
    }

    pub async fn add_quote(&self, draft: QuoteDraft) -> Result<Quote> {
        let quote = self.book.lock().await.add_quote(draft)?;
        self.notifier.notify(QUOTE_ADDED, Severity::Info);
        Ok(quote)
    }

    /// Import a JSON payload, notifying success or failure
    pub async fn import_quotes(&self, payload: &str) -> Result<ImportSummary> {
        let result = self.book.lock().await.import_json(payload);
        match &result {
            Ok(summary) => {
                tracing::info!(
                    "Imported {} quotes ({} skipped, {} reassigned)",
                    summary.added,
                    summary.skipped,
                    summary.reassigned
                );
                self.notifier.notify(IMPORT_SUCCEEDED, Severity::Info);
            }
            Err(error) => {
                tracing::warn!("Import rejected: {error}");
                self.notifier.notify(IMPORT_FAILED, Severity::Error);
            }
        }
        result
    }

    pub async fn resolve_conflict(&self, index: usize, choice: ConflictChoice) -> Result<Resolution> {
        let resolution = self.book.lock().await.resolve_conflict(index, choice)?;
        self.notifier.notify(CONFLICT_RESOLVED, Severity::Info);
        Ok(resolution)
    }

    /// Show pending conflicts; returns how many were presented
    pub async fn present_conflicts(&self, presenter: &impl ConflictPresenter) -> usize {
        self.book.lock().await.resolver().present_to(presenter)
    }
}
