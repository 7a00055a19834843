//! Conflict resolution workflow
//!
//! Conflicts filed by a sync cycle stay pending until the user picks a side.
//! Resolution is index-addressed; front ends normally walk the list in order
//! and re-present it after each choice until it is empty.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::{ConflictChoice, QuoteId, SyncConflict};
use crate::store::QuoteStore;

/// Side-by-side view of one pending conflict
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictView {
    pub index: usize,
    pub id: QuoteId,
    pub local_text: String,
    pub local_category: String,
    pub local_timestamp: i64,
    pub server_text: String,
    pub server_category: String,
    pub server_timestamp: i64,
}

impl ConflictView {
    fn new(index: usize, conflict: &SyncConflict) -> Self {
        Self {
            index,
            id: conflict.id(),
            local_text: conflict.local.text.clone(),
            local_category: conflict.local.category.clone(),
            local_timestamp: conflict.local.timestamp,
            server_text: conflict.server.text.clone(),
            server_category: conflict.server.category.clone(),
            server_timestamp: conflict.server.timestamp,
        }
    }
}

/// Renders pending conflicts to the user
pub trait ConflictPresenter {
    fn present(&self, views: &[ConflictView]);
}

/// Outcome of resolving one conflict
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub conflict: SyncConflict,
    pub choice: ConflictChoice,
    /// False when the quote had already left the store
    pub applied: bool,
    pub remaining: usize,
}

/// Ordered list of unresolved conflicts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictResolver {
    pending: Vec<SyncConflict>,
}

impl ConflictResolver {
    #[must_use]
    pub const fn new(pending: Vec<SyncConflict>) -> Self {
        Self { pending }
    }

    #[must_use]
    pub fn pending(&self) -> &[SyncConflict] {
        &self.pending
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Next unresolved conflict
    #[must_use]
    pub fn present(&self) -> Option<ConflictView> {
        self.pending
            .first()
            .map(|conflict| ConflictView::new(0, conflict))
    }

    /// All pending conflicts in list order
    #[must_use]
    pub fn views(&self) -> Vec<ConflictView> {
        self.pending
            .iter()
            .enumerate()
            .map(|(index, conflict)| ConflictView::new(index, conflict))
            .collect()
    }

    /// Hand every pending conflict to `presenter`; returns how many were shown
    pub fn present_to(&self, presenter: &impl ConflictPresenter) -> usize {
        let views = self.views();
        if !views.is_empty() {
            presenter.present(&views);
        }
        views.len()
    }

    /// File conflicts from a sync cycle
    ///
    /// A conflict for an id that is already pending replaces the older entry
    /// in place; new ids are appended.
    pub fn file(&mut self, conflicts: Vec<SyncConflict>) {
        for conflict in conflicts {
            match self
                .pending
                .iter_mut()
                .find(|pending| pending.id() == conflict.id())
            {
                Some(existing) => *existing = conflict,
                None => self.pending.push(conflict),
            }
        }
    }

    /// Apply `choice` for the conflict at `index` and drop it from the list
    ///
    /// When the quote no longer exists in `store` the store is left alone,
    /// but the conflict is still removed.
    pub fn resolve(
        &mut self,
        index: usize,
        choice: ConflictChoice,
        store: &mut QuoteStore,
    ) -> Result<Resolution> {
        if index >= self.pending.len() {
            return Err(Error::ConflictNotFound(index));
        }
        let conflict = self.pending.remove(index);
        let chosen = conflict.chosen(choice).clone();
        let applied = store.replace(conflict.local.id, chosen);
        if !applied {
            tracing::info!(
                "Quote {} no longer exists locally; dropping its conflict",
                conflict.id()
            );
        }

        Ok(Resolution {
            conflict,
            choice,
            applied,
            remaining: self.pending.len(),
        })
    }
}
