//! Persisted session state shared by the orchestrator and front ends

use rand::Rng;

use crate::conflicts::{ConflictResolver, Resolution};
use crate::error::{Error, Result};
use crate::merge::MergeOutcome;
use crate::models::{ConflictChoice, Quote, QuoteDraft, SyncConflict, ALL_CATEGORIES};
use crate::persistence::{KeyValueStore, LocalState};
use crate::store::{default_quotes, pick_random, QuoteStore};
use crate::transfer::{self, ImportSummary};
use crate::util::now_millis;

/// Quote store, pending conflicts and sync bookkeeping
///
/// Mutations first pick up whatever other handles on the same store wrote,
/// then write back to the underlying [`KeyValueStore`] before returning.
#[derive(Debug)]
pub struct QuoteBook<K> {
    store: QuoteStore,
    state: LocalState<K>,
    resolver: ConflictResolver,
    last_sync: i64,
}

impl<K: KeyValueStore> QuoteBook<K> {
    /// Load persisted state, seeding the default quotes on first run
    pub fn open(kv: K) -> Result<Self> {
        let state = LocalState::new(kv);
        let store = match state.load_quotes()? {
            Some(quotes) => QuoteStore::from_quotes(quotes),
            None => {
                let quotes = default_quotes(now_millis());
                state.save_quotes(&quotes)?;
                tracing::info!("Seeded {} default quotes", quotes.len());
                QuoteStore::from_quotes(quotes)
            }
        };
        let resolver = ConflictResolver::new(state.conflicts()?);
        let last_sync = state.last_sync()?;

        Ok(Self {
            store,
            state,
            resolver,
            last_sync,
        })
    }

    #[must_use]
    pub const fn store(&self) -> &QuoteStore {
        &self.store
    }

    #[must_use]
    pub fn quotes(&self) -> &[Quote] {
        self.store.quotes()
    }

    #[must_use]
    pub const fn local_state(&self) -> &LocalState<K> {
        &self.state
    }

    #[must_use]
    pub fn conflicts(&self) -> &[SyncConflict] {
        self.resolver.pending()
    }

    #[must_use]
    pub const fn resolver(&self) -> &ConflictResolver {
        &self.resolver
    }

    /// Last successful sync (Unix ms), 0 when never synced
    #[must_use]
    pub const fn last_sync(&self) -> i64 {
        self.last_sync
    }

    /// Re-read quotes, conflicts and `lastSync` from the store
    pub fn reload(&mut self) -> Result<()> {
        if let Some(quotes) = self.state.load_quotes()? {
            self.store.replace_all(quotes);
        }
        self.resolver = ConflictResolver::new(self.state.conflicts()?);
        self.last_sync = self.state.last_sync()?;
        Ok(())
    }

    pub fn add_quote(&mut self, draft: QuoteDraft) -> Result<Quote> {
        self.reload()?;
        let quote = self.store.add(draft)?.clone();
        self.save_quotes()?;
        Ok(quote)
    }

    /// Import a JSON payload; nothing changes when the payload is rejected
    pub fn import_json(&mut self, payload: &str) -> Result<ImportSummary> {
        self.reload()?;
        let summary = transfer::import_json(&mut self.store, payload)?;
        if summary.added > 0 {
            self.save_quotes()?;
        }
        Ok(summary)
    }

    pub fn export_json(&self) -> Result<String> {
        Ok(transfer::render_json_export(self.store.quotes())?)
    }

    /// Pick a random quote in `category` and remember it as last viewed
    pub fn random_quote<R: Rng + ?Sized>(&mut self, category: &str, rng: &mut R) -> Result<Quote> {
        self.reload()?;
        let subset = self.store.filter_by_category(category);
        let quote = pick_random(&subset, rng)?.clone();
        self.state.set_last_viewed_quote(&quote.text)?;
        Ok(quote)
    }

    #[must_use]
    pub fn last_viewed_quote(&self) -> Option<String> {
        match self.state.last_viewed_quote() {
            Ok(text) => text,
            Err(error) => {
                tracing::warn!("Ignoring unreadable last viewed quote: {error}");
                None
            }
        }
    }

    /// Persisted category selection, `"all"` when unset or no longer present
    pub fn selected_category(&self) -> Result<String> {
        Ok(self
            .state
            .last_category()?
            .filter(|category| {
                category.eq_ignore_ascii_case(ALL_CATEGORIES) || self.store.has_category(category)
            })
            .unwrap_or_else(|| ALL_CATEGORIES.to_string()))
    }

    /// Persist `category` as the selection; it must exist or be `"all"`
    pub fn select_category(&mut self, category: &str) -> Result<String> {
        self.reload()?;
        let wanted = category.trim();
        let selected = if wanted.eq_ignore_ascii_case(ALL_CATEGORIES) {
            ALL_CATEGORIES.to_string()
        } else {
            self.store
                .categories()
                .into_iter()
                .find(|existing| existing.to_lowercase() == wanted.to_lowercase())
                .ok_or_else(|| Error::InvalidInput(format!("Unknown category '{wanted}'")))?
        };
        self.state.set_last_category(&selected)?;
        Ok(selected)
    }

    /// File the merge conflicts and commit the merged set
    ///
    /// In-memory state only changes once the store accepted the write. The
    /// outcome must come from the current quotes, so callers [`reload`] first
    /// when other handles may have written.
    ///
    /// [`reload`]: Self::reload
    pub fn commit_merge(&mut self, outcome: MergeOutcome) -> Result<()> {
        if !outcome.conflicts.is_empty() {
            let mut resolver = self.resolver.clone();
            resolver.file(outcome.conflicts);
            self.state.save_conflicts(resolver.pending())?;
            self.resolver = resolver;
        }
        self.state.save_quotes(&outcome.merged)?;
        self.store.replace_all(outcome.merged);
        Ok(())
    }

    pub fn mark_synced(&mut self, at: i64) -> Result<()> {
        self.state.set_last_sync(at)?;
        self.last_sync = at;
        Ok(())
    }

    /// Apply `choice` to the conflict at `index` and persist the result
    pub fn resolve_conflict(&mut self, index: usize, choice: ConflictChoice) -> Result<Resolution> {
        self.reload()?;
        let resolution = self.resolver.resolve(index, choice, &mut self.store)?;
        if resolution.applied {
            self.save_quotes()?;
        }
        self.save_conflicts()?;
        Ok(resolution)
    }

    fn save_quotes(&self) -> Result<()> {
        self.state.save_quotes(self.store.quotes())
    }

    fn save_conflicts(&self) -> Result<()> {
        self.state.save_conflicts(self.resolver.pending())
    }
}
