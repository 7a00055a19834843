//! Data models for quoteday

mod quote;
mod sync_conflict;

pub use quote::{Quote, QuoteDraft, QuoteId, ALL_CATEGORIES};
pub use sync_conflict::{ConflictChoice, SyncConflict};
