//! quoteday-core - Core library for quoteday
//!
//! This crate contains the quote models, the local store and persistence
//! layer, the remote data source, and the merge/conflict/sync machinery used
//! by every quoteday front end.

pub mod config;
pub mod conflicts;
pub mod error;
pub mod merge;
pub mod models;
pub mod notify;
pub mod persistence;
pub mod remote;
pub mod state;
pub mod store;
pub mod sync;
pub mod transfer;
pub mod util;

pub use error::{Error, Result};
pub use models::{ConflictChoice, Quote, QuoteDraft, QuoteId, SyncConflict};
pub use state::SyncStatus;
