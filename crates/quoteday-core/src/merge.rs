//! Local/remote merge engine
//!
//! Unseen remote ids are adopted, matching timestamps are no-ops, and any
//! timestamp mismatch becomes a [`SyncConflict`] while the local record is
//! kept as-is. Nothing is overwritten automatically.

use std::collections::{HashMap, HashSet};

use crate::models::{Quote, QuoteId, SyncConflict};

/// Result of merging a remote batch into the local set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Local records in their original order, followed by adopted remote ones
    pub merged: Vec<Quote>,
    /// Timestamp mismatches, in remote processing order
    pub conflicts: Vec<SyncConflict>,
    /// Remote records appended because their id was unseen
    pub adopted: usize,
    /// Remote records already present with the same timestamp
    pub unchanged: usize,
}

/// Merge `remote` into a copy of `local`
///
/// Lookups use the first local record with a given id. Within `remote`, only
/// the first record per id is considered; later duplicates are dropped.
pub fn merge(local: &[Quote], remote: &[Quote]) -> MergeOutcome {
    let mut merged = local.to_vec();
    let mut positions = HashMap::with_capacity(merged.len() + remote.len());
    for (index, quote) in merged.iter().enumerate() {
        positions.entry(quote.id).or_insert(index);
    }

    let mut seen_remote = HashSet::<QuoteId>::with_capacity(remote.len());
    let mut conflicts = Vec::new();
    let mut adopted = 0;
    let mut unchanged = 0;

    for remote_quote in remote {
        if !seen_remote.insert(remote_quote.id) {
            tracing::warn!(
                "Dropping duplicate remote quote id {} in the same batch",
                remote_quote.id
            );
            continue;
        }

        match positions.get(&remote_quote.id) {
            None => {
                positions.insert(remote_quote.id, merged.len());
                merged.push(remote_quote.clone());
                adopted += 1;
            }
            Some(&index) if merged[index].timestamp == remote_quote.timestamp => {
                unchanged += 1;
            }
            Some(&index) => {
                conflicts.push(SyncConflict::new(
                    merged[index].clone(),
                    remote_quote.clone(),
                ));
            }
        }
    }

    tracing::debug!(
        adopted,
        unchanged,
        conflicts = conflicts.len(),
        "Merged {} remote quotes into {} local quotes",
        remote.len(),
        local.len()
    );

    MergeOutcome {
        merged,
        conflicts,
        adopted,
        unchanged,
    }
}
