//! Quote import/export helpers shared by all front ends.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::models::{Quote, QuoteDraft, QuoteId};
use crate::store::QuoteStore;

/// Default file name offered for exports
pub const EXPORT_FILE_NAME: &str = "quotes.json";

/// Counts reported after an import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Records appended to the store (including reassigned ones)
    pub added: usize,
    /// Records identical to an existing quote
    pub skipped: usize,
    /// Records whose id collided with a different quote and got a fresh id
    pub reassigned: usize,
}

/// Render quotes as a pretty-printed JSON array.
pub fn render_json_export(quotes: &[Quote]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(quotes)
}

/// Validate an import payload as a whole
///
/// The payload must be a JSON array of objects with non-empty string `text`
/// and `category` fields; `id` and `timestamp` are optional integers. Any
/// invalid element rejects the entire payload.
pub fn parse_import(payload: &str) -> Result<Vec<QuoteDraft>> {
    let value: Value = serde_json::from_str(payload)
        .map_err(|error| Error::ImportFormat(format!("not valid JSON: {error}")))?;
    let Value::Array(items) = value else {
        return Err(Error::ImportFormat("expected a JSON array of quotes".into()));
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let Value::Object(fields) = item else {
                return Err(Error::ImportFormat(format!(
                    "element {index} is not an object"
                )));
            };
            parse_item(index, fields)
        })
        .collect()
}

fn parse_item(index: usize, fields: &Map<String, Value>) -> Result<QuoteDraft> {
    let text = required_text(index, fields, "text")?;
    let category = required_text(index, fields, "category")?;
    let id = optional_integer(index, fields, "id")?.map(QuoteId::new);
    let timestamp = optional_integer(index, fields, "timestamp")?;

    Ok(QuoteDraft {
        text,
        category,
        id,
        timestamp,
    })
}

fn required_text(index: usize, fields: &Map<String, Value>, name: &str) -> Result<String> {
    match fields.get(name) {
        Some(Value::String(value)) if !value.trim().is_empty() => Ok(value.clone()),
        Some(Value::String(_)) => Err(Error::ImportFormat(format!(
            "element {index}: field '{name}' must not be empty"
        ))),
        Some(_) => Err(Error::ImportFormat(format!(
            "element {index}: field '{name}' must be a string"
        ))),
        None => Err(Error::ImportFormat(format!(
            "element {index}: missing field '{name}'"
        ))),
    }
}

fn optional_integer(index: usize, fields: &Map<String, Value>, name: &str) -> Result<Option<i64>> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_i64().map(Some).ok_or_else(|| {
            Error::ImportFormat(format!("element {index}: field '{name}' must be an integer"))
        }),
    }
}

/// Append validated drafts to `store`
///
/// Records identical to an existing quote are skipped. A record whose id is
/// already used by a different quote gets a fresh id. Generated ids never
/// take an id that a later record in the same batch carries explicitly.
pub fn import_drafts(store: &mut QuoteStore, drafts: Vec<QuoteDraft>) -> ImportSummary {
    let reserved = drafts
        .iter()
        .filter_map(|draft| draft.id)
        .collect::<HashSet<_>>();
    let mut summary = ImportSummary::default();

    for draft in drafts {
        let mut quote = store.materialize(draft, &reserved);
        match store.get(quote.id) {
            Some(existing) if *existing == quote => {
                summary.skipped += 1;
                continue;
            }
            Some(_) => {
                quote.id = store.fresh_id(&reserved);
                summary.reassigned += 1;
            }
            None => {}
        }
        store.push(quote);
        summary.added += 1;
    }

    summary
}

/// Parse `payload` and import it into `store`; the store is untouched on error.
pub fn import_json(store: &mut QuoteStore, payload: &str) -> Result<ImportSummary> {
    let drafts = parse_import(payload)?;
    Ok(import_drafts(store, drafts))
}
