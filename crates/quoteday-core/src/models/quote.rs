//! Quote model

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Category selector that matches every quote.
pub const ALL_CATEGORIES: &str = "all";

/// Integer identifier of a quote within a set
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteId(i64);

impl QuoteId {
    /// Wrap a raw integer id
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw integer value
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for QuoteId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A quote record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Identifier, unique within a set
    pub id: QuoteId,
    /// Quote text
    pub text: String,
    /// Category label
    pub category: String,
    /// Last-modified timestamp (Unix ms), used for change detection only
    pub timestamp: i64,
}

impl Quote {
    /// Create a quote from its parts
    #[must_use]
    pub fn new(
        id: impl Into<QuoteId>,
        text: impl Into<String>,
        category: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            category: category.into(),
            timestamp,
        }
    }

    /// Case-insensitive category match; `"all"` matches every quote
    #[must_use]
    pub fn matches_category(&self, category: &str) -> bool {
        let category = category.trim();
        category.eq_ignore_ascii_case(ALL_CATEGORIES)
            || self.category.to_lowercase() == category.to_lowercase()
    }

    /// Get the text truncated to `max_len` characters, with an ellipsis when cut
    #[must_use]
    pub fn preview(&self, max_len: usize) -> String {
        let char_count = self.text.chars().count();
        if char_count <= max_len {
            return self.text.clone();
        }
        let kept = max_len.saturating_sub(3);
        let mut preview = self.text.chars().take(kept).collect::<String>();
        preview.push_str("...");
        preview
    }
}

/// Input shape for adding or importing a quote
///
/// `id` and `timestamp` are assigned by the store when absent and kept
/// verbatim when present.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuoteDraft {
    pub text: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<QuoteId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl QuoteDraft {
    /// Create a draft with no id or timestamp
    #[must_use]
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
            id: None,
            timestamp: None,
        }
    }

    #[must_use]
    pub const fn with_id(mut self, id: QuoteId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Trim text and category, rejecting either when empty
    pub fn normalized(self) -> Result<Self> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(Error::InvalidInput("quote text must not be empty".into()));
        }
        let category = self.category.trim();
        if category.is_empty() {
            return Err(Error::InvalidInput(
                "quote category must not be empty".into(),
            ));
        }
        Ok(Self {
            text: text.to_string(),
            category: category.to_string(),
            ..self
        })
    }
}

impl From<&Quote> for QuoteDraft {
    fn from(quote: &Quote) -> Self {
        Self {
            text: quote.text.clone(),
            category: quote.category.clone(),
            id: Some(quote.id),
            timestamp: Some(quote.timestamp),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_serializes_flat_fields() {
        let quote = Quote::new(1, "Stay hungry", "Motivation", 100);
        let json = serde_json::to_value(&quote).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 1,
                "text": "Stay hungry",
                "category": "Motivation",
                "timestamp": 100
            })
        );
    }

    #[test]
    fn test_matches_category_ignores_case() {
        let quote = Quote::new(1, "text", "Motivation", 1);
        assert!(quote.matches_category("motivation"));
        assert!(quote.matches_category("MOTIVATION"));
        assert!(quote.matches_category("all"));
        assert!(quote.matches_category("All"));
        assert!(!quote.matches_category("Wisdom"));
    }

    #[test]
    fn test_preview_truncates_with_ellipsis() {
        let quote = Quote::new(1, "The way to get started is to quit talking", "M", 1);
        assert_eq!(quote.preview(15), "The way to g...");
        assert_eq!(quote.preview(200), quote.text);
    }

    #[test]
    fn test_draft_normalized_trims() {
        let draft = QuoteDraft::new("  hello  ", " Wisdom ").normalized().unwrap();
        assert_eq!(draft.text, "hello");
        assert_eq!(draft.category, "Wisdom");
    }

    #[test]
    fn test_draft_normalized_rejects_empty_fields() {
        assert!(matches!(
            QuoteDraft::new("  ", "Wisdom").normalized(),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            QuoteDraft::new("text", "").normalized(),
            Err(Error::InvalidInput(_))
        ));
    }
}
