//! In-memory quote store
//!
//! The store owns the canonical ordered list of quotes used for display and
//! mutation. It never touches persistence; callers write it back after
//! every mutation.

use std::collections::{BTreeSet, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Error, Result};
use crate::models::{Quote, QuoteDraft, QuoteId};
use crate::util::now_millis;

/// Category given to the built-in seed quotes
pub const DEFAULT_CATEGORY: &str = "Motivation";

const DEFAULT_QUOTES: [&str; 4] = [
    "The greatest glory in living lies not in never falling, but in rising every time we fall.",
    "The way to get started is to quit talking and begin doing.",
    "If life were predictable it would cease to be life, and be without flavor.",
    "Life is what happens when you're busy making other plans.",
];

/// Seed quotes used when no persisted quotes exist (ids 1-4)
#[must_use]
pub fn default_quotes(timestamp: i64) -> Vec<Quote> {
    DEFAULT_QUOTES
        .iter()
        .zip(1_i64..)
        .map(|(text, id)| Quote::new(id, *text, DEFAULT_CATEGORY, timestamp))
        .collect()
}

/// Monotonic time-seeded id generator
///
/// Each id is `max(now_ms, last + 1)`, bumped past any id reported as taken.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdGenerator {
    last_issued: i64,
}

impl IdGenerator {
    pub fn next(&mut self, now_ms: i64, is_taken: impl Fn(QuoteId) -> bool) -> QuoteId {
        let mut candidate = now_ms.max(self.last_issued.saturating_add(1));
        while is_taken(QuoteId::new(candidate)) {
            candidate = candidate.saturating_add(1);
        }
        self.last_issued = candidate;
        QuoteId::new(candidate)
    }
}

/// Ordered collection of quotes
#[derive(Debug, Clone, Default)]
pub struct QuoteStore {
    quotes: Vec<Quote>,
    ids: IdGenerator,
}

impl QuoteStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_quotes(quotes: Vec<Quote>) -> Self {
        Self {
            quotes,
            ids: IdGenerator::default(),
        }
    }

    /// Store seeded with the four default quotes
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::from_quotes(default_quotes(now_millis()))
    }

    #[must_use]
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// First quote with the given id
    #[must_use]
    pub fn get(&self, id: QuoteId) -> Option<&Quote> {
        self.quotes.iter().find(|quote| quote.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: QuoteId) -> bool {
        self.get(id).is_some()
    }

    /// Add a quote, assigning a fresh id and the current time when absent
    ///
    /// An explicit id already used by another quote is replaced by a fresh one.
    pub fn add(&mut self, draft: QuoteDraft) -> Result<&Quote> {
        let mut quote = self.materialize(draft.normalized()?, &HashSet::new());
        if self.contains(quote.id) {
            quote.id = self.fresh_id(&HashSet::new());
        }
        let index = self.quotes.len();
        self.quotes.push(quote);
        Ok(&self.quotes[index])
    }

    /// Turn a normalized draft into a record without inserting it
    ///
    /// Generated ids avoid both the store's ids and `reserved`.
    pub(crate) fn materialize(&mut self, draft: QuoteDraft, reserved: &HashSet<QuoteId>) -> Quote {
        let id = match draft.id {
            Some(id) => id,
            None => self.fresh_id(reserved),
        };
        Quote {
            id,
            text: draft.text,
            category: draft.category,
            timestamp: draft.timestamp.unwrap_or_else(now_millis),
        }
    }

    /// Allocate an id not used by the store or by `reserved`
    pub(crate) fn fresh_id(&mut self, reserved: &HashSet<QuoteId>) -> QuoteId {
        let taken = self
            .quotes
            .iter()
            .map(|quote| quote.id)
            .collect::<HashSet<_>>();
        self.ids.next(now_millis(), |id| {
            taken.contains(&id) || reserved.contains(&id)
        })
    }

    pub(crate) fn push(&mut self, quote: Quote) {
        self.quotes.push(quote);
    }

    /// Replace the whole collection
    pub fn replace_all(&mut self, quotes: Vec<Quote>) {
        self.quotes = quotes;
    }

    /// Overwrite the first record with `id`; returns false when absent
    pub fn replace(&mut self, id: QuoteId, quote: Quote) -> bool {
        match self.quotes.iter_mut().find(|existing| existing.id == id) {
            Some(existing) => {
                *existing = quote;
                true
            }
            None => false,
        }
    }

    /// Quotes in `category` (case-insensitive), or all of them for `"all"`
    #[must_use]
    pub fn filter_by_category(&self, category: &str) -> Vec<&Quote> {
        self.quotes
            .iter()
            .filter(|quote| quote.matches_category(category))
            .collect()
    }

    /// Sorted, de-duplicated category names
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        self.quotes
            .iter()
            .map(|quote| quote.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Whether any quote carries `category` (case-insensitive)
    #[must_use]
    pub fn has_category(&self, category: &str) -> bool {
        let wanted = category.trim().to_lowercase();
        self.quotes
            .iter()
            .any(|quote| quote.category.to_lowercase() == wanted)
    }
}

/// Pick one quote uniformly at random from `subset`
pub fn pick_random<'a, R: Rng + ?Sized>(subset: &[&'a Quote], rng: &mut R) -> Result<&'a Quote> {
    subset.choose(rng).copied().ok_or(Error::EmptySet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_store() -> QuoteStore {
        QuoteStore::from_quotes(vec![
            Quote::new(1, "Rise again", "Motivation", 10),
            Quote::new(2, "Know thyself", "Wisdom", 20),
            Quote::new(3, "Begin doing", "motivation", 30),
        ])
    }

    #[test]
    fn test_default_quotes_seed_ids_one_to_four() {
        let quotes = default_quotes(5);
        let ids = quotes.iter().map(|quote| quote.id.get()).collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert!(quotes.iter().all(|quote| quote.category == DEFAULT_CATEGORY));
        assert!(quotes.iter().all(|quote| quote.timestamp == 5));
    }

    #[test]
    fn test_add_assigns_id_and_timestamp() {
        let mut store = QuoteStore::new();
        let before = now_millis();
        let quote = store.add(QuoteDraft::new("Fresh", "New")).unwrap().clone();

        assert!(quote.id.get() >= before);
        assert!(quote.timestamp >= before);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_add_preserves_given_id_and_timestamp() {
        let mut store = QuoteStore::new();
        let draft = QuoteDraft::new("Kept", "Wisdom")
            .with_id(QuoteId::new(99))
            .with_timestamp(1234);
        let quote = store.add(draft).unwrap();

        assert_eq!(quote, &Quote::new(99, "Kept", "Wisdom", 1234));
    }

    #[test]
    fn test_add_with_taken_id_gets_fresh_id() {
        let mut store = QuoteStore::from_quotes(vec![Quote::new(1, "One", "M", 1)]);
        let quote = store
            .add(QuoteDraft::new("Other", "M").with_id(QuoteId::new(1)))
            .unwrap();
        assert_ne!(quote.id, QuoteId::new(1));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_add_rejects_blank_text() {
        let mut store = QuoteStore::new();
        assert!(matches!(
            store.add(QuoteDraft::new("   ", "Wisdom")),
            Err(Error::InvalidInput(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_rapid_adds_get_distinct_ids() {
        let mut store = QuoteStore::new();
        let mut ids = HashSet::new();
        for index in 0..50 {
            let quote = store
                .add(QuoteDraft::new(format!("quote {index}"), "Bulk"))
                .unwrap();
            ids.insert(quote.id);
        }
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn test_id_generator_skips_taken_ids() {
        let mut generator = IdGenerator::default();
        let taken = [QuoteId::new(100), QuoteId::new(101)];
        let id = generator.next(100, |id| taken.contains(&id));
        assert_eq!(id, QuoteId::new(102));

        // Clock going backwards still yields increasing ids
        let next = generator.next(50, |_| false);
        assert_eq!(next, QuoteId::new(103));
    }

    #[test]
    fn test_filter_by_category_ignores_case() {
        let store = sample_store();
        let motivation = store.filter_by_category("MOTIVATION");
        assert_eq!(motivation.len(), 2);
        assert_eq!(store.filter_by_category("all").len(), 3);
        assert!(store.filter_by_category("Humor").is_empty());
    }

    #[test]
    fn test_categories_sorted_and_deduplicated() {
        let mut store = sample_store();
        store.add(QuoteDraft::new("Again", "Wisdom")).unwrap();
        assert_eq!(
            store.categories(),
            vec!["Motivation", "Wisdom", "motivation"]
        );
        assert!(store.has_category("wisdom"));
        assert!(!store.has_category("humor"));
    }

    #[test]
    fn test_replace_overwrites_first_match() {
        let mut store = sample_store();
        assert!(store.replace(QuoteId::new(2), Quote::new(2, "Changed", "Wisdom", 99)));
        assert_eq!(store.get(QuoteId::new(2)).unwrap().text, "Changed");
        assert!(!store.replace(QuoteId::new(42), Quote::new(42, "x", "y", 1)));
    }

    #[test]
    fn test_pick_random_from_subset() {
        let store = sample_store();
        let mut rng = StdRng::seed_from_u64(7);
        let subset = store.filter_by_category("wisdom");
        let picked = pick_random(&subset, &mut rng).unwrap();
        assert_eq!(picked.id, QuoteId::new(2));
    }

    #[test]
    fn test_pick_random_empty_subset_fails() {
        let store = sample_store();
        let mut rng = StdRng::seed_from_u64(7);
        let subset = store.filter_by_category("Humor");
        assert!(matches!(pick_random(&subset, &mut rng), Err(Error::EmptySet)));
    }
}
