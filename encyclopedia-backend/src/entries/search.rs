//! Title search and random selection over an entry listing.

use rand::Rng;
use rand::seq::SliceRandom;

/// Result of matching a query against the entry titles
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The query was empty; nothing was searched
    NoQuery,
    /// The query names an entry exactly (case-insensitive); carries the stored title
    Exact(String),
    /// Titles containing the query, in listing order (may be empty)
    Matches(Vec<String>),
}

/// Match `query` against `entries` case-insensitively.
pub fn search(query: &str, entries: &[String]) -> SearchOutcome {
    let query = query.trim();
    if query.is_empty() {
        return SearchOutcome::NoQuery;
    }

    let needle = query.to_lowercase();

    if let Some(exact) = entries.iter().find(|title| title.to_lowercase() == needle) {
        return SearchOutcome::Exact(exact.clone());
    }

    let matches = entries
        .iter()
        .filter(|title| title.to_lowercase().contains(&needle))
        .cloned()
        .collect();

    SearchOutcome::Matches(matches)
}

/// Uniformly chosen title, None for an empty listing
pub fn pick_random<'a, R: Rng + ?Sized>(entries: &'a [String], rng: &mut R) -> Option<&'a String> {
    entries.choose(rng)
}
