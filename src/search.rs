//! Free-text multi-term search against the fact store.
//!
//! A query splits on whitespace into independent terms; each term is matched
//! by case-insensitive substring containment against item name and item code,
//! with an optional outlet filter narrowing the candidate rows first.

use itertools::Itertools;
use serde::Serialize;

use crate::store::FactStore;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MatchOutcome {
    /// Exactly one distinct item matched the term.
    Resolved(String),
    /// More than one distinct item matched. Candidates are ordered by first
    /// appearance in the underlying table and need a caller-side pick before
    /// aggregation can proceed.
    Ambiguous(Vec<String>),
    /// Zero rows matched. A normal per-term result, not an error.
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermMatch {
    pub term: String,
    pub outcome: MatchOutcome,
}

/// Resolves every term of `query` independently; a term that finds nothing
/// never blocks the rest of the batch. Repeated terms are resolved per
/// occurrence, in input order.
pub fn resolve(store: &FactStore, query: &str, outlet: Option<&str>) -> Vec<TermMatch> {
    query
        .split_whitespace()
        .map(|term| TermMatch {
            term: term.to_string(),
            outcome: resolve_term(store, term, outlet),
        })
        .collect()
}

pub fn resolve_term(store: &FactStore, term: &str, outlet: Option<&str>) -> MatchOutcome {
    let needle = term.to_lowercase();
    let candidates: Vec<&str> = store
        .facts()
        .iter()
        .filter(|fact| outlet.is_none_or(|wanted| fact.outlet == wanted))
        .filter(|fact| {
            fact.item_name.to_lowercase().contains(&needle)
                || fact.item_code.to_lowercase().contains(&needle)
        })
        .map(|fact| fact.item_name.as_str())
        .unique()
        .collect();

    match candidates.as_slice() {
        [] => MatchOutcome::NotFound,
        [single] => MatchOutcome::Resolved((*single).to_string()),
        _ => MatchOutcome::Ambiguous(candidates.iter().map(|name| name.to_string()).collect()),
    }
}
