// src/search/suggest.rs
//! "Did you mean" hint for empty result sets.
//!
//! Similarity: `strsim::normalized_levenshtein` over lower-cased
//! terms; a hint is only offered above the configured threshold, so a
//! wild miss gets no guess at all.

use strsim::normalized_levenshtein;

pub const DEFAULT_SUGGEST_THRESHOLD: f64 = 0.72;

/// Closest catalog term to `query`, if it is close enough.
pub fn suggest_term<'a>(query: &str, terms: &[&'a str], threshold: f64) -> Option<&'a str> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return None;
    }

    let mut best: Option<(&'a str, f64)> = None;
    for term in terms {
        let sim = normalized_levenshtein(&q, &term.to_lowercase());
        let better = match best {
            Some((_, s)) => sim > s,
            None => true,
        };
        if better {
            best = Some((term, sim));
        }
    }

    best.filter(|(_, sim)| *sim >= threshold).map(|(t, _)| t)
}
