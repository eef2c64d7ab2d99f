// src/search/categories.rs
//! Public result categories.
//!
//! The backend index also holds non-public collections (customer
//! programs, internal documents). This surface renders products and
//! news only, so the result set has exactly those two fields; a
//! backend response carrying anything else has nowhere to land.

use serde::{Deserialize, Serialize};

/// A single rendered result: identifier, display title, destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub title: String,
    pub route: String,
}

/// Parallel ordered result lists, one per public category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultSet {
    #[serde(default)]
    pub products: Vec<SearchHit>,
    #[serde(default)]
    pub news: Vec<SearchHit>,
}

impl SearchResultSet {
    /// Sum across public categories, used for instrumentation.
    pub fn total(&self) -> usize {
        self.products.len() + self.news.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Entry at `idx` in display order: products first, then news.
    pub fn nth(&self, idx: usize) -> Option<&SearchHit> {
        self.products.iter().chain(self.news.iter()).nth(idx)
    }
}
