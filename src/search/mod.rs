// src/search/mod.rs
pub mod categories;
pub mod client;
pub mod keymap;
pub mod session;
pub mod suggest;

pub use categories::{SearchHit, SearchResultSet};
pub use client::{CatalogBackend, HttpSearchBackend, SearchBackend};
pub use keymap::{Key, KeyChord, Keymap, Modifier, SearchAction};
pub use session::{Phase, SearchRequest, SearchSession};

use anyhow::Result;
use metrics::{describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

/// Shown instead of querying while the text is too short.
pub const PROMPT_MESSAGE: &str = "Keep typing to search (2 characters minimum).";

/// Shown when the backend request fails. Never retried automatically.
pub const ERROR_MESSAGE: &str = "Failed to load results. Please try again.";

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("search_requests_total", "Committed queries sent to the backend.");
        describe_counter!(
            "search_stale_dropped_total",
            "Late answers dropped by the session id gate."
        );
        describe_counter!(
            "search_upstream_errors_total",
            "Upstream search service failures."
        );
        describe_histogram!("search_upstream_ms", "Upstream search time in milliseconds.");
        describe_gauge!("search_last_total", "Result count of the last served search.");
    });
}

/// Short stable id for logs; the raw query never appears in them.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// What one query produced, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchReply {
    /// The query as received, echoed for the UI.
    pub query: String,
    pub results: SearchResultSet,
    pub total: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

pub fn no_results_message(query: &str) -> String {
    format!("No results for '{query}'. Check the spelling or try a different term.")
}

/// Answer one committed query.
///
/// Too-short queries get the prompt without touching the backend; an
/// empty answer gets the no-results message plus a spelling hint when
/// a catalog term is close. A backend failure propagates so the
/// caller can show [`ERROR_MESSAGE`]; that is the one outcome treated
/// as an actual error.
pub async fn run_search(
    backend: &dyn SearchBackend,
    query: &str,
    min_query_len: usize,
    suggest_threshold: f64,
) -> Result<SearchReply> {
    ensure_metrics_described();

    let trimmed = query.trim();
    if trimmed.chars().count() < min_query_len {
        return Ok(SearchReply {
            query: query.to_string(),
            results: SearchResultSet::default(),
            total: 0,
            message: Some(PROMPT_MESSAGE.to_string()),
            suggestion: None,
        });
    }

    let results = backend.search(trimmed).await?;
    let total = results.total();
    gauge!("search_last_total").set(total as f64);
    tracing::info!(
        target: "search",
        id = %anon_hash(trimmed),
        backend = backend.name(),
        total,
        "search served"
    );

    let (message, suggestion) = if total == 0 {
        let hint = suggest::suggest_term(trimmed, &client::catalog_terms(), suggest_threshold)
            .map(str::to_string);
        (Some(no_results_message(query)), hint)
    } else {
        (None, None)
    };

    Ok(SearchReply {
        query: query.to_string(),
        results,
        total,
        message,
        suggestion,
    })
}
