// src/search/session.rs
//! Debounced search session, modeled as a pure state machine.
//!
//! All time arrives through method arguments, so callers and tests
//! advance the clock explicitly; nothing here spawns timers or tasks.
//! The embedding layer drives it: feed keystrokes in, call
//! [`SearchSession::poll_commit`] on its tick, run the returned
//! request against a backend, and hand the answer back through
//! [`SearchSession::apply_response`] / [`SearchSession::apply_error`].

use chrono::{DateTime, Duration, Utc};
use metrics::counter;

use crate::search::categories::{SearchHit, SearchResultSet};

pub const DEFAULT_DEBOUNCE_MS: i64 = 300;
pub const DEFAULT_MIN_QUERY_LEN: usize = 2;

/// Where the session currently stands, derived from its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Surface closed, or open with nothing typed.
    Idle,
    /// Open with a query too short to search.
    Typing,
    /// Quiet period running; the raw query is long enough to search.
    Debouncing,
    /// A request is in flight for the committed query.
    Searching,
    /// An answer (possibly empty) is on display.
    Results,
    /// The last request failed; terminal until the query changes.
    Error,
}

/// A request the caller should now issue against the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub id: u64,
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Outcome {
    Results(SearchResultSet),
    Error(String),
}

#[derive(Debug, Clone)]
pub struct SearchSession {
    open: bool,
    raw: String,
    committed: String,
    /// Time of the latest keystroke; the debounce deadline base.
    pending_since: Option<DateTime<Utc>>,
    /// Id of the one request whose answer is still welcome.
    in_flight: Option<u64>,
    request_seq: u64,
    outcome: Option<Outcome>,
    selected: usize,
    debounce: Duration,
    min_query_len: usize,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSession {
    pub fn new() -> Self {
        Self {
            open: false,
            raw: String::new(),
            committed: String::new(),
            pending_since: None,
            in_flight: None,
            request_seq: 0,
            outcome: None,
            selected: 0,
            debounce: Duration::milliseconds(DEFAULT_DEBOUNCE_MS),
            min_query_len: DEFAULT_MIN_QUERY_LEN,
        }
    }

    pub fn with_debounce_ms(mut self, ms: i64) -> Self {
        self.debounce = Duration::milliseconds(ms.max(0));
        self
    }

    pub fn with_min_query_len(mut self, len: usize) -> Self {
        self.min_query_len = len.max(1);
        self
    }

    /* ---- surface lifecycle ---- */

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open the surface with a clean slate.
    pub fn open(&mut self) {
        self.open = true;
        self.reset_query_state();
    }

    /// Close the surface. Any in-flight request loses relevance here;
    /// its late answer will be dropped by the id gate.
    pub fn close(&mut self) {
        self.open = false;
        self.reset_query_state();
    }

    pub fn toggle(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open();
        }
    }

    fn reset_query_state(&mut self) {
        self.raw.clear();
        self.committed.clear();
        self.pending_since = None;
        self.in_flight = None;
        self.outcome = None;
        self.selected = 0;
    }

    /* ---- typing ---- */

    pub fn push_char(&mut self, c: char, now: DateTime<Utc>) {
        if !self.open {
            return;
        }
        self.raw.push(c);
        self.touch(now);
    }

    pub fn pop_char(&mut self, now: DateTime<Utc>) {
        if !self.open {
            return;
        }
        if self.raw.pop().is_some() {
            self.touch(now);
        }
    }

    /// Every keystroke restarts the quiet period and invalidates the
    /// previous outcome; displayed results always match the query.
    fn touch(&mut self, now: DateTime<Utc>) {
        self.pending_since = Some(now);
        self.outcome = None;
        self.selected = 0;
    }

    /* ---- debounce / request lifecycle ---- */

    /// Commit the raw query once the quiet period has elapsed.
    ///
    /// Returns the request to issue when the newly committed query is
    /// long enough to search; a shorter commit lands in the prompt
    /// state and returns nothing. Calling again without new input is a
    /// no-op, so one quiet period yields exactly one commit.
    pub fn poll_commit(&mut self, now: DateTime<Utc>) -> Option<SearchRequest> {
        if !self.open {
            return None;
        }
        let since = self.pending_since?;
        if now.signed_duration_since(since) < self.debounce {
            return None;
        }

        self.pending_since = None;
        self.committed = self.raw.clone();
        // A new commit supersedes whatever was still in flight.
        self.in_flight = None;

        if self.committed.chars().count() < self.min_query_len {
            return None;
        }

        self.request_seq += 1;
        self.in_flight = Some(self.request_seq);
        counter!("search_requests_total").increment(1);
        Some(SearchRequest {
            id: self.request_seq,
            query: self.committed.clone(),
        })
    }

    /// Accept an answer if it is still the one we are waiting for.
    /// Returns false for stale or after-close deliveries.
    pub fn apply_response(&mut self, id: u64, results: SearchResultSet) -> bool {
        if !self.open || self.in_flight != Some(id) {
            counter!("search_stale_dropped_total").increment(1);
            return false;
        }
        self.in_flight = None;
        self.selected = 0;
        self.outcome = Some(Outcome::Results(results));
        true
    }

    /// Same gate as [`Self::apply_response`], for a failed request.
    pub fn apply_error(&mut self, id: u64, message: impl Into<String>) -> bool {
        if !self.open || self.in_flight != Some(id) {
            counter!("search_stale_dropped_total").increment(1);
            return false;
        }
        self.in_flight = None;
        self.selected = 0;
        self.outcome = Some(Outcome::Error(message.into()));
        true
    }

    /* ---- selection / navigation ---- */

    pub fn select_next(&mut self) {
        let total = self.results().map(SearchResultSet::total).unwrap_or(0);
        if total > 0 {
            self.selected = (self.selected + 1) % total;
        }
    }

    pub fn select_prev(&mut self) {
        let total = self.results().map(SearchResultSet::total).unwrap_or(0);
        if total > 0 {
            self.selected = (self.selected + total - 1) % total;
        }
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_hit(&self) -> Option<&SearchHit> {
        self.results()?.nth(self.selected)
    }

    /// Navigate to the selected result: returns its route and closes
    /// the surface. Nothing selected, nothing happens.
    pub fn confirm(&mut self) -> Option<String> {
        let route = self.selected_hit()?.route.clone();
        self.close();
        Some(route)
    }

    /* ---- observers ---- */

    pub fn raw_query(&self) -> &str {
        &self.raw
    }

    pub fn committed_query(&self) -> &str {
        &self.committed
    }

    pub fn results(&self) -> Option<&SearchResultSet> {
        match &self.outcome {
            Some(Outcome::Results(set)) => Some(set),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.outcome {
            Some(Outcome::Error(msg)) => Some(msg),
            _ => None,
        }
    }

    pub fn phase(&self) -> Phase {
        if !self.open {
            return Phase::Idle;
        }
        if self.pending_since.is_some() {
            return if self.raw.chars().count() >= self.min_query_len {
                Phase::Debouncing
            } else {
                Phase::Typing
            };
        }
        if self.in_flight.is_some() {
            return Phase::Searching;
        }
        match &self.outcome {
            Some(Outcome::Results(_)) => Phase::Results,
            Some(Outcome::Error(_)) => Phase::Error,
            None => {
                if self.raw.is_empty() {
                    Phase::Idle
                } else {
                    Phase::Typing
                }
            }
        }
    }
}
