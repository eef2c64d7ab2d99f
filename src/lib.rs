// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod config;
pub mod content;
pub mod metrics;
pub mod news;
pub mod search;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::config::{ConfigHandle, SiteConfig};
pub use crate::content::{parse_content_items, ContentItem};
pub use crate::news::FrontendNewsItem;
pub use crate::search::{SearchResultSet, SearchSession};
