// src/search/client.rs
//! Backend search clients.
//!
//! The wire response may carry any number of categories; decoding goes
//! straight into [`SearchResultSet`], so only the public ones survive.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use serde::Deserialize;

use crate::news::fallback::fallback_stories;
use crate::search::categories::{SearchHit, SearchResultSet};

/// The site's public product line: (name, category).
pub const PRODUCT_CATALOG: [(&str, &str); 4] = [
    ("Kestrel", "Drones"),
    ("Palisade", "Towers"),
    ("Ridgeback", "Ground Vehicles"),
    ("Meridian", "Software"),
];

/// Terms the spelling hint may propose.
pub fn catalog_terms() -> Vec<&'static str> {
    let mut terms: Vec<&'static str> = Vec::with_capacity(PRODUCT_CATALOG.len() * 2);
    for (name, category) in PRODUCT_CATALOG {
        terms.push(name);
        terms.push(category);
    }
    terms
}

/// Route for a product result: lower-cased name off the site root.
pub fn product_route(name: &str) -> String {
    format!("/{}", name.to_lowercase())
}

/// Route for a news result: slug under /news.
pub fn news_route(slug: &str) -> String {
    format!("/news/{slug}")
}

/// Something that can answer a committed query.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &str) -> Result<SearchResultSet>;
    fn name(&self) -> &'static str;
}

/* ---- wire shapes of the upstream search service ---- */

#[derive(Debug, Deserialize)]
struct WireProduct {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct WireNews {
    id: String,
    title: String,
    #[serde(default)]
    slug: String,
}

/// Only the public categories are modeled; serde drops the rest.
#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    products: Vec<WireProduct>,
    #[serde(default)]
    news: Vec<WireNews>,
}

impl WireResponse {
    fn into_result_set(self) -> SearchResultSet {
        SearchResultSet {
            products: self
                .products
                .into_iter()
                .map(|p| SearchHit {
                    route: product_route(&p.name),
                    id: p.id,
                    title: p.name,
                })
                .collect(),
            news: self
                .news
                .into_iter()
                .map(|n| SearchHit {
                    route: news_route(&n.slug),
                    id: n.id,
                    title: n.title,
                })
                .collect(),
        }
    }
}

/// HTTP client for the upstream search service.
#[derive(Clone)]
pub struct HttpSearchBackend {
    endpoint: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpSearchBackend {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
            timeout: Duration::from_secs(4),
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

#[async_trait]
impl SearchBackend for HttpSearchBackend {
    async fn search(&self, query: &str) -> Result<SearchResultSet> {
        let t0 = std::time::Instant::now();
        let rsp = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query)])
            .timeout(self.timeout)
            .send()
            .await
            .context("search upstream request")?;

        let rsp = match rsp.error_for_status() {
            Ok(r) => r,
            Err(e) => {
                counter!("search_upstream_errors_total").increment(1);
                return Err(e).context("search upstream http status");
            }
        };

        let wire = rsp
            .json::<WireResponse>()
            .await
            .context("search upstream json")?;
        histogram!("search_upstream_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        Ok(wire.into_result_set())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Offline backend over the embedded product line and news dataset.
/// Used by the demo binary and wherever no upstream is configured.
#[derive(Debug, Clone, Default)]
pub struct CatalogBackend;

impl CatalogBackend {
    fn matches(haystack: &str, needle: &str) -> bool {
        haystack.to_lowercase().contains(needle)
    }
}

#[async_trait]
impl SearchBackend for CatalogBackend {
    async fn search(&self, query: &str) -> Result<SearchResultSet> {
        let q = query.trim().to_lowercase();

        let products = PRODUCT_CATALOG
            .into_iter()
            .filter(|(name, category)| Self::matches(name, &q) || Self::matches(category, &q))
            .map(|(name, _)| SearchHit {
                id: name.to_lowercase(),
                title: name.to_string(),
                route: product_route(name),
            })
            .collect();

        let news = fallback_stories()
            .into_iter()
            .filter(|s| Self::matches(&s.title, &q))
            .map(|s| SearchHit {
                id: s.slug.clone(),
                title: s.title,
                route: news_route(&s.slug),
            })
            .collect();

        Ok(SearchResultSet { products, news })
    }

    fn name(&self) -> &'static str {
        "catalog"
    }
}
