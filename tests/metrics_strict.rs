// tests/metrics_strict.rs
#![cfg(feature = "strict-metrics")]
//! Full metric-series inventory, compiled in on demand:
//! `cargo test --features strict-metrics --test metrics_strict`

use chrono::{Duration, Utc};
use halcyon_site_gateway::content::parse_content_items;
use halcyon_site_gateway::news::fallback::EmbeddedNewsProvider;
use halcyon_site_gateway::news::{load_news, NewsStory, StoryProvider};
use halcyon_site_gateway::search::suggest::DEFAULT_SUGGEST_THRESHOLD;
use halcyon_site_gateway::search::{run_search, CatalogBackend, SearchResultSet, SearchSession};
use metrics_exporter_prometheus::PrometheusBuilder;

struct FailingProvider;

#[async_trait::async_trait]
impl StoryProvider for FailingProvider {
    async fn fetch_stories(&self) -> anyhow::Result<Vec<NewsStory>> {
        anyhow::bail!("cms unreachable")
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

#[tokio::test]
async fn every_series_appears_after_one_full_drive() {
    // Local recorder; the scrape goes through the handle, not the route.
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("recorder");

    // Parser: one kept section, one titleless section.
    let items = parse_content_items("## Alpha\nbody\n## \n\n");
    assert_eq!(items.len(), 1);

    // Session: a committed request whose answer arrives after close.
    let mut session = SearchSession::new();
    session.open();
    let t0 = Utc::now();
    for c in "kestrel".chars() {
        session.push_char(c, t0);
    }
    let req = session
        .poll_commit(t0 + Duration::milliseconds(300))
        .expect("long enough to commit");
    session.close();
    assert!(!session.apply_response(req.id, SearchResultSet::default()));

    // Search and news surfaces, one success and one fallback each way.
    let reply = run_search(&CatalogBackend, "kestrel", 2, DEFAULT_SUGGEST_THRESHOLD)
        .await
        .expect("offline backend");
    assert!(reply.total >= 1);
    let served = load_news(&EmbeddedNewsProvider, "Company News", 200).await;
    assert!(!served.is_empty());
    let fallback_served = load_news(&FailingProvider, "Company News", 200).await;
    assert!(!fallback_served.is_empty());

    let out = handle.render();
    for series in [
        "content_sections_total",
        "content_sections_skipped_total",
        "search_requests_total",
        "search_stale_dropped_total",
        "search_last_total",
        "news_stories_total",
        "news_fetch_ms",
        "news_fallback_total",
    ] {
        assert!(out.contains(series), "missing series {series} in:\n{out}");
    }
}
