// src/api.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::config::ConfigHandle;
use crate::news::fallback::EmbeddedNewsProvider;
use crate::news::{self, rss, CmsClient, FrontendNewsItem, StoryProvider};
use crate::search::{self, CatalogBackend, HttpSearchBackend, SearchBackend};

#[derive(Clone)]
pub struct AppState {
    pub config: ConfigHandle,
    pub search: Arc<dyn SearchBackend>,
    pub news: Arc<dyn StoryProvider>,
}

impl AppState {
    /// Wire backends from config: HTTP clients where endpoints are
    /// set, embedded data otherwise.
    pub fn from_config(config: ConfigHandle) -> Self {
        let cfg = config.snapshot();

        let search: Arc<dyn SearchBackend> = if cfg.search.upstream_url.is_empty() {
            Arc::new(CatalogBackend)
        } else {
            Arc::new(
                HttpSearchBackend::new(&cfg.search.upstream_url)
                    .with_timeout(cfg.search.timeout_secs),
            )
        };

        let news: Arc<dyn StoryProvider> = if cfg.news.endpoint.is_empty() {
            Arc::new(EmbeddedNewsProvider)
        } else {
            Arc::new(
                CmsClient::new(&cfg.news.endpoint)
                    .with_timeout(cfg.news.timeout_secs)
                    .with_retries(cfg.news.max_retries),
            )
        };

        Self {
            config,
            search,
            news,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let assets_dir = state.config.snapshot().site.assets_dir;

    let mut router = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/search", get(search_handler))
        .route("/api/news", get(news_handler))
        .route("/api/news/feed.xml", get(news_feed_handler))
        .route("/api/news/{slug}", get(news_story_handler))
        .layer(CorsLayer::very_permissive())
        .with_state(state);

    if !assets_dir.is_empty() {
        router = router.fallback_service(ServeDir::new(assets_dir));
    }
    router
}

#[derive(serde::Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

#[derive(serde::Serialize)]
struct SearchError {
    message: &'static str,
}

async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let cfg = state.config.snapshot();
    match search::run_search(
        state.search.as_ref(),
        &params.q,
        cfg.search.min_query_len,
        cfg.search.suggest_threshold,
    )
    .await
    {
        Ok(reply) => Json(reply).into_response(),
        Err(e) => {
            tracing::warn!(error = ?e, "search upstream failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(SearchError {
                    message: search::ERROR_MESSAGE,
                }),
            )
                .into_response()
        }
    }
}

async fn news_handler(State(state): State<AppState>) -> Json<Vec<FrontendNewsItem>> {
    let cfg = state.config.snapshot();
    Json(
        news::load_news(
            state.news.as_ref(),
            &cfg.news.default_category,
            cfg.news.excerpt_max_chars,
        )
        .await,
    )
}

async fn news_story_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Response {
    let cfg = state.config.snapshot();
    let stories = news::load_stories(state.news.as_ref()).await;
    match stories.iter().find(|s| s.slug == slug) {
        Some(story) => Json(news::to_frontend(
            story,
            &cfg.news.default_category,
            cfg.news.excerpt_max_chars,
        ))
        .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn news_feed_handler(State(state): State<AppState>) -> Response {
    let cfg = state.config.snapshot();
    let stories = news::load_stories(state.news.as_ref()).await;
    match rss::render_feed(&stories, &cfg.site.base_url, &cfg.site.name) {
        Ok(xml) => (
            [(header::CONTENT_TYPE, "application/rss+xml; charset=utf-8")],
            xml,
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(error = ?e, "rss rendition failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
