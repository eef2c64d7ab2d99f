//! Binary entrypoint for the Halcyon site gateway.
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.
//!
//! See `README.md` for quickstart.

use std::net::SocketAddr;
use std::path::PathBuf;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use halcyon_site_gateway::api::{self, AppState};
use halcyon_site_gateway::config::{
    start_hot_reload_thread, ConfigHandle, SiteConfig, DEFAULT_SITE_CONFIG_PATH,
    ENV_SITE_CONFIG_PATH,
};
use halcyon_site_gateway::metrics::Metrics;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("halcyon_site_gateway=info,search=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = SiteConfig::load();
    let debounce_ms = cfg.search.debounce_ms;
    let handle = ConfigHandle::new(cfg);

    // If hot reload is enabled, spawn the background watcher.
    let path = std::env::var(ENV_SITE_CONFIG_PATH)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_SITE_CONFIG_PATH));
    start_hot_reload_thread(handle.clone(), path);

    let metrics = Metrics::init(debounce_ms);

    let state = AppState::from_config(handle);
    let router = api::create_router(state).merge(metrics.router());

    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8000)));

    tracing::info!(%addr, "gateway listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
