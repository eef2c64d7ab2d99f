// src/config.rs
//! Site configuration: TOML file, env overrides, hot reload in dev.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::thread;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

// --- env defaults & names ---
pub const DEFAULT_SITE_CONFIG_PATH: &str = "config/site.toml";
pub const DEFAULT_SITE_NAME: &str = "Halcyon Dynamics";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_MIN_QUERY_LEN: usize = 2;
pub const DEFAULT_SUGGEST_THRESHOLD: f64 = 0.72;
pub const DEFAULT_NEWS_CATEGORY: &str = "Company News";
pub const DEFAULT_EXCERPT_MAX_CHARS: usize = 200;

pub const ENV_SITE_CONFIG_PATH: &str = "SITE_CONFIG_PATH";
pub const ENV_SITE_BASE_URL: &str = "SITE_BASE_URL";
pub const ENV_SITE_DEBOUNCE_MS: &str = "SITE_DEBOUNCE_MS";
pub const ENV_SITE_MIN_QUERY_LEN: &str = "SITE_MIN_QUERY_LEN";
pub const ENV_SITE_SUGGEST_THRESHOLD: &str = "SITE_SUGGEST_THRESHOLD";
pub const ENV_SITE_NEWS_ENDPOINT: &str = "SITE_NEWS_ENDPOINT";
pub const ENV_SITE_SEARCH_UPSTREAM: &str = "SITE_SEARCH_UPSTREAM";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    pub name: String,
    pub base_url: String,
    /// Directory of built site assets to serve; empty disables it.
    pub assets_dir: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            name: DEFAULT_SITE_NAME.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            assets_dir: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSection {
    pub debounce_ms: u64,
    pub min_query_len: usize,
    pub suggest_threshold: f64,
    /// Upstream search service; empty means the embedded catalog.
    pub upstream_url: String,
    pub timeout_secs: u64,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            min_query_len: DEFAULT_MIN_QUERY_LEN,
            suggest_threshold: DEFAULT_SUGGEST_THRESHOLD,
            upstream_url: String::new(),
            timeout_secs: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsSection {
    /// CMS collection endpoint; empty means embedded dataset only.
    pub endpoint: String,
    pub default_category: String,
    pub excerpt_max_chars: usize,
    pub timeout_secs: u64,
    pub max_retries: u8,
}

impl Default for NewsSection {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            default_category: DEFAULT_NEWS_CATEGORY.to_string(),
            excerpt_max_chars: DEFAULT_EXCERPT_MAX_CHARS,
            timeout_secs: 5,
            max_retries: 2,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub site: SiteSection,
    pub search: SearchSection,
    pub news: NewsSection,
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl SiteConfig {
    /// Parse a TOML string. Missing sections and fields fall back to
    /// defaults; out-of-range values are clamped, not rejected.
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let mut cfg: SiteConfig = toml::from_str(toml_str)?;
        cfg.normalize();
        Ok(cfg)
    }

    /// Load from SITE_CONFIG_PATH (or the default path), then apply
    /// env overrides.
    pub fn from_toml() -> anyhow::Result<Self> {
        let path = std::env::var(ENV_SITE_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SITE_CONFIG_PATH));

        let content = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("failed to read site config at {}: {}", path.display(), e)
        })?;

        let mut cfg = Self::from_toml_str(&content)?;
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    /// Config for startup: file if present, defaults otherwise. The
    /// gateway must come up even with no config on disk.
    pub fn load() -> Self {
        match Self::from_toml() {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(error = %e, "site config not loaded, using defaults");
                let mut cfg = Self::default();
                cfg.apply_env_overrides();
                cfg
            }
        }
    }

    pub fn apply_env_overrides(&mut self) {
        if let Some(v) = env_string(ENV_SITE_BASE_URL) {
            self.site.base_url = v;
        }
        if let Some(v) = env_parse::<u64>(ENV_SITE_DEBOUNCE_MS) {
            self.search.debounce_ms = v;
        }
        if let Some(v) = env_parse::<usize>(ENV_SITE_MIN_QUERY_LEN) {
            self.search.min_query_len = v;
        }
        if let Some(v) = env_parse::<f64>(ENV_SITE_SUGGEST_THRESHOLD) {
            self.search.suggest_threshold = v;
        }
        if let Some(v) = env_string(ENV_SITE_NEWS_ENDPOINT) {
            self.news.endpoint = v;
        }
        if let Some(v) = env_string(ENV_SITE_SEARCH_UPSTREAM) {
            self.search.upstream_url = v;
        }
        self.normalize();
    }

    fn normalize(&mut self) {
        self.search.suggest_threshold = if self.search.suggest_threshold.is_finite() {
            self.search.suggest_threshold.clamp(0.0, 1.0)
        } else {
            DEFAULT_SUGGEST_THRESHOLD
        };
        self.search.min_query_len = self.search.min_query_len.max(1);
        self.news.excerpt_max_chars = self.news.excerpt_max_chars.max(1);
        self.news.max_retries = self.news.max_retries.max(1);
    }
}

/* ----------------------------
Thread-safe handle + hot reload
---------------------------- */

/// Shared read handle; the hot-reload thread swaps the inner value.
#[derive(Clone)]
pub struct ConfigHandle {
    inner: Arc<RwLock<SiteConfig>>,
}

impl ConfigHandle {
    pub fn new(cfg: SiteConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(cfg)),
        }
    }

    /// Cheap copy of the current config for one request.
    pub fn snapshot(&self) -> SiteConfig {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(_) => SiteConfig::default(),
        }
    }
}

/// Hot reload wanted and allowed (dev/local only).
fn hot_reload_enabled() -> bool {
    let want = std::env::var("SITE_HOT_RELOAD")
        .ok()
        .map(|v| v == "1")
        .unwrap_or(false);
    if !want {
        return false;
    }
    if cfg!(debug_assertions) {
        return true;
    }
    matches!(
        std::env::var("APP_ENV")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "local" | "development" | "dev"
    )
}

/// Poll `path` mtime every 2s and swap the config on change.
/// Uses only std, no external deps.
pub fn start_hot_reload_thread(handle: ConfigHandle, path: PathBuf) {
    if !hot_reload_enabled() {
        return;
    }

    thread::spawn(move || {
        let poll = Duration::from_secs(2);
        let mut last_mtime: Option<SystemTime> = None;

        loop {
            match fs::metadata(&path).and_then(|m| m.modified()) {
                Ok(mtime) => {
                    let changed = match last_mtime {
                        None => {
                            last_mtime = Some(mtime);
                            false
                        }
                        Some(prev) => mtime > prev,
                    };
                    if changed {
                        if let Ok(content) = fs::read_to_string(&path) {
                            match SiteConfig::from_toml_str(&content) {
                                Ok(mut cfg) => {
                                    cfg.apply_env_overrides();
                                    if let Ok(mut guard) = handle.inner.write() {
                                        *guard = cfg;
                                    }
                                    tracing::info!(path = %path.display(), "site config reloaded");
                                }
                                Err(e) => {
                                    tracing::warn!(error = %e, "site config reload skipped");
                                }
                            }
                        }
                        last_mtime = Some(mtime);
                    }
                }
                Err(_) => {
                    // File missing or unreadable; keep trying.
                }
            }
            thread::sleep(poll);
        }
    });
}
