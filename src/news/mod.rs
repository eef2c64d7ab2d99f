// src/news/mod.rs
pub mod fallback;
pub mod provider;
pub mod rss;
pub mod types;

pub use provider::{CmsClient, StoryProvider};
pub use types::{FrontendNewsItem, NewsStory};

use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;

use crate::content::{excerpt, parse_content_items};

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("news_stories_total", "Stories fetched from the CMS.");
        describe_counter!(
            "news_fallback_total",
            "Requests served from the embedded dataset."
        );
        describe_histogram!("news_fetch_ms", "CMS fetch time in milliseconds.");
        describe_counter!("content_sections_total", "Sections parsed into cards.");
        describe_counter!(
            "content_sections_skipped_total",
            "Titleless sections dropped by the parser."
        );
    });
}

/// Keep published records only, newest first. Ties keep CMS order.
pub fn published_newest_first(stories: Vec<NewsStory>) -> Vec<NewsStory> {
    let mut out: Vec<NewsStory> = stories
        .into_iter()
        .filter(|s| s.status.eq_ignore_ascii_case("published"))
        .collect();
    out.sort_by_key(|s| std::cmp::Reverse(s.effective_unix()));
    out
}

/// CMS story -> the flat shape the slideshow consumes.
pub fn to_frontend(
    story: &NewsStory,
    default_category: &str,
    excerpt_max_chars: usize,
) -> FrontendNewsItem {
    let subtitle = story
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(default_category)
        .to_string();

    let content = match story
        .excerpt
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
    {
        Some(e) => e.to_string(),
        None => excerpt(&story.content, excerpt_max_chars),
    };

    let items = parse_content_items(&story.content);

    FrontendNewsItem {
        title: story.title.clone(),
        subtitle,
        content,
        visual: story.cover_image.as_ref().map(|r| r.url().to_string()),
        items: if items.is_empty() { None } else { Some(items) },
    }
}

/// Published, ordered stories; embedded dataset when the provider
/// fails. The caller never sees the upstream error.
pub async fn load_stories(provider: &dyn StoryProvider) -> Vec<NewsStory> {
    ensure_metrics_described();

    let t0 = std::time::Instant::now();
    let stories = match provider.fetch_stories().await {
        Ok(v) => {
            histogram!("news_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
            counter!("news_stories_total").increment(v.len() as u64);
            v
        }
        Err(e) => {
            tracing::warn!(
                error = ?e,
                provider = provider.name(),
                "news fetch failed, serving embedded dataset"
            );
            counter!("news_fallback_total").increment(1);
            fallback::fallback_stories()
        }
    };

    published_newest_first(stories)
}

/// The JSON news surface: load, filter, transform.
pub async fn load_news(
    provider: &dyn StoryProvider,
    default_category: &str,
    excerpt_max_chars: usize,
) -> Vec<FrontendNewsItem> {
    load_stories(provider)
        .await
        .iter()
        .map(|s| to_frontend(s, default_category, excerpt_max_chars))
        .collect()
}
