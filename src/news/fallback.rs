// src/news/fallback.rs
use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;

use crate::news::provider::StoryProvider;
use crate::news::types::NewsStory;

static FALLBACK: Lazy<Vec<NewsStory>> = Lazy::new(|| {
    let raw = include_str!("../../fallback_news.json");
    serde_json::from_str::<Vec<NewsStory>>(raw).expect("valid embedded news dataset")
});

/// Hand-authored stories served when the CMS is unreachable. Same
/// shape as the live records, so everything downstream is oblivious.
pub fn fallback_stories() -> Vec<NewsStory> {
    FALLBACK.clone()
}

/// Provider over the embedded dataset, for deployments with no CMS
/// configured at all.
pub struct EmbeddedNewsProvider;

#[async_trait]
impl StoryProvider for EmbeddedNewsProvider {
    async fn fetch_stories(&self) -> Result<Vec<NewsStory>> {
        Ok(fallback_stories())
    }

    fn name(&self) -> &'static str {
        "embedded"
    }
}
