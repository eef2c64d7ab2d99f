// src/news/provider.rs
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::news::types::NewsStory;

/// Upstream source of story records.
#[async_trait]
pub trait StoryProvider: Send + Sync {
    async fn fetch_stories(&self) -> Result<Vec<NewsStory>>;
    fn name(&self) -> &'static str;
}

/// Tolerant envelope: some CMS configurations return the collection
/// bare, others wrap it in a `data` field.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoriesAny {
    Flat(Vec<NewsStory>),
    Wrapped { data: Vec<NewsStory> },
}

impl StoriesAny {
    fn into_stories(self) -> Vec<NewsStory> {
        match self {
            StoriesAny::Flat(v) => v,
            StoriesAny::Wrapped { data } => data,
        }
    }
}

/// HTTP client for the CMS news collection.
#[derive(Clone)]
pub struct CmsClient {
    endpoint: String,
    client: reqwest::Client,
    timeout: Duration,
    max_retries: u8,
}

impl CmsClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
            timeout: Duration::from_secs(5),
            max_retries: 2,
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    pub fn with_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries.max(1);
        self
    }
}

#[async_trait]
impl StoryProvider for CmsClient {
    async fn fetch_stories(&self) -> Result<Vec<NewsStory>> {
        let mut attempt: u8 = 0;
        loop {
            attempt += 1;
            let res = self
                .client
                .get(&self.endpoint)
                .timeout(self.timeout)
                .send()
                .await;

            match res {
                Ok(rsp) => {
                    if let Err(e) = rsp.error_for_status_ref() {
                        if attempt < self.max_retries {
                            tokio::time::sleep(Duration::from_millis(250u64 << (attempt - 1)))
                                .await;
                            continue;
                        }
                        return Err(e).context("cms stories http status");
                    }
                    let any = rsp
                        .json::<StoriesAny>()
                        .await
                        .context("cms stories json")?;
                    return Ok(any.into_stories());
                }
                Err(e) => {
                    if attempt < self.max_retries {
                        tokio::time::sleep(Duration::from_millis(250u64 << (attempt - 1))).await;
                        continue;
                    }
                    return Err(e).context("cms stories request");
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "cms"
    }
}
