// src/news/types.rs
//! Wire shapes for the CMS news endpoint and the flat frontend form.

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::content::ContentItem;

/// Timestamps arrive from the CMS either as RFC3339 strings or as raw
/// epoch seconds, depending on the collection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Epoch(i64),
    Text(String),
}

impl Timestamp {
    /// Unix seconds; unparsable text counts as 0 so it sorts last.
    pub fn unix(&self) -> i64 {
        match self {
            Timestamp::Epoch(s) => *s,
            Timestamp::Text(t) => parse_rfc3339_to_unix(t),
        }
    }
}

fn parse_rfc3339_to_unix(ts: &str) -> i64 {
    OffsetDateTime::parse(ts, &Rfc3339)
        .map(|dt| dt.unix_timestamp())
        .unwrap_or(0)
}

/// Featured-image reference: a bare URL string, or a media object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageRef {
    Url(String),
    Object { url: String },
}

impl ImageRef {
    pub fn url(&self) -> &str {
        match self {
            ImageRef::Url(u) => u,
            ImageRef::Object { url } => url,
        }
    }
}

/// A story record as the CMS returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsStory {
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<ImageRef>,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl NewsStory {
    /// Ordering key: publishedAt, falling back to createdAt, then 0.
    pub fn effective_unix(&self) -> i64 {
        self.published_at
            .as_ref()
            .or(self.created_at.as_ref())
            .map(Timestamp::unix)
            .unwrap_or(0)
    }
}

/// The flat shape the slideshow consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontendNewsItem {
    pub title: String,
    pub subtitle: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual: Option<String>,
    /// Structured cards parsed out of the body; omitted when the body
    /// has no sections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<ContentItem>>,
}
