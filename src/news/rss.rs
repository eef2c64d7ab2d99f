// src/news/rss.rs
//! RSS 2.0 rendition of the published story list.

use anyhow::{Context, Result};
use serde::Serialize;
use time::format_description::well_known::Rfc2822;
use time::OffsetDateTime;

use crate::content;
use crate::news::types::NewsStory;

#[derive(Debug, Serialize)]
#[serde(rename = "rss")]
struct Rss {
    #[serde(rename = "@version")]
    version: &'static str,
    channel: Channel,
}

#[derive(Debug, Serialize)]
struct Channel {
    title: String,
    link: String,
    description: String,
    #[serde(rename = "item")]
    items: Vec<Item>,
}

#[derive(Debug, Serialize)]
struct Item {
    title: String,
    link: String,
    description: String,
    #[serde(rename = "pubDate", skip_serializing_if = "Option::is_none")]
    pub_date: Option<String>,
    guid: String,
}

fn format_rfc2822(unix: i64) -> Option<String> {
    if unix <= 0 {
        return None;
    }
    OffsetDateTime::from_unix_timestamp(unix)
        .ok()?
        .format(&Rfc2822)
        .ok()
}

/// Render stories (already filtered and ordered) as RSS 2.0.
pub fn render_feed(stories: &[NewsStory], site_base: &str, site_name: &str) -> Result<String> {
    let base = site_base.trim_end_matches('/');

    let items = stories
        .iter()
        .map(|s| {
            let link = format!("{base}/news/{}", s.slug);
            let description = match s
                .excerpt
                .as_deref()
                .map(str::trim)
                .filter(|e| !e.is_empty())
            {
                Some(e) => e.to_string(),
                None => content::excerpt(&s.content, content::DEFAULT_EXCERPT_MAX_CHARS),
            };
            Item {
                title: s.title.clone(),
                guid: link.clone(),
                link,
                description,
                pub_date: format_rfc2822(s.effective_unix()),
            }
        })
        .collect();

    let feed = Rss {
        version: "2.0",
        channel: Channel {
            title: format!("{site_name} News"),
            link: format!("{base}/news"),
            description: format!("Latest news from {site_name}."),
            items,
        },
    };

    let xml = quick_xml::se::to_string(&feed).context("serializing rss feed")?;
    Ok(format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>{xml}"))
}
