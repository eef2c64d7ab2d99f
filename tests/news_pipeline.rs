// tests/news_pipeline.rs
//
// CMS-facing pipeline tests against a local HTTP double. Covers the
// publish filter, ordering across mixed timestamp shapes, the tolerant
// response envelope, retries, and the embedded fallback.

use httpmock::prelude::*;
use serde_json::json;

use halcyon_site_gateway::news::fallback::fallback_stories;
use halcyon_site_gateway::news::{load_news, load_stories, CmsClient};

#[tokio::test]
async fn cms_stories_are_filtered_to_published_and_ordered() {
    let server = MockServer::start();
    let cms = server.mock(|when, then| {
        when.method(GET).path("/api/stories");
        // Wrapped envelope, deliberately shuffled, timestamps in all
        // three shapes the CMS produces.
        then.status(200).json_body(json!({
            "data": [
                { "title": "Old", "slug": "old", "status": "published",
                  "publishedAt": "2026-03-21T08:00:00Z", "content": "" },
                { "title": "Draft", "slug": "draft", "status": "draft",
                  "publishedAt": "2026-08-01T08:00:00Z", "content": "" },
                { "title": "Newest", "slug": "newest", "status": "published",
                  "publishedAt": 1781433000, "content": "" },
                { "title": "CreatedOnly", "slug": "created-only", "status": "published",
                  "createdAt": "2026-05-02T14:30:00Z", "content": "" }
            ]
        }));
    });

    let client = CmsClient::new(server.url("/api/stories"));
    let stories = load_stories(&client).await;
    cms.assert();

    let titles: Vec<&str> = stories.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Newest", "CreatedOnly", "Old"],
        "drafts gone, newest first, createdAt filling in"
    );
}

#[tokio::test]
async fn cms_fields_reach_the_frontend_shape() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/stories");
        // Flat envelope this time.
        then.status(200).json_body(json!([{
            "title": "Palisade Expansion",
            "slug": "palisade-expansion",
            "status": "published",
            "category": "  Programs  ",
            "coverImage": { "url": "/media/palisade.webp" },
            "publishedAt": "2026-07-01T00:00:00Z",
            "content": "<p>Palisade grows.</p>\n\n## Coverage\n- 10 new towers\n**Impact:** Wider coverage."
        }]));
    });

    let client = CmsClient::new(server.url("/stories"));
    let items = load_news(&client, "Company News", 200).await;

    assert_eq!(items.len(), 1);
    let item = &items[0];
    assert_eq!(item.subtitle, "Programs", "category is trimmed, not defaulted");
    assert_eq!(item.visual.as_deref(), Some("/media/palisade.webp"));
    assert!(
        item.content.starts_with("Palisade grows."),
        "derived teaser strips markup: {}",
        item.content
    );

    let cards = item.items.as_ref().expect("parsed sections");
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].title, "Coverage");
    assert_eq!(cards[0].details, vec!["10 new towers"]);
    assert_eq!(cards[0].impact, "Wider coverage.");
}

#[tokio::test]
async fn cms_failure_serves_the_embedded_dataset() {
    let server = MockServer::start();
    let cms = server.mock(|when, then| {
        when.method(GET).path("/api/stories");
        then.status(500);
    });

    let client = CmsClient::new(server.url("/api/stories")).with_retries(2);
    let stories = load_stories(&client).await;

    assert_eq!(cms.hits(), 2, "one retry before giving up");
    assert_eq!(stories.len(), fallback_stories().len());
    assert_eq!(
        stories[0].title, "Halcyon Dynamics Unveils Kestrel Block II",
        "embedded dataset comes out ordered too"
    );
}

#[tokio::test]
async fn cms_garbage_body_also_falls_back() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/stories");
        then.status(200).body("<html>maintenance window</html>");
    });

    let client = CmsClient::new(server.url("/api/stories"));
    let stories = load_stories(&client).await;
    assert_eq!(stories.len(), fallback_stories().len());
}
