// src/content/parser.rs
//! Turns CMS long-form text into structured cards.
//!
//! Content editors write plain text with lightweight conventions: `## `
//! section headings, `- `/`• ` bullets, an `Impact:` line. Everything
//! here degrades to defaults instead of failing, because a typo in a
//! CMS field must never break page rendering.

use metrics::counter;
use serde::{Deserialize, Serialize};

/// A line starting with this prefix opens a new section.
pub const HEADING_PREFIX: &str = "## ";

/// Accepted impact-line spellings. Bold form first, so the plain form
/// does not strip it halfway.
const IMPACT_MARKERS: [&str; 2] = ["**Impact:**", "Impact:"];

/// Accepted bullet markers. The trailing space is part of the marker;
/// a bare dash is body text.
const BULLET_MARKERS: [&str; 2] = ["- ", "\u{2022} "];

/// Shown when a section lists no bullets of its own.
pub const DEFAULT_DETAIL: &str = "Advanced capability integration";

/// Shown when a section carries no impact line.
pub const DEFAULT_IMPACT: &str =
    "Enhanced operational effectiveness for Halcyon Dynamics partners";

/// One structured card extracted from a `## ` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub title: String,
    pub description: String,
    pub details: Vec<String>,
    pub impact: String,
}

/// Parse long-form text into ordered cards, one per `## ` section.
///
/// Text before the first heading is preamble and produces nothing, as
/// does a section without a single non-empty line. Never fails:
/// malformed markers fall back to the section defaults.
pub fn parse_content_items(text: &str) -> Vec<ContentItem> {
    let mut sections: Vec<Vec<&str>> = Vec::new();
    for line in text.lines() {
        // Heading check keeps the raw tail: a marker-only "## " line
        // still opens a (titleless) section.
        if let Some(rest) = line.trim_start().strip_prefix(HEADING_PREFIX) {
            sections.push(vec![rest.trim()]);
        } else if let Some(current) = sections.last_mut() {
            current.push(line.trim());
        }
        // Preamble lines before the first heading are dropped.
    }

    let mut items = Vec::with_capacity(sections.len());
    let mut skipped = 0usize;
    for lines in &sections {
        match parse_section(lines) {
            Some(item) => items.push(item),
            None => skipped += 1,
        }
    }

    counter!("content_sections_total").increment(items.len() as u64);
    counter!("content_sections_skipped_total").increment(skipped as u64);
    items
}

/// One section: the first non-empty line is the title, the rest are
/// classified line by line. `None` when the section has no title.
fn parse_section(lines: &[&str]) -> Option<ContentItem> {
    let mut rest = lines.iter().copied().skip_while(|l| l.is_empty());
    let title = rest.next()?.to_string();

    let mut description_parts: Vec<&str> = Vec::new();
    let mut details: Vec<String> = Vec::new();
    let mut impact = String::new();
    // Plain lines accumulate only until the first bullet or impact line.
    let mut structure_seen = false;

    for line in rest {
        if line.is_empty() {
            continue;
        }
        if let Some(tail) = strip_any_prefix(line, &IMPACT_MARKERS) {
            impact = tail.trim().to_string();
            structure_seen = true;
        } else if let Some(tail) = strip_any_prefix(line, &BULLET_MARKERS) {
            details.push(tail.trim().to_string());
            structure_seen = true;
        } else if !structure_seen {
            description_parts.push(line);
        }
    }

    let description = if description_parts.is_empty() {
        title.clone()
    } else {
        description_parts.join(" ")
    };
    if details.is_empty() {
        details.push(DEFAULT_DETAIL.to_string());
    }
    if impact.is_empty() {
        impact = DEFAULT_IMPACT.to_string();
    }

    Some(ContentItem {
        title,
        description,
        details,
        impact,
    })
}

fn strip_any_prefix<'a>(line: &'a str, markers: &[&str]) -> Option<&'a str> {
    markers.iter().find_map(|m| line.strip_prefix(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_headings_yields_nothing() {
        assert!(parse_content_items("").is_empty());
        assert!(parse_content_items("just a paragraph\nwith two lines").is_empty());
    }

    #[test]
    fn bullet_and_impact_lines_are_classified() {
        let text = "## Title A\n- detail one\n**Impact:** good things";
        let items = parse_content_items(text);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Title A");
        assert_eq!(items[0].details, vec!["detail one"]);
        assert_eq!(items[0].impact, "good things");
    }

    #[test]
    fn bare_title_falls_back_to_defaults() {
        let items = parse_content_items("## Autonomy Stack");
        assert_eq!(items.len(), 1);
        let it = &items[0];
        assert_eq!(it.description, it.title, "description falls back to title");
        assert_eq!(it.details, vec![DEFAULT_DETAIL.to_string()]);
        assert_eq!(it.impact, DEFAULT_IMPACT);
    }

    #[test]
    fn description_joins_plain_lines_before_structure() {
        let text = "## Kestrel\nFirst sentence.\nSecond sentence.\n- range 40 km\nignored tail";
        let items = parse_content_items(text);
        assert_eq!(items[0].description, "First sentence. Second sentence.");
        assert_eq!(items[0].details, vec!["range 40 km"]);
    }

    #[test]
    fn both_bullet_markers_accepted() {
        let text = "## X\n- dash form\n\u{2022} dot form";
        let items = parse_content_items(text);
        assert_eq!(items[0].details, vec!["dash form", "dot form"]);
    }

    #[test]
    fn plain_impact_spelling_accepted_and_later_line_wins() {
        let text = "## X\nImpact: first\n**Impact:** second";
        let items = parse_content_items(text);
        assert_eq!(items[0].impact, "second");
    }

    #[test]
    fn empty_heading_takes_next_nonempty_line_as_title() {
        let text = "## \n\nPalisade Tower\n- modular mast";
        let items = parse_content_items(text);
        assert_eq!(items[0].title, "Palisade Tower");
        assert_eq!(items[0].details, vec!["modular mast"]);
    }

    #[test]
    fn section_with_no_lines_at_all_is_skipped() {
        let text = "## Alpha\nbody\n## \n\n## Beta";
        let items = parse_content_items(text);
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha", "Beta"], "empty middle section dropped");
    }

    #[test]
    fn sections_keep_source_order() {
        let text = "## One\n## Two\n## Three";
        let titles: Vec<String> = parse_content_items(text)
            .into_iter()
            .map(|i| i.title)
            .collect();
        assert_eq!(titles, vec!["One", "Two", "Three"]);
    }

    #[test]
    fn bare_dash_is_body_text_not_bullet() {
        let text = "## X\n-\n-not a bullet";
        let items = parse_content_items(text);
        assert_eq!(
            items[0].description, "- -not a bullet",
            "dash without trailing space stays in the description"
        );
        assert_eq!(items[0].details, vec![DEFAULT_DETAIL.to_string()]);
    }

    #[test]
    fn marker_only_impact_line_falls_back_to_default() {
        let text = "## X\n**Impact:**";
        let items = parse_content_items(text);
        assert_eq!(items[0].impact, DEFAULT_IMPACT);
    }
}
