// src/content/mod.rs
pub mod parser;

pub use parser::{parse_content_items, ContentItem};

/// Default preview length for derived excerpts, in chars.
pub const DEFAULT_EXCERPT_MAX_CHARS: usize = 200;

/// Strip markup for plain-text display.
pub fn strip_tags(s: &str) -> String {
    // HTML entity decode first, so decoded text goes through the same
    // tag strip as literal text.
    let mut out = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    static RE_WS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    re_ws.replace_all(&out, " ").trim().to_string()
}

/// Short preview of long-form content.
///
/// Tags are stripped first; the result is cut to `max_chars` chars
/// (not bytes), with a trailing `"..."` only when the cut actually
/// removed something. At or under the limit, the stripped text comes
/// back unchanged.
pub fn excerpt(s: &str, max_chars: usize) -> String {
    let text = strip_tags(s);
    if text.chars().count() <= max_chars {
        return text;
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_tags_drops_markup_and_decodes_entities() {
        let s = "<p>Long-range&nbsp;<strong>ISR</strong> platform</p>";
        assert_eq!(strip_tags(s), "Long-range ISR platform");
    }

    #[test]
    fn strip_tags_collapses_whitespace() {
        assert_eq!(strip_tags("  a\n\n  b\tc  "), "a b c");
    }

    #[test]
    fn excerpt_over_limit_is_cut_with_ellipsis() {
        let body: String = "x".repeat(260);
        let out = excerpt(&body, 200);
        assert_eq!(out.chars().count(), 203);
        assert!(out.ends_with("..."));
        assert_eq!(&out[..200], "x".repeat(200));
    }

    #[test]
    fn excerpt_at_limit_is_unchanged() {
        let body: String = "y".repeat(200);
        assert_eq!(excerpt(&body, 200), body);
    }

    #[test]
    fn excerpt_under_limit_returns_stripped_input() {
        let out = excerpt("<em>short</em> body", 200);
        assert_eq!(out, "short body");
    }

    #[test]
    fn excerpt_trims_whitespace_at_the_cut() {
        // 199 chars then a space, then more text: the cut lands on the
        // space, which must not survive before the ellipsis.
        let body = format!("{} tail words beyond the cut", "z".repeat(199));
        let out = excerpt(&body, 200);
        assert_eq!(out, format!("{}...", "z".repeat(199)));
    }

    #[test]
    fn excerpt_of_empty_input_is_empty() {
        assert_eq!(excerpt("", 200), "");
    }
}
