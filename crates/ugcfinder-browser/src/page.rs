//! Extraction from rendered profile-page HTML.

use std::sync::LazyLock;

use regex::Regex;

static ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*?\bhref\s*=\s*["']([^"']+)["'][^>]*>(.*?)</a>"#)
        .expect("valid regex")
});
static VIDEO_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^/\s]+/@[^/\s]+/video/\d+").expect("valid regex"));
static SCRIPT_STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style|noscript)\b[^>]*>.*?</(script|style|noscript)>")
        .expect("valid regex")
});
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Pinned and promoted cards carry this badge inside their anchor.
const PINNED_BADGE_MARKER: &str = "video-card-badge";

/// Returns up to `max` absolute video URLs from a profile page, in page order.
///
/// Anchors whose contents carry a pinned/promoted badge are skipped, relative
/// links are ignored, and duplicates keep their first position.
#[must_use]
pub fn extract_video_links(html: &str, max: usize) -> Vec<String> {
    let html = SCRIPT_STYLE_RE.replace_all(html, " ");
    let mut links: Vec<String> = Vec::new();
    for caps in ANCHOR_RE.captures_iter(&html) {
        if links.len() >= max {
            break;
        }
        let inner = &caps[2];
        if inner.contains(PINNED_BADGE_MARKER) {
            continue;
        }
        let href = decode_entities(&caps[1]);
        if !VIDEO_PATH_RE.is_match(&href) {
            continue;
        }
        if !links.contains(&href) {
            links.push(href);
        }
    }
    links
}

/// Visible text of a page: scripts and styles dropped, tags stripped,
/// whitespace collapsed.
#[must_use]
pub fn extract_text(html: &str) -> String {
    let without_scripts = SCRIPT_STYLE_RE.replace_all(html, " ");
    let without_tags = TAG_RE.replace_all(&without_scripts, " ");
    let decoded = decode_entities(&without_tags);
    WHITESPACE_RE.replace_all(decoded.trim(), " ").into_owned()
}

fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#64;", "@")
        .replace("&amp;", "&")
}
