// SPDX-License-Identifier: MIT

//! Best-effort HTML sanitizer for event details.
//!
//! Event details are rich text entered by submitters and rendered by the
//! frontend. Before serving we remove script/style elements, inline event
//! handlers and styles, and `javascript:` URLs. This intentionally
//! mirrors what the details field needs rather than being a general
//! HTML sanitizer.

use once_cell::sync::Lazy;
use regex::Regex;

static SCRIPT_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("valid script regex"));

static STYLE_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").expect("valid style regex"));

// Unclosed script/style tags left over after block removal.
static DANGLING_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</?(?:script|style)\b[^>]*>").expect("valid tag regex"));

static EVENT_HANDLER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\s+on[a-z]+\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+)"#)
        .expect("valid handler regex")
});

static STYLE_ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\s+style\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+)"#).expect("valid style regex")
});

static JS_URL_ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\s+(?:href|src)\s*=\s*(?:"\s*javascript:[^"]*"|'\s*javascript:[^']*'|javascript:[^\s>]+)"#)
        .expect("valid url regex")
});

/// Strip active content from an HTML fragment.
pub fn sanitize_html(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }

    let cleaned = SCRIPT_BLOCK_RE.replace_all(html, "");
    let cleaned = STYLE_BLOCK_RE.replace_all(&cleaned, "");
    let cleaned = DANGLING_TAG_RE.replace_all(&cleaned, "");
    let cleaned = EVENT_HANDLER_RE.replace_all(&cleaned, "");
    let cleaned = STYLE_ATTR_RE.replace_all(&cleaned, "");
    let cleaned = JS_URL_ATTR_RE.replace_all(&cleaned, "");

    cleaned.into_owned()
}
