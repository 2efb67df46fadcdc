//! Regex extraction of the business-relevant parts of a homepage.
//!
//! Deliberately not a DOM parser: homepages in the wild are malformed often
//! enough that forgiving regexes recover more text than strict parsing.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use teun_core::text::{collapse_whitespace, truncate_chars};
use teun_core::PageContext;

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>([^<]+)</title>").expect("valid regex"));
static META_DESC_NAME_FIRST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<meta[^>]*name=["']description["'][^>]*content=["']([^"']*)["']"#)
        .expect("valid regex")
});
static META_DESC_CONTENT_FIRST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<meta[^>]*content=["']([^"']*)["'][^>]*name=["']description["']"#)
        .expect("valid regex")
});
static H1_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h1\b[^>]*>(.*?)</h1>").expect("valid regex"));
static H2_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h2\b[^>]*>(.*?)</h2>").expect("valid regex"));
static H3_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h3\b[^>]*>(.*?)</h3>").expect("valid regex"));
static NAV_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<nav\b[^>]*>(.*?)</nav>").expect("valid regex"));
static ANCHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<a\b[^>]*>(.*?)</a>").expect("valid regex"));
static INTERNAL_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*href=["'](/[^"']*)["'][^>]*>(.*?)</a>"#).expect("valid regex")
});
static SERVICE_HINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)dienst|service|product|oploss|behandel|specialist|aanbod|werkgebied|wat-we|over-ons")
        .expect("valid regex")
});
static BOILERPLATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)<script\b[^>]*>.*?</script>|<style\b[^>]*>.*?</style>|<nav\b[^>]*>.*?</nav>|<footer\b[^>]*>.*?</footer>|<header\b[^>]*>.*?</header>",
    )
    .expect("valid regex")
});
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]+>").expect("valid regex"));

const MAX_H1: usize = 3;
const MAX_H2: usize = 8;
const MAX_H3: usize = 8;
const MAX_NAV_ITEMS: usize = 15;
const MAX_SERVICE_LINKS: usize = 10;
const MAX_BODY_CHARS: usize = 3000;

/// Extracts title, description, headings, navigation, service links and
/// visible body text from raw HTML.
#[must_use]
pub fn parse_page(html: &str) -> PageContext {
    let title = TITLE_RE
        .captures(html)
        .map(|c| clean_text(&c[1]))
        .filter(|t| !t.is_empty());

    let meta_desc = META_DESC_NAME_FIRST_RE
        .captures(html)
        .or_else(|| META_DESC_CONTENT_FIRST_RE.captures(html))
        .map(|c| clean_text(&c[1]))
        .filter(|d| !d.is_empty());

    PageContext {
        title,
        meta_desc,
        h1s: headings(&H1_RE, html, MAX_H1),
        h2s: headings(&H2_RE, html, MAX_H2),
        h3s: headings(&H3_RE, html, MAX_H3),
        nav_items: nav_items(html),
        service_links: service_links(html),
        body: body_text(html),
    }
}

fn headings(re: &Regex, html: &str, cap: usize) -> Vec<String> {
    re.captures_iter(html)
        .map(|c| clean_text(&c[1]))
        .filter(|h| !h.is_empty())
        .take(cap)
        .collect()
}

fn nav_items(html: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut items = Vec::new();
    for nav in NAV_RE.captures_iter(html) {
        for anchor in ANCHOR_RE.captures_iter(&nav[1]) {
            let text = clean_text(&anchor[1]);
            let len = text.chars().count();
            if (2..60).contains(&len) && seen.insert(text.clone()) {
                items.push(text);
                if items.len() >= MAX_NAV_ITEMS {
                    return items;
                }
            }
        }
    }
    items
}

fn service_links(html: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for cap in INTERNAL_LINK_RE.captures_iter(html) {
        let href = &cap[1];
        let text = clean_text(&cap[2]);
        let len = text.chars().count();
        if !(3..80).contains(&len) {
            continue;
        }
        if !SERVICE_HINT_RE.is_match(&format!("{href} {text}")) {
            continue;
        }
        let entry = format!("{text} ({href})");
        if seen.insert(entry.clone()) {
            links.push(entry);
            if links.len() >= MAX_SERVICE_LINKS {
                break;
            }
        }
    }
    links
}

fn body_text(html: &str) -> String {
    let stripped = BOILERPLATE_RE.replace_all(html, " ");
    let text = clean_text(&stripped);
    truncate_chars(&text, MAX_BODY_CHARS).to_string()
}

/// Removes tags, decodes the handful of entities that show up in headings,
/// and collapses whitespace.
fn clean_text(fragment: &str) -> String {
    let no_tags = TAG_RE.replace_all(fragment, " ");
    let decoded = no_tags
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#039;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">");
    collapse_whitespace(&decoded)
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
