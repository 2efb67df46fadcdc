//! Detection of pages that are not the real site: bot challenges, parked
//! domains, under-construction placeholders and empty JavaScript shells.

use std::sync::LazyLock;

use regex::Regex;

static SCRIPT_STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script>|<style\b[^>]*>.*?</style>").expect("valid regex")
});
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]+>").expect("valid regex"));
static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Phrases that identify a placeholder page. Matched case-insensitively.
const GARBAGE_SIGNALS: &[&str] = &[
    "checking your browser",
    "just a moment",
    "verify you are human",
    "cf-browser-verification",
    "challenge-platform",
    "_cf_chl",
    "attention required",
    "ddos protection",
    "security check",
    "checking if the site connection is secure",
    "please turn javascript on",
    "enable javascript and cookies",
    "ray id",
    "access denied",
    "bot protection",
    "are you a robot",
    "domain is parked",
    "this domain is for sale",
    "buy this domain",
    "under construction",
    "coming soon",
    "website binnenkort beschikbaar",
];

/// Visible-text length below which a page without an `<h1>` is an empty shell.
const MIN_VISIBLE_TEXT: usize = 300;

/// Returns the first placeholder signal found in `html`, if any.
///
/// `"empty-shell"` is reported for pages with almost no visible text and no
/// top-level heading.
#[must_use]
pub fn garbage_signal(html: &str) -> Option<&'static str> {
    let lower = html.to_lowercase();
    if let Some(signal) = GARBAGE_SIGNALS.iter().copied().find(|s| lower.contains(s)) {
        return Some(signal);
    }

    let without_code = SCRIPT_STYLE_RE.replace_all(&lower, " ");
    let text = TAG_RE.replace_all(&without_code, " ");
    let visible = WS_RE.replace_all(&text, " ");
    if visible.trim().chars().count() < MIN_VISIBLE_TEXT && !lower.contains("<h1") {
        return Some("empty-shell");
    }
    None
}

#[must_use]
pub fn is_garbage_page(html: &str) -> bool {
    garbage_signal(html).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn real_page() -> String {
        format!(
            "<html><head><title>Gordijnwinkel</title></head><body><h1>Linnen gordijnen op maat</h1><p>{}</p></body></html>",
            "Wij maken gordijnen op maat in Amsterdam. ".repeat(12)
        )
    }

    #[test]
    fn cloudflare_challenge_is_garbage() {
        let html = "<html><title>Just a moment...</title><body>Checking your browser before accessing.</body></html>";
        assert_eq!(garbage_signal(html), Some("checking your browser"));
    }

    #[test]
    fn parked_domain_is_garbage() {
        assert!(is_garbage_page(
            "<h1>example.nl</h1><p>This domain is for sale! Contact us.</p>"
        ));
    }

    #[test]
    fn dutch_placeholder_is_garbage() {
        assert!(is_garbage_page(
            "<h1>Welkom</h1><p>Website binnenkort beschikbaar</p>"
        ));
    }

    #[test]
    fn javascript_shell_is_garbage() {
        let html = r#"<html><body><div id="root"></div><script>window.__APP__ = {"a": "very long inline state that is not visible text at all, repeated many times to exceed three hundred characters of markup but not of text"};</script></body></html>"#;
        assert_eq!(garbage_signal(html), Some("empty-shell"));
    }

    #[test]
    fn short_page_with_heading_is_not_garbage() {
        assert!(!is_garbage_page("<h1>Dakdekker Jansen</h1><p>Bel ons.</p>"));
    }

    #[test]
    fn regular_page_is_not_garbage() {
        assert!(!is_garbage_page(&real_page()));
    }
}
