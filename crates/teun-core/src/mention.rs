//! Deterministic company-mention detection.
//!
//! Everything here is computed from the raw answer text; no model output is
//! consulted. The response parser overwrites whatever an LLM reports with
//! these values.

use std::ops::Range;

use regex::{Regex, RegexBuilder};

/// Result of checking one answer text for the target company.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MentionCheck {
    pub mentioned: bool,
    pub count: usize,
}

fn literal_regex(name: &str) -> Option<Regex> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return None;
    }
    RegexBuilder::new(&regex::escape(trimmed))
        .case_insensitive(true)
        .build()
        .ok()
}

/// Case-insensitive count of literal, non-overlapping occurrences of `name`.
#[must_use]
pub fn count_mentions(text: &str, name: &str) -> usize {
    literal_regex(name).map_or(0, |re| re.find_iter(text).count())
}

/// Byte range of the first case-insensitive occurrence of `name`.
#[must_use]
pub fn first_mention(text: &str, name: &str) -> Option<Range<usize>> {
    literal_regex(name)
        .and_then(|re| re.find(text))
        .map(|m| m.range())
}

/// First DNS label of a URL or host with any `www.` prefix removed.
///
/// `https://www.bakkerij-jansen.nl/contact` becomes `bakkerij-jansen`.
#[must_use]
pub fn domain_stem(url_or_host: &str) -> Option<String> {
    let host = host_of(url_or_host)?;
    let host = host.strip_prefix("www.").unwrap_or(&host);
    host.split('.')
        .next()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Lowercased host of a URL or bare host string, without port.
#[must_use]
pub fn host_of(url_or_host: &str) -> Option<String> {
    let s = url_or_host.trim();
    let without_scheme = s.split_once("://").map_or(s, |(_, rest)| rest);
    let host = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let host = host.rsplit_once('@').map_or(host, |(_, h)| h);
    let host = host.split(':').next().unwrap_or_default();
    if host.is_empty() {
        None
    } else {
        Some(host.to_lowercase())
    }
}

/// Lowercased spellings under which a company may appear in running text.
///
/// Covers the literal name, the name without spaces, the name with `.`/`-`
/// read as spaces, and the website's domain stem. Variants of two characters
/// or fewer are dropped.
#[must_use]
pub fn name_variants(company: &str, domain: Option<&str>) -> Vec<String> {
    let lower = company.trim().to_lowercase();
    let mut candidates = vec![
        lower.clone(),
        lower.replace(' ', ""),
        lower.replace(['.', '-'], " "),
    ];
    if let Some(stem) = domain.and_then(domain_stem) {
        candidates.push(stem.replace('-', " "));
        candidates.push(stem);
    }

    let mut out: Vec<String> = Vec::new();
    for c in candidates {
        let c = c.trim().to_string();
        if c.chars().count() > 2 && !out.contains(&c) {
            out.push(c);
        }
    }
    out
}

/// Authoritative mention signal for `company` in `text`.
///
/// `count` is the literal occurrence count of the name itself; `mentioned`
/// additionally accepts any of [`name_variants`].
#[must_use]
pub fn detect_mention(text: &str, company: &str, domain: Option<&str>) -> MentionCheck {
    let count = count_mentions(text, company);
    if count > 0 {
        return MentionCheck {
            mentioned: true,
            count,
        };
    }
    let haystack = text.to_lowercase();
    let mentioned = name_variants(company, domain)
        .iter()
        .any(|v| haystack.contains(v.as_str()));
    MentionCheck { mentioned, count }
}
