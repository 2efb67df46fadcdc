//! Regex-only competitor extraction and snippet building.

use std::sync::LazyLock;

use regex::Regex;
use teun_core::mention::first_mention;
use teun_core::text::{floor_char_boundary, truncate_chars};
use teun_core::CompetitorFilter;

pub const MAX_COMPETITORS: usize = 10;
pub const MAX_SNIPPET_CHARS: usize = 600;

const CONTEXT_BEFORE: usize = 100;
const CONTEXT_AFTER: usize = 200;
const FALLBACK_LINES: usize = 3;
const FALLBACK_MIN_LINE_CHARS: usize = 30;
const FALLBACK_MAX_CHARS: usize = 400;

const ADVISORY_PREFIXES: [&str; 6] = [
    "tip",
    "let op",
    "belangrijk",
    "conclusie",
    "samenvatting",
    "opmerking",
];

/// Words that start a sentence rather than a business name.
const LEADING_STOPWORDS: [&str; 24] = [
    "De", "Het", "Een", "In", "Voor", "Deze", "Dit", "Er", "Bij", "Als", "Ook", "Wat", "Welke",
    "Waar", "Hoe", "Op", "Met", "Van", "Zo", "Daarnaast", "Tot", "Niet", "Veel", "Andere",
];

static BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*]{3,60})\*\*").expect("valid regex"));

static NUMBERED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*\d+[.)\-]\s*\**([^*\n(\[]{2,60})").expect("valid regex")
});

static TRAILING_DESCRIPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\s+[-–—]|\s*[:–—]).*$").expect("valid regex"));

static LEADING_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[.)]\s*").expect("valid regex"));

static STRUCTURAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(stap|punt|vraag|antwoord|optie|methode|strategie|voordeel|nadeel)\s")
        .expect("valid regex")
});

static CAPITALIZED_RUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\p{Lu}[\p{L}\p{N}&']*(?:[ \t]+\p{Lu}[\p{L}\p{N}&']*)+").expect("valid regex")
});

static MARKDOWN_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("valid regex"));

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#{1,4}\s").expect("valid regex"));

fn clean_candidate(raw: &str) -> String {
    let without_bold = raw.replace("**", "");
    let trimmed = TRAILING_DESCRIPTION_RE.replace(without_bold.trim(), "");
    LEADING_NUMBER_RE.replace(trimmed.trim(), "").trim().to_string()
}

fn looks_like_name(name: &str) -> bool {
    let len = name.chars().count();
    if !(3..50).contains(&len) || name.contains(['?', ':']) {
        return false;
    }
    let lower = name.to_lowercase();
    !ADVISORY_PREFIXES.iter().any(|p| lower.starts_with(p)) && !STRUCTURAL_RE.is_match(name)
}

/// Capitalized word runs with leading sentence words removed; at least two words remain.
fn capitalized_runs(raw: &str) -> Vec<String> {
    CAPITALIZED_RUN_RE
        .find_iter(raw)
        .filter_map(|m| {
            let words: Vec<&str> = m
                .as_str()
                .split_whitespace()
                .skip_while(|w| LEADING_STOPWORDS.contains(w))
                .collect();
            (words.len() >= 2).then(|| words.join(" "))
        })
        .collect()
}

/// Business names in `raw`: bold text and numbered-list items, or, when
/// neither yields anything, runs of capitalized words.
#[must_use]
pub fn extract_competitors(raw: &str, filter: &CompetitorFilter<'_>) -> Vec<String> {
    let structured: Vec<String> = BOLD_RE
        .captures_iter(raw)
        .chain(NUMBERED_RE.captures_iter(raw))
        .filter_map(|c| c.get(1))
        .map(|m| clean_candidate(m.as_str()))
        .filter(|n| looks_like_name(n))
        .collect();

    let candidates = if structured.is_empty() {
        capitalized_runs(raw)
            .into_iter()
            .filter(|n| looks_like_name(n))
            .collect()
    } else {
        structured
    };
    filter.collect(candidates, MAX_COMPETITORS)
}

fn strip_markdown(s: &str) -> String {
    let no_bold = s.replace("**", "");
    let no_links = MARKDOWN_LINK_RE.replace_all(&no_bold, "$1");
    HEADING_RE.replace_all(&no_links, "").into_owned()
}

fn mention_context(raw: &str, company: &str) -> Option<String> {
    let range = first_mention(raw, company)?;
    let start = floor_char_boundary(raw, range.start.saturating_sub(CONTEXT_BEFORE));
    let end = floor_char_boundary(raw, range.end + CONTEXT_AFTER);
    let mut out = String::new();
    if start > 0 {
        out.push_str("...");
    }
    out.push_str(raw[start..end].trim());
    if end < raw.len() {
        out.push_str("...");
    }
    Some(out)
}

fn leading_lines(raw: &str) -> String {
    let joined = raw
        .lines()
        .filter(|l| l.trim().chars().count() > FALLBACK_MIN_LINE_CHARS)
        .take(FALLBACK_LINES)
        .collect::<Vec<_>>()
        .join(" ");
    let mut out = truncate_chars(&joined, FALLBACK_MAX_CHARS).to_string();
    if raw.chars().count() > FALLBACK_MAX_CHARS {
        out.push_str("...");
    }
    out
}

/// Short Dutch summary of `raw` for display next to a prompt.
#[must_use]
pub fn build_snippet(raw: &str, company: &str, mentioned: bool) -> String {
    let excerpt = mentioned
        .then(|| mention_context(raw, company))
        .flatten()
        .unwrap_or_else(|| leading_lines(raw));
    let cleaned = strip_markdown(&excerpt);
    let snippet = if mentioned {
        cleaned
    } else {
        format!("Het bedrijf \"{company}\" wordt niet genoemd in dit AI-antwoord. {cleaned}")
    };
    truncate_chars(&snippet, MAX_SNIPPET_CHARS).to_string()
}

#[cfg(test)]
#[path = "heuristic_test.rs"]
mod tests;
