use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use teun_core::mention::host_of;
use teun_core::text::truncate_chars;
use teun_core::{detect_mention, CompetitorFilter, ScanResult};

use super::{AnswerEngine, Citation, EngineAnswer, EngineKind};
use crate::error::ScanError;
use crate::scanner::ScanTarget;

const SERPAPI_URL: &str = "https://serpapi.com";
const MAX_CITATION_COMPETITORS: usize = 8;
const SNIPPET_CHARS: usize = 300;
const TITLE_SEPARATORS: [&str; 3] = [" - ", " | ", " · "];

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    ai_mode_response: Option<AiModeResponse>,
}

#[derive(Debug, Default, Deserialize)]
struct AiModeResponse {
    #[serde(default)]
    text_blocks: Vec<TextBlock>,
    #[serde(default)]
    citations: Vec<RawCitation>,
}

#[derive(Debug, Deserialize)]
struct TextBlock {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCitation {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    link: Option<String>,
}

/// Google AI Mode answers fetched through SerpAPI.
pub struct GoogleAiModeEngine {
    http: Client,
    api_key: String,
    base_url: String,
}

impl GoogleAiModeEngine {
    /// # Errors
    ///
    /// Returns [`ScanError::Http`] if the underlying `reqwest::Client` cannot be built.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, ScanError> {
        Self::with_base_url(api_key, timeout_secs, SERPAPI_URL)
    }

    /// # Errors
    ///
    /// Returns [`ScanError::Http`] if the underlying `reqwest::Client` cannot be built.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ScanError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            http,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl AnswerEngine for GoogleAiModeEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::GoogleAiMode
    }

    async fn answer(&self, prompt: &str) -> Result<EngineAnswer, ScanError> {
        let engine = self.kind();
        let response = self
            .http
            .get(format!("{}/search.json", self.base_url))
            .query(&[
                ("engine", "google_ai_mode"),
                ("q", prompt),
                ("hl", "nl"),
                ("gl", "nl"),
                ("api_key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ScanError::RateLimited { engine });
        }
        if !status.is_success() {
            return Err(ScanError::UnexpectedStatus {
                engine,
                status: status.as_u16(),
            });
        }

        let raw = response.text().await?;
        let parsed: SearchResponse = serde_json::from_str(&raw)
            .map_err(|source| ScanError::Deserialize { engine, source })?;
        if let Some(message) = parsed.error {
            return Err(ScanError::Api { engine, message });
        }

        let ai = parsed.ai_mode_response.unwrap_or_default();
        let text = ai
            .text_blocks
            .into_iter()
            .map(|b| b.text.or(b.snippet).unwrap_or_default())
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string();
        let citations: Vec<Citation> = ai
            .citations
            .into_iter()
            .map(|c| Citation {
                title: c.title.unwrap_or_default(),
                link: c.link.unwrap_or_default(),
            })
            .collect();

        if text.is_empty() && citations.is_empty() {
            return Err(ScanError::EmptyAnswer { engine });
        }
        Ok(EngineAnswer { text, citations })
    }
}

/// Brand part of a citation title: the text before the first separator.
///
/// Titles of 2 characters or fewer, or 80 and more, yield nothing.
#[must_use]
pub fn brand_from_title(title: &str) -> Option<&str> {
    let len = title.chars().count();
    if len <= 2 || len >= 80 {
        return None;
    }
    let brand = TITLE_SEPARATORS
        .iter()
        .fold(title, |acc, sep| acc.split(sep).next().unwrap_or(acc))
        .trim();
    (brand.chars().count() > 1).then_some(brand)
}

fn bare_host(url: &str) -> Option<String> {
    host_of(url).map(|h| h.strip_prefix("www.").map(str::to_string).unwrap_or(h))
}

/// Interprets a Google AI Mode answer: competitors come from citation
/// titles, the company counts as mentioned when any of its name variants is
/// in the text or one of the cited pages is on its own domain.
#[must_use]
pub fn citation_result(
    answer: &EngineAnswer,
    target: &ScanTarget,
    filter: &CompetitorFilter<'_>,
) -> ScanResult {
    let competitors = filter.collect(
        answer
            .citations
            .iter()
            .filter_map(|c| brand_from_title(&c.title)),
        MAX_CITATION_COMPETITORS,
    );

    let check = detect_mention(&answer.text, &target.company, target.domain.as_deref());
    let own_host = target.domain.as_deref().and_then(bare_host);
    let cited = own_host.is_some_and(|own| {
        answer
            .citations
            .iter()
            .filter_map(|c| bare_host(&c.link))
            .any(|h| h == own)
    });

    ScanResult {
        company_mentioned: check.mentioned || cited,
        mentions_count: check.count,
        competitors_mentioned: competitors,
        simulated_ai_response_snippet: truncate_chars(&answer.text, SNIPPET_CHARS).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use teun_core::Blocklist;

    use super::*;

    fn citation(title: &str, link: &str) -> Citation {
        Citation {
            title: title.to_string(),
            link: link.to_string(),
        }
    }

    fn target() -> ScanTarget {
        ScanTarget {
            company: "Gordijnenhuis Amsterdam".to_string(),
            domain: Some("https://www.gordijnenhuis.nl".to_string()),
        }
    }

    #[test]
    fn brand_takes_first_segment() {
        assert_eq!(
            brand_from_title("Raamdecoratie De Jong - Linnen gordijnen | Amsterdam"),
            Some("Raamdecoratie De Jong")
        );
        assert_eq!(brand_from_title("Stoffenhuis | Gordijnen op maat"), Some("Stoffenhuis"));
        assert_eq!(brand_from_title("Vtwonen · Inspiratie"), Some("Vtwonen"));
        assert_eq!(brand_from_title("ab"), None);
        assert_eq!(brand_from_title(&"x".repeat(80)), None);
        assert_eq!(brand_from_title("a - lange titel"), None);
    }

    #[test]
    fn competitors_from_citations_are_filtered() {
        let blocklist = Blocklist::builtin();
        let t = target();
        let filter = CompetitorFilter::new(&blocklist, &t.company);
        let answer = EngineAnswer {
            text: "Voor linnen gordijnen kun je terecht bij Raamdecoratie De Jong.".to_string(),
            citations: vec![
                citation("Raamdecoratie De Jong - Linnen gordijnen", "https://dejong.nl"),
                citation("YouTube - Gordijnen ophangen", "https://youtube.com/x"),
                citation("Raamdecoratie De Jong | Contact", "https://dejong.nl/contact"),
                citation("Gordijnenhuis Amsterdam - Home", "https://example.org"),
            ],
        };
        let result = citation_result(&answer, &t, &filter);
        assert_eq!(result.competitors_mentioned, vec!["Raamdecoratie De Jong"]);
        assert!(!result.company_mentioned);
        assert_eq!(result.mentions_count, 0);
    }

    #[test]
    fn own_domain_citation_counts_as_mention() {
        let blocklist = Blocklist::builtin();
        let t = target();
        let filter = CompetitorFilter::new(&blocklist, &t.company);
        let answer = EngineAnswer {
            text: "Er zijn diverse winkels.".to_string(),
            citations: vec![citation("Home", "https://gordijnenhuis.nl/linnen")],
        };
        let result = citation_result(&answer, &t, &filter);
        assert!(result.company_mentioned);
        assert_eq!(result.mentions_count, 0);
    }

    #[test]
    fn text_mention_is_case_insensitive_and_snippet_capped() {
        let blocklist = Blocklist::builtin();
        let t = target();
        let filter = CompetitorFilter::new(&blocklist, &t.company);
        let answer = EngineAnswer {
            text: format!("GORDIJNENHUIS AMSTERDAM is een aanrader. {}", "x".repeat(400)),
            citations: vec![],
        };
        let result = citation_result(&answer, &t, &filter);
        assert!(result.company_mentioned);
        assert_eq!(result.mentions_count, 1);
        assert_eq!(result.simulated_ai_response_snippet.chars().count(), 300);
    }

    #[test]
    fn name_variants_count_as_mention_like_other_engines() {
        let blocklist = Blocklist::builtin();
        let t = target();
        let filter = CompetitorFilter::new(&blocklist, &t.company);
        for text in [
            "Kijk eens bij GordijnenhuisAmsterdam voor linnen.",
            "Gordijnenhuis heeft een ruime collectie.",
        ] {
            let answer = EngineAnswer {
                text: text.to_string(),
                citations: vec![],
            };
            let result = citation_result(&answer, &t, &filter);
            assert!(result.company_mentioned, "{text}");
            assert_eq!(result.mentions_count, 0, "{text}");
        }
    }
}
