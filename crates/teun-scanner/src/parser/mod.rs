//! Response Parser: raw answer text in, normalized [`ScanResult`] out.
//!
//! The mention flag and count always come from [`detect_mention`]. The
//! heuristic pass always runs; an LLM pass, when configured, may replace the
//! competitor list and snippet but never the mention fields.

pub mod heuristic;
pub mod llm;

use std::sync::Arc;

use teun_core::text::truncate_chars;
use teun_core::{detect_mention, Blocklist, CompetitorFilter, ScanResult};
use teun_llm::CompletionClient;

use crate::scanner::ScanTarget;
use heuristic::{build_snippet, extract_competitors, MAX_COMPETITORS, MAX_SNIPPET_CHARS};

/// Snippet used when there is no answer text to analyse.
pub const PARSE_FAILURE_MESSAGE: &str = "Fout bij het analyseren van de AI-respons";

#[derive(Clone)]
pub struct ResponseParser {
    blocklist: Arc<Blocklist>,
    llm: Option<Arc<dyn CompletionClient>>,
}

impl ResponseParser {
    #[must_use]
    pub fn new(blocklist: Arc<Blocklist>) -> Self {
        Self {
            blocklist,
            llm: None,
        }
    }

    /// Enables the LLM enrichment pass.
    #[must_use]
    pub fn with_llm(mut self, client: Arc<dyn CompletionClient>) -> Self {
        self.llm = Some(client);
        self
    }

    #[must_use]
    pub fn blocklist(&self) -> &Blocklist {
        &self.blocklist
    }

    /// Deterministic result from regex extraction alone.
    #[must_use]
    pub fn parse_heuristic(&self, raw: &str, target: &ScanTarget) -> ScanResult {
        let check = detect_mention(raw, &target.company, target.domain.as_deref());
        let filter = CompetitorFilter::new(&self.blocklist, &target.company);
        ScanResult {
            company_mentioned: check.mentioned,
            mentions_count: check.count,
            competitors_mentioned: extract_competitors(raw, &filter),
            simulated_ai_response_snippet: build_snippet(raw, &target.company, check.mentioned),
        }
    }

    /// Full parse. Never fails: missing text yields [`ScanResult::failed`],
    /// a failed LLM pass falls back to the heuristic result.
    pub async fn parse(&self, raw: Option<&str>, target: &ScanTarget) -> ScanResult {
        let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
            return ScanResult::failed(PARSE_FAILURE_MESSAGE);
        };
        let mut result = self.parse_heuristic(raw, target);

        let Some(client) = self.llm.as_deref() else {
            return result;
        };
        let check = teun_core::MentionCheck {
            mentioned: result.company_mentioned,
            count: result.mentions_count,
        };
        match llm::enrich(client, raw, &target.company, check, &self.blocklist).await {
            Ok(enrichment) => {
                let filter = CompetitorFilter::new(&self.blocklist, &target.company);
                result.competitors_mentioned =
                    filter.collect(&enrichment.competitors_mentioned, MAX_COMPETITORS);
                if let Some(snippet) = enrichment
                    .simulated_ai_response_snippet
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                {
                    result.simulated_ai_response_snippet =
                        truncate_chars(snippet, MAX_SNIPPET_CHARS).to_string();
                }
            }
            Err(e) => {
                tracing::warn!(
                    company = %target.company,
                    error = %e,
                    "response enrichment failed, keeping heuristic result"
                );
            }
        }
        result
    }
}
