//! Optional LLM pass that refines competitors and the snippet.

use serde::Deserialize;
use teun_core::text::truncate_chars;
use teun_core::{Blocklist, MentionCheck};
use teun_llm::{parse_json, CompletionClient, CompletionRequest, LlmError};

const ENRICH_MAX_TOKENS: u32 = 1_000;
const RAW_EXCERPT_CHARS: usize = 6_000;

const ENRICH_SYSTEM: &str = "Je analyseert antwoorden van AI-zoekassistenten voor een Nederlands \
bedrijf. Je haalt de genoemde concurrenten eruit en vat het antwoord kort samen in het Nederlands.

Concurrenten zijn concrete bedrijven of dienstverleners, bij voorkeur regionale en kleine of \
middelgrote bedrijven. Neem NOOIT op:
{blocklist}

Antwoord uitsluitend met JSON.";

/// What the model contributes; mention fields are echoed but never trusted.
#[derive(Debug, Default, Deserialize)]
pub struct Enrichment {
    #[serde(default)]
    pub company_mentioned: Option<bool>,
    #[serde(default)]
    pub mentions_count: Option<usize>,
    #[serde(default)]
    pub competitors_mentioned: Vec<String>,
    #[serde(default)]
    pub simulated_ai_response_snippet: Option<String>,
}

#[must_use]
pub fn enrich_request(
    raw: &str,
    company: &str,
    check: MentionCheck,
    blocklist: &Blocklist,
) -> CompletionRequest {
    let system = ENRICH_SYSTEM.replace("{blocklist}", &blocklist.prompt_section());
    let user = format!(
        "BEDRIJF: \"{company}\"\n\n\
VASTGESTELD (niet wijzigen, neem deze waarden letterlijk over):\n\
- company_mentioned: {mentioned}\n\
- mentions_count: {count}\n\n\
AI-ANTWOORD:\n{excerpt}\n\n\
Antwoord met dit JSON-object:\n\
{{\"company_mentioned\": {mentioned}, \"mentions_count\": {count}, \
\"competitors_mentioned\": [\"bedrijfsnaam\"], \
\"simulated_ai_response_snippet\": \"samenvatting van maximaal drie zinnen\"}}",
        mentioned = check.mentioned,
        count = check.count,
        excerpt = truncate_chars(raw, RAW_EXCERPT_CHARS),
    );
    CompletionRequest::new(system, user, ENRICH_MAX_TOKENS)
}

/// Asks the model for competitors and a summary of `raw`.
///
/// # Errors
///
/// Returns any [`LlmError`] from the call or from parsing its JSON.
pub async fn enrich(
    client: &dyn CompletionClient,
    raw: &str,
    company: &str,
    check: MentionCheck,
    blocklist: &Blocklist,
) -> Result<Enrichment, LlmError> {
    let reply = client
        .complete(&enrich_request(raw, company, check, blocklist))
        .await?;
    let enrichment: Enrichment = parse_json(&reply, "response enrichment")?;
    if enrichment.company_mentioned.is_some_and(|m| m != check.mentioned)
        || enrichment.mentions_count.is_some_and(|c| c != check.count)
    {
        tracing::debug!(
            company,
            mentioned = check.mentioned,
            count = check.count,
            "enrichment disagreed with mention check, overriding"
        );
    }
    Ok(enrichment)
}
