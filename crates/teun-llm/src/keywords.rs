//! Keyword inference: homepage context in, customer search terms out.

use serde::Deserialize;
use teun_core::text::truncate_chars;
use teun_core::{KeywordProfile, PageContext};

use crate::client::{CompletionClient, CompletionRequest};
use crate::error::LlmError;
use crate::json::{clean_optional, parse_json, string_or_seq};

const MAX_KEYWORDS: usize = 10;
const BODY_EXCERPT_CHARS: usize = 2000;
const KEYWORD_MAX_TOKENS: u32 = 800;
const FALLBACK_MAX_TOKENS: u32 = 500;

const KEYWORD_SYSTEM: &str = "Je bent specialist in zoekwoordonderzoek voor Nederlandse bedrijfswebsites. \
Bepaal de 10 zoektermen waarmee KLANTEN dit bedrijf zouden zoeken in Google of in een AI-assistent.

Regels:
- Gebruik de woorden van de klant, geen interne of technische vaktaal.
  Goed: \"dakdekker utrecht\", \"lekkage plat dak repareren\", \"kosten nieuw dak\".
  Fout: \"EPDM-membraan\", \"webdesign\", \"SEO\" (tenzij dat echt de kerndienst is).
- Is de tekst vaag, leid dan af wat het bedrijf DOET en voor WIE.
- Antwoord uitsluitend met JSON.";

const FALLBACK_SYSTEM: &str = "Je bent specialist in zoekwoordonderzoek voor de Nederlandse markt. \
Antwoord uitsluitend met JSON.";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProfile {
    #[serde(default, deserialize_with = "string_or_seq")]
    keywords: Vec<String>,
    #[serde(default)]
    company_name: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default, deserialize_with = "string_or_seq")]
    services: Vec<String>,
    #[serde(default)]
    target_audience: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawKeywordList {
    #[serde(default, deserialize_with = "string_or_seq")]
    keywords: Vec<String>,
}

fn or_geen(items: &[String]) -> String {
    if items.is_empty() {
        "Geen".to_string()
    } else {
        items.join(" | ")
    }
}

/// Builds the user message listing every extracted page field.
#[must_use]
pub fn keyword_user_prompt(ctx: &PageContext) -> String {
    format!(
        "Analyseer deze homepage en geef de 10 zoektermen die klanten van dit bedrijf gebruiken.\n\n\
TITEL: {title}\n\
META: {meta}\n\
H1: {h1}\n\
H2: {h2}\n\
H3: {h3}\n\
NAV: {nav}\n\
DIENSTEN: {services}\n\
CONTENT: {body}\n\n\
Antwoord met dit JSON-object:\n\
{{\"keywords\": [\"term1\", \"...\", \"term10\"], \"companyName\": \"naam\", \"category\": \"branche\", \
\"location\": \"plaats of null\", \"services\": [\"dienst1\", \"dienst2\"], \"targetAudience\": \"doelgroep\"}}",
        title = ctx.title.as_deref().unwrap_or("Geen"),
        meta = ctx.meta_desc.as_deref().unwrap_or("Geen"),
        h1 = or_geen(&ctx.h1s),
        h2 = or_geen(&ctx.h2s),
        h3 = or_geen(&ctx.h3s),
        nav = or_geen(&ctx.nav_items),
        services = or_geen(&ctx.service_links),
        body = truncate_chars(&ctx.body, BODY_EXCERPT_CHARS),
    )
}

/// Trims, drops blanks and case-insensitive duplicates, keeps the first ten.
fn clean_keywords(raw: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for kw in raw {
        let kw = kw.trim().to_string();
        if kw.is_empty() || out.iter().any(|k| k.eq_ignore_ascii_case(&kw)) {
            continue;
        }
        out.push(kw);
        if out.len() == MAX_KEYWORDS {
            break;
        }
    }
    out
}

/// Infers a [`KeywordProfile`] from an extracted homepage.
///
/// # Errors
///
/// - Any [`LlmError`] from the completion call.
/// - [`LlmError::InvalidJson`] if the reply is not a JSON object.
/// - [`LlmError::Validation`] if the reply contains no keywords.
pub async fn infer_keywords(
    client: &dyn CompletionClient,
    ctx: &PageContext,
) -> Result<KeywordProfile, LlmError> {
    let request =
        CompletionRequest::new(KEYWORD_SYSTEM, keyword_user_prompt(ctx), KEYWORD_MAX_TOKENS);
    let raw = client.complete(&request).await?;
    let parsed: RawProfile = parse_json(&raw, "keyword profile")?;

    let keywords = clean_keywords(parsed.keywords);
    if keywords.is_empty() {
        return Err(LlmError::Validation {
            context: "keyword profile".to_string(),
            message: "no keywords returned".to_string(),
        });
    }

    let profile = KeywordProfile {
        keywords,
        company_name: clean_optional(parsed.company_name),
        category: clean_optional(parsed.category),
        location: clean_optional(parsed.location),
        services: parsed
            .services
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        target_audience: clean_optional(parsed.target_audience),
    };
    tracing::info!(
        keywords = profile.keywords.len(),
        company = profile.company_name.as_deref().unwrap_or("-"),
        "inferred keyword profile"
    );
    Ok(profile)
}

/// Generates customer search terms for a category when the site could not be read.
///
/// # Errors
///
/// Same as [`infer_keywords`].
pub async fn fallback_keywords(
    client: &dyn CompletionClient,
    category: &str,
    location: Option<&str>,
) -> Result<Vec<String>, LlmError> {
    let place = location
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map_or_else(String::new, |l| format!(" in {l}"));
    let user = format!(
        "Geef de 10 zoektermen die klanten het vaakst gebruiken bij het zoeken naar een {category}{place}. \
Mix algemene termen, specifieke diensten en termen met een plaatsnaam.\n\n\
Antwoord met: {{\"keywords\": [\"term1\", \"...\", \"term10\"]}}"
    );
    let raw = client
        .complete(&CompletionRequest::new(FALLBACK_SYSTEM, user, FALLBACK_MAX_TOKENS))
        .await?;
    let parsed: RawKeywordList = parse_json(&raw, "fallback keywords")?;
    let keywords = clean_keywords(parsed.keywords);
    if keywords.is_empty() {
        return Err(LlmError::Validation {
            context: "fallback keywords".to_string(),
            message: "no keywords returned".to_string(),
        });
    }
    Ok(keywords)
}
