use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use teun_core::Blocklist;

use super::{AnswerEngine, EngineAnswer, EngineKind};
use crate::error::ScanError;

const PERPLEXITY_API_URL: &str = "https://api.perplexity.ai";
const MODEL: &str = "sonar-pro";
const MAX_TOKENS: u32 = 1_000;

const SYSTEM_PROMPT: &str = "Je simuleert het antwoord dat een AI-overzicht of een slimme zoekassistent \
geeft op de vraag van de gebruiker. Schrijf een beknopt antwoord in helder Nederlands.

Noem concrete bedrijven: kleine en middelgrote Nederlandse dienstverleners, regionale specialisten \
en gespecialiseerde leveranciers. Geef geen algemeen advies over hoe je een bedrijf vindt.

Noem NOOIT de volgende soorten partijen:
{blocklist}

Voorbeeld van de juiste vorm: \"Gespecialiseerde bedrijven hierin zijn onder meer Bedrijf X, \
Vakspecialist Y en Regiobedrijf Z. Zij hebben ervaring met ...\"";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Perplexity chat completions, prompted to answer like an AI overview.
pub struct PerplexityEngine {
    http: Client,
    api_key: String,
    base_url: String,
    system_prompt: String,
}

impl PerplexityEngine {
    /// # Errors
    ///
    /// Returns [`ScanError::Http`] if the underlying `reqwest::Client` cannot be built.
    pub fn new(api_key: &str, timeout_secs: u64, blocklist: &Blocklist) -> Result<Self, ScanError> {
        Self::with_base_url(api_key, timeout_secs, blocklist, PERPLEXITY_API_URL)
    }

    /// # Errors
    ///
    /// Returns [`ScanError::Http`] if the underlying `reqwest::Client` cannot be built.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        blocklist: &Blocklist,
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
            system_prompt: SYSTEM_PROMPT.replace("{blocklist}", &blocklist.prompt_section()),
        })
    }

    #[must_use]
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }
}

#[async_trait]
impl AnswerEngine for PerplexityEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Perplexity
    }

    async fn answer(&self, prompt: &str) -> Result<EngineAnswer, ScanError> {
        let engine = self.kind();
        let body = ChatRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &self.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
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
        let parsed: ChatResponse = serde_json::from_str(&raw)
            .map_err(|source| ScanError::Deserialize { engine, source })?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|t| !t.trim().is_empty())
            .ok_or(ScanError::EmptyAnswer { engine })?;

        Ok(EngineAnswer {
            text,
            citations: Vec::new(),
        })
    }
}
