//! Prompt Generator: business context in, scored customer prompts out.

pub mod templates;
pub mod validate;

use serde_json::Value;
use teun_core::{
    estimate_ai_volume, DifficultyScorer, Intent, KeywordProfile, Prompt, PromptStatus,
};

use crate::client::{CompletionClient, CompletionRequest};
use crate::error::LlmError;
use crate::json::parse_json;
use validate::{validate_all, ValidPrompt};

const GENERATOR_MAX_TOKENS: u32 = 8_000;
const MIN_COMMERCIAL_PERCENT: usize = 60;
const CLUSTER_GUIDANCE: std::ops::RangeInclusive<usize> = 10..=15;

/// How many prompts to ask for and how many valid ones are acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptPolicy {
    pub target: usize,
    pub min: usize,
}

impl Default for PromptPolicy {
    fn default() -> Self {
        Self { target: 50, min: 25 }
    }
}

impl PromptPolicy {
    #[must_use]
    pub fn from_app_config(config: &teun_core::AppConfig) -> Self {
        Self {
            target: config.prompt_target,
            min: config.prompt_min,
        }
    }
}

/// What the generator knows about the business.
///
/// Website mode is used when `profile` carries keywords; otherwise the
/// manual keyword (or industry) drives the prompts.
#[derive(Debug, Clone, Default)]
pub struct GenerationInput {
    pub profile: Option<KeywordProfile>,
    pub manual_keyword: Option<String>,
    pub industry: Option<String>,
    pub location: Option<String>,
    pub brand_name: Option<String>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl GenerationInput {
    fn website_profile(&self) -> Option<&KeywordProfile> {
        self.profile.as_ref().filter(|p| !p.keywords.is_empty())
    }

    /// Location from the inferred profile, else the caller's.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        non_blank(self.website_profile().and_then(|p| p.location.as_deref()))
            .or_else(|| non_blank(self.location.as_deref()))
    }

    /// Brand name supplied by the caller, else the inferred company name.
    #[must_use]
    pub fn brand(&self) -> Option<&str> {
        non_blank(self.brand_name.as_deref())
            .or_else(|| non_blank(self.profile.as_ref().and_then(|p| p.company_name.as_deref())))
    }

    fn context_block(&self) -> Result<String, LlmError> {
        if let Some(profile) = self.website_profile() {
            return Ok(templates::website_context(
                profile,
                non_blank(self.industry.as_deref()),
                self.location(),
            ));
        }
        let keyword = non_blank(self.manual_keyword.as_deref())
            .or_else(|| non_blank(self.industry.as_deref()))
            .ok_or_else(|| LlmError::Validation {
                context: "prompt generation".to_string(),
                message: "no keywords or manual keyword supplied".to_string(),
            })?;
        Ok(templates::manual_context(
            keyword,
            non_blank(self.industry.as_deref()),
            self.location(),
        ))
    }
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum RawPromptList {
    List(Vec<Value>),
    Wrapped { prompts: Vec<Value> },
}

pub struct PromptGenerator<'a> {
    client: &'a dyn CompletionClient,
    policy: PromptPolicy,
}

impl<'a> PromptGenerator<'a> {
    #[must_use]
    pub fn new(client: &'a dyn CompletionClient, policy: PromptPolicy) -> Self {
        Self { client, policy }
    }

    /// Builds the system and user messages for `input`.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Validation`] when `input` has neither keywords nor
    /// a manual keyword.
    pub fn request(&self, input: &GenerationInput) -> Result<CompletionRequest, LlmError> {
        let context = input.context_block()?;
        let location_block = input
            .location()
            .map(|loc| templates::location_split(loc, self.policy.target))
            .unwrap_or_default();
        let brand_block = input
            .brand()
            .map(templates::brand_exclusion)
            .unwrap_or_default();
        Ok(CompletionRequest::new(
            templates::GENERATOR_SYSTEM,
            templates::generator_user_prompt(
                self.policy.target,
                &context,
                &location_block,
                &brand_block,
            ),
            GENERATOR_MAX_TOKENS,
        ))
    }

    /// Generates, validates and scores prompts.
    ///
    /// # Errors
    ///
    /// - Any [`LlmError`] from the completion call.
    /// - [`LlmError::InvalidJson`] when the reply is not a JSON array.
    /// - [`LlmError::TooFewPrompts`] when fewer than `policy.min` elements
    ///   survive validation.
    pub async fn generate(
        &self,
        input: &GenerationInput,
        scorer: &mut DifficultyScorer,
    ) -> Result<Vec<Prompt>, LlmError> {
        let request = self.request(input)?;
        let raw = self.client.complete(&request).await?;
        let elements = match parse_json::<RawPromptList>(&raw, "generated prompts")? {
            RawPromptList::List(items) | RawPromptList::Wrapped { prompts: items } => items,
        };
        let prompts = finalize(validate_all(&elements), self.policy, scorer)?;
        tracing::info!(
            received = elements.len(),
            kept = prompts.len(),
            "generated prompts"
        );
        Ok(prompts)
    }
}

/// Applies the count policy and the scoring post-pass.
///
/// # Errors
///
/// Returns [`LlmError::TooFewPrompts`] when `valid` is shorter than `policy.min`.
pub fn finalize(
    mut valid: Vec<ValidPrompt>,
    policy: PromptPolicy,
    scorer: &mut DifficultyScorer,
) -> Result<Vec<Prompt>, LlmError> {
    if valid.len() < policy.min {
        return Err(LlmError::TooFewPrompts {
            got: valid.len(),
            min: policy.min,
        });
    }
    if valid.len() > policy.target {
        tracing::debug!(got = valid.len(), target = policy.target, "truncating prompts");
        valid.truncate(policy.target);
    }

    check_guidance(&valid);

    Ok(valid
        .into_iter()
        .enumerate()
        .map(|(id, p)| {
            let estimated_ai_volume =
                estimate_ai_volume(p.estimated_google_volume, p.intent, p.trend_signal);
            Prompt {
                id,
                difficulty_score: scorer.score(p.difficulty, estimated_ai_volume),
                text: p.text,
                intent: p.intent,
                intent_cluster: p.intent_cluster,
                core_keyword: p.core_keyword,
                trend_signal: p.trend_signal,
                estimated_google_volume: p.estimated_google_volume,
                estimated_ai_volume,
                difficulty: p.difficulty,
                your_status: PromptStatus::NotScanned,
                top_competitors: Vec::new(),
                ai_mode_snippet: None,
            }
        })
        .collect())
}

/// Logs when the model ignored the cluster or intent guidance.
fn check_guidance(prompts: &[ValidPrompt]) {
    let commercial = prompts
        .iter()
        .filter(|p| p.intent == Intent::Commercial)
        .count();
    if commercial * 100 < prompts.len() * MIN_COMMERCIAL_PERCENT {
        tracing::warn!(
            commercial,
            total = prompts.len(),
            "commercial share below guidance"
        );
    }

    let clusters: std::collections::HashSet<&str> =
        prompts.iter().map(|p| p.intent_cluster.as_str()).collect();
    if !CLUSTER_GUIDANCE.contains(&clusters.len()) {
        tracing::warn!(clusters = clusters.len(), "cluster count outside guidance");
    }
}

#[cfg(test)]
#[path = "generator_test.rs"]
mod tests;
