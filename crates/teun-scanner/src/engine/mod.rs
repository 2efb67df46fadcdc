//! AI answer engines the scanner can probe.

mod google_ai_mode;
mod perplexity;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use teun_core::{AppConfig, Blocklist};

use crate::error::ScanError;

pub use google_ai_mode::{brand_from_title, citation_result, GoogleAiModeEngine};
pub use perplexity::PerplexityEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    Perplexity,
    GoogleAiMode,
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineKind::Perplexity => write!(f, "perplexity"),
            EngineKind::GoogleAiMode => write!(f, "google_ai_mode"),
        }
    }
}

/// A source the engine cited for its answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Citation {
    pub title: String,
    pub link: String,
}

/// Free text an engine returned for one prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineAnswer {
    pub text: String,
    pub citations: Vec<Citation>,
}

/// Anything that answers a natural-language prompt.
#[async_trait]
pub trait AnswerEngine: Send + Sync {
    fn kind(&self) -> EngineKind;

    /// # Errors
    ///
    /// Returns [`ScanError`] on transport failure, a non-2xx status, an
    /// undecodable body or an empty answer.
    async fn answer(&self, prompt: &str) -> Result<EngineAnswer, ScanError>;
}

/// Builds every engine that has an API key configured, Perplexity first.
///
/// # Errors
///
/// Returns [`ScanError::Http`] if an HTTP client cannot be built.
pub fn engines_from_config(
    config: &AppConfig,
    blocklist: &Blocklist,
) -> Result<Vec<Arc<dyn AnswerEngine>>, ScanError> {
    let mut engines: Vec<Arc<dyn AnswerEngine>> = Vec::new();
    if let Some(key) = config.perplexity_api_key.as_deref() {
        engines.push(Arc::new(PerplexityEngine::new(
            key,
            config.engine_timeout_secs,
            blocklist,
        )?));
    }
    if let Some(key) = config.serpapi_key.as_deref() {
        engines.push(Arc::new(GoogleAiModeEngine::new(key, config.engine_timeout_secs)?));
    }
    Ok(engines)
}
