//! Domain types shared by every pipeline stage.
//!
//! Field names serialize in camelCase to match the JSON the discovery API
//! returns, except [`ScanResult`] which keeps the snake_case shape the
//! response parser is instructed to emit.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Commercial,
    Informational,
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Intent::Commercial => write!(f, "commercial"),
            Intent::Informational => write!(f, "informational"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendSignal {
    Rising,
    Stable,
    Declining,
}

impl std::fmt::Display for TrendSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendSignal::Rising => write!(f, "rising"),
            TrendSignal::Stable => write!(f, "stable"),
            TrendSignal::Declining => write!(f, "declining"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

/// Scan state of a single prompt. Only the mention scanner moves a prompt
/// out of `NotScanned`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptStatus {
    Found,
    NotFound,
    NotScanned,
}

/// A generated customer search prompt plus its derived metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub id: usize,
    pub text: String,
    pub intent: Intent,
    pub intent_cluster: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core_keyword: Option<String>,
    pub trend_signal: TrendSignal,
    pub estimated_google_volume: u32,
    pub estimated_ai_volume: u32,
    pub difficulty: Difficulty,
    pub difficulty_score: u8,
    pub your_status: PromptStatus,
    #[serde(default)]
    pub top_competitors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_mode_snippet: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    pub name: String,
    pub prompts: Vec<Prompt>,
    pub total_volume: u64,
    pub avg_difficulty: u32,
    pub dominant_intent: Intent,
    pub dominant_trend: TrendSignal,
    pub high_opp: usize,
}

/// Normalized outcome of probing one answer engine with one prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub company_mentioned: bool,
    pub mentions_count: usize,
    pub competitors_mentioned: Vec<String>,
    pub simulated_ai_response_snippet: String,
}

impl ScanResult {
    /// Safe default used when there is no answer text to analyse.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            company_mentioned: false,
            mentions_count: 0,
            competitors_mentioned: Vec::new(),
            simulated_ai_response_snippet: message.into(),
        }
    }
}

/// Structured fields pulled out of a company homepage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContext {
    pub title: Option<String>,
    pub meta_desc: Option<String>,
    pub h1s: Vec<String>,
    pub h2s: Vec<String>,
    pub h3s: Vec<String>,
    pub nav_items: Vec<String>,
    pub service_links: Vec<String>,
    pub body: String,
}

/// Business profile inferred from a page (or generated from a category).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordProfile {
    pub keywords: Vec<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub target_audience: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorCount {
    pub name: String,
    pub count: usize,
}
