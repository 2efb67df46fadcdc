use serde::{Deserialize, Serialize};
use teun_core::{Cluster, CompetitorCount, KeywordProfile, Prompt};

use crate::request::Tier;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryMeta {
    pub total_generated: usize,
    pub total_visible: usize,
    pub hidden_count: usize,
    pub max_volumes: usize,
    pub tier: Tier,
    pub scanned_on_google_ai: bool,
}

/// Business profile as inferred from the site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedSummary {
    pub keywords: Vec<String>,
    pub company_name: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub services: Vec<String>,
}

impl From<&KeywordProfile> for ExtractedSummary {
    fn from(profile: &KeywordProfile) -> Self {
        Self {
            keywords: profile.keywords.clone(),
            company_name: profile.company_name.clone(),
            category: profile.category.clone(),
            location: profile.location.clone(),
            services: profile.services.clone(),
        }
    }
}

/// Where the page context came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    pub title: Option<String>,
    pub meta_desc: Option<String>,
    pub h1: Option<String>,
    pub method: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryResponse {
    pub success: bool,
    pub prompts: Vec<Prompt>,
    pub clusters: Vec<Cluster>,
    pub top_competitors: Vec<CompetitorCount>,
    pub extracted_keywords: Vec<String>,
    pub company_name: String,
    pub session_token: String,
    pub meta: DiscoveryMeta,
    pub extracted: Option<ExtractedSummary>,
    pub source: Option<SourceInfo>,
}
