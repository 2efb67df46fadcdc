use serde::{Deserialize, Serialize};
use teun_core::PageContext;

use crate::client::{display_domain, normalize_url, PageFetcher};
use crate::parse::parse_page;

/// How the homepage was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractionMethod {
    #[serde(rename = "direct")]
    Direct,
    #[serde(rename = "scraperapi-premium")]
    ScraperapiPremium,
    #[serde(rename = "failed")]
    Failed,
}

impl std::fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionMethod::Direct => write!(f, "direct"),
            ExtractionMethod::ScraperapiPremium => write!(f, "scraperapi-premium"),
            ExtractionMethod::Failed => write!(f, "failed"),
        }
    }
}

/// Outcome of the context-extraction stage. Never an error: a failed fetch is
/// reported through `method == Failed` and `context == None`.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Normalized URL that was requested (or the raw input if it could not be normalized).
    pub url: String,
    /// Host without `www.`.
    pub domain: String,
    pub method: ExtractionMethod,
    pub context: Option<PageContext>,
}

impl Extraction {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.context.is_some()
    }
}

/// Fetches and parses a company homepage.
pub async fn extract_context(fetcher: &PageFetcher, raw_url: &str) -> Extraction {
    let url = normalize_url(raw_url).unwrap_or_else(|_| raw_url.trim().to_string());
    let domain = display_domain(&url);

    match fetcher.fetch(raw_url).await {
        Ok(page) => {
            let context = parse_page(&page.html);
            tracing::info!(
                domain = %domain,
                method = %page.method,
                h1 = context.h1s.len(),
                nav = context.nav_items.len(),
                services = context.service_links.len(),
                body_chars = context.body.chars().count(),
                "extracted page context"
            );
            Extraction {
                url,
                domain,
                method: page.method,
                context: Some(context),
            }
        }
        Err(e) => {
            tracing::warn!(
                domain = %domain,
                error = %e,
                "context extraction failed; continuing without page data"
            );
            Extraction {
                url,
                domain,
                method: ExtractionMethod::Failed,
                context: None,
            }
        }
    }
}
