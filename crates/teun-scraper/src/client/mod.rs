//! Homepage fetcher: direct browser-like requests with a rendering-proxy fallback.

mod origin;

use std::time::Duration;

use reqwest::Client;

use crate::error::ScraperError;
use crate::extract::ExtractionMethod;
use crate::garbage::garbage_signal;

pub use origin::{display_domain, normalize_url, proxy_request_url, www_variant};

/// Direct responses at or below this many bytes are treated as failures.
pub const MIN_DIRECT_BODY_BYTES: usize = 500;

const DEFAULT_PROXY_BASE_URL: &str = "http://api.scraperapi.com";
const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE_NL: &str = "nl-NL,nl;q=0.9,en;q=0.8";

#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub fetch_timeout_secs: u64,
    pub proxy_timeout_secs: u64,
    pub user_agent: String,
    pub proxy_api_key: Option<String>,
}

impl FetcherConfig {
    #[must_use]
    pub fn from_app_config(config: &teun_core::AppConfig) -> Self {
        Self {
            fetch_timeout_secs: config.fetch_timeout_secs,
            proxy_timeout_secs: config.proxy_timeout_secs,
            user_agent: config.fetch_user_agent.clone(),
            proxy_api_key: config.scraper_api_key.clone(),
        }
    }
}

/// A successfully fetched homepage.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    pub html: String,
    pub method: ExtractionMethod,
}

/// Fetches company homepages.
///
/// Attempt order is the normalized URL, its `www.` variant, then the
/// rendering proxy (when a key is configured). Nothing is retried beyond
/// that sequence.
pub struct PageFetcher {
    direct: Client,
    proxy: Client,
    proxy_api_key: Option<String>,
    proxy_base_url: String,
}

impl PageFetcher {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if a `reqwest::Client` cannot be built.
    pub fn new(config: &FetcherConfig) -> Result<Self, ScraperError> {
        let direct = Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .connect_timeout(Duration::from_secs(config.fetch_timeout_secs.min(10)))
            .user_agent(&config.user_agent)
            .build()?;
        let proxy = Client::builder()
            .timeout(Duration::from_secs(config.proxy_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            direct,
            proxy,
            proxy_api_key: config.proxy_api_key.clone(),
            proxy_base_url: DEFAULT_PROXY_BASE_URL.to_string(),
        })
    }

    /// Points proxy requests at a different host. Used by tests.
    #[must_use]
    pub fn with_proxy_base_url(mut self, base_url: &str) -> Self {
        self.proxy_base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Runs the full attempt sequence for `raw_url`.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`] if `raw_url` cannot be normalized.
    /// - [`ScraperError::AllAttemptsFailed`] if every attempt failed.
    pub async fn fetch(&self, raw_url: &str) -> Result<FetchedPage, ScraperError> {
        let url = normalize_url(raw_url)?;

        let mut candidates = vec![url.clone()];
        candidates.extend(www_variant(&url));

        for candidate in &candidates {
            match self.fetch_direct(candidate).await {
                Ok(html) => {
                    tracing::debug!(url = %candidate, bytes = html.len(), "direct fetch succeeded");
                    return Ok(FetchedPage {
                        url: candidate.clone(),
                        html,
                        method: ExtractionMethod::Direct,
                    });
                }
                Err(e) => {
                    tracing::info!(url = %candidate, error = %e, "direct fetch rejected");
                }
            }
        }

        match self.fetch_via_proxy(&url).await {
            Ok(html) => {
                tracing::info!(url = %url, bytes = html.len(), "proxy fetch succeeded");
                Ok(FetchedPage {
                    url,
                    html,
                    method: ExtractionMethod::ScraperapiPremium,
                })
            }
            Err(ScraperError::ProxyUnavailable) => {
                tracing::warn!(
                    url = %url,
                    "direct fetch failed and no rendering proxy is configured"
                );
                Err(ScraperError::AllAttemptsFailed { url })
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "proxy fetch failed");
                Err(ScraperError::AllAttemptsFailed { url })
            }
        }
    }

    /// One direct GET. Succeeds only for a 2xx, non-placeholder body longer
    /// than [`MIN_DIRECT_BODY_BYTES`].
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Http`] on network failure or timeout.
    /// - [`ScraperError::UnexpectedStatus`] for a non-2xx status.
    /// - [`ScraperError::GarbagePage`] when the body is a placeholder.
    /// - [`ScraperError::TooShort`] when the body is too small to be a real page.
    pub async fn fetch_direct(&self, url: &str) -> Result<String, ScraperError> {
        let response = self
            .direct
            .get(url)
            .header(reqwest::header::ACCEPT, ACCEPT_HTML)
            .header(reqwest::header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE_NL)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let html = response.text().await?;
        if let Some(signal) = garbage_signal(&html) {
            return Err(ScraperError::GarbagePage {
                url: url.to_string(),
                signal: signal.to_string(),
            });
        }
        if html.len() <= MIN_DIRECT_BODY_BYTES {
            return Err(ScraperError::TooShort {
                url: url.to_string(),
                len: html.len(),
            });
        }
        Ok(html)
    }

    /// Fetches `url` through the rendering proxy.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::ProxyUnavailable`] when no proxy key is configured.
    /// - [`ScraperError::Http`], [`ScraperError::UnexpectedStatus`],
    ///   [`ScraperError::GarbagePage`] as for [`PageFetcher::fetch_direct`].
    pub async fn fetch_via_proxy(&self, url: &str) -> Result<String, ScraperError> {
        let Some(api_key) = self.proxy_api_key.as_deref() else {
            return Err(ScraperError::ProxyUnavailable);
        };

        let request_url = proxy_request_url(&self.proxy_base_url, api_key, url);
        let response = self.proxy.get(&request_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let html = response.text().await?;
        if let Some(signal) = garbage_signal(&html) {
            return Err(ScraperError::GarbagePage {
                url: url.to_string(),
                signal: signal.to_string(),
            });
        }
        Ok(html)
    }
}
