//! URL normalization for homepage fetches.

use std::net::IpAddr;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::error::ScraperError;

/// Adds `https://` when the input has no scheme and validates the result.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidUrl`] for empty input or a URL without a host.
pub fn normalize_url(raw: &str) -> Result<String, ScraperError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ScraperError::InvalidUrl {
            url: raw.to_string(),
            reason: "empty".to_string(),
        });
    }
    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };
    let parsed = reqwest::Url::parse(&with_scheme).map_err(|e| ScraperError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(ScraperError::InvalidUrl {
            url: raw.to_string(),
            reason: "missing host".to_string(),
        });
    }
    Ok(with_scheme)
}

/// The `www.` twin of a normalized URL.
///
/// `None` when the host already starts with `www.`, is an IP address, or is
/// `localhost`.
#[must_use]
pub fn www_variant(url: &str) -> Option<String> {
    let mut parsed = reqwest::Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_string();
    if host.starts_with("www.") || host == "localhost" || host.parse::<IpAddr>().is_ok() {
        return None;
    }
    parsed.set_host(Some(&format!("www.{host}"))).ok()?;
    Some(parsed.to_string())
}

/// Hostname without `www.`, used to label failed extractions.
#[must_use]
pub fn display_domain(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .map_or_else(
            || url.to_string(),
            |h| h.strip_prefix("www.").map(str::to_owned).unwrap_or(h),
        )
}

/// Rendering-proxy request for `target`, premium residential pool in NL.
#[must_use]
pub fn proxy_request_url(base_url: &str, api_key: &str, target: &str) -> String {
    format!(
        "{}/?api_key={}&url={}&render=true&premium=true&country_code=nl",
        base_url.trim_end_matches('/'),
        utf8_percent_encode(api_key, NON_ALPHANUMERIC),
        utf8_percent_encode(target, NON_ALPHANUMERIC),
    )
}
