use serde::{Deserialize, Deserializer, Serialize};

/// Account tier of the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Free,
    Pro,
}

impl Tier {
    /// `pro` is the only paid tier; anything else (`anonymous`, unknown
    /// plans, `null`) gets the free limits.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("pro") {
            Tier::Pro
        } else {
            Tier::Free
        }
    }
}

impl<'de> Deserialize<'de> for Tier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = Option::<String>::deserialize(deserializer)?;
        Ok(name.as_deref().map_or(Tier::Free, Tier::from_name))
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Free => write!(f, "free"),
            Tier::Pro => write!(f, "pro"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierLimits {
    pub max_prompts: usize,
    pub max_volumes: usize,
}

impl Tier {
    /// Both tiers are unlimited during the beta.
    #[must_use]
    pub fn limits(self) -> TierLimits {
        match self {
            Tier::Free | Tier::Pro => TierLimits {
                max_prompts: 999,
                max_volumes: 999,
            },
        }
    }
}

/// Body of `POST /api/prompt-discovery`.
///
/// `branche` and `serviceArea` are older names for `industry` and
/// `location`; the newer name wins when both are sent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub brand_name: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub branche: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub service_area: Option<String>,
    #[serde(default)]
    pub scan_competitors: bool,
    #[serde(default)]
    pub tier: Tier,
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

impl DiscoveryRequest {
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        non_blank(self.url.as_ref())
    }

    #[must_use]
    pub fn keyword(&self) -> Option<&str> {
        non_blank(self.keyword.as_ref())
    }

    #[must_use]
    pub fn brand_name(&self) -> Option<&str> {
        non_blank(self.brand_name.as_ref())
    }

    #[must_use]
    pub fn industry(&self) -> Option<&str> {
        non_blank(self.industry.as_ref()).or_else(|| non_blank(self.branche.as_ref()))
    }

    #[must_use]
    pub fn location(&self) -> Option<&str> {
        non_blank(self.location.as_ref()).or_else(|| non_blank(self.service_area.as_ref()))
    }

    /// A run needs a URL or a keyword.
    #[must_use]
    pub fn has_input(&self) -> bool {
        self.url().is_some() || self.keyword().is_some()
    }

    /// Scanning is a pro feature and must be asked for.
    #[must_use]
    pub fn wants_scan(&self) -> bool {
        self.scan_competitors && self.tier == Tier::Pro
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_field_names_are_accepted() {
        let req: DiscoveryRequest = serde_json::from_str(
            r#"{"keyword": "linnen gordijnen", "branche": "gordijnwinkel", "serviceArea": "Amsterdam"}"#,
        )
        .unwrap();
        assert_eq!(req.industry(), Some("gordijnwinkel"));
        assert_eq!(req.location(), Some("Amsterdam"));
        assert_eq!(req.tier, Tier::Free);
        assert!(!req.wants_scan());
    }

    #[test]
    fn new_field_names_win() {
        let req: DiscoveryRequest = serde_json::from_str(
            r#"{"url": "bakkerij.nl", "industry": "bakker", "branche": "oud", "location": " ", "serviceArea": "Utrecht"}"#,
        )
        .unwrap();
        assert_eq!(req.industry(), Some("bakker"));
        assert_eq!(req.location(), Some("Utrecht"));
    }

    #[test]
    fn blank_url_and_keyword_is_no_input() {
        let req: DiscoveryRequest =
            serde_json::from_str(r#"{"url": "  ", "keyword": "", "brandName": "X"}"#).unwrap();
        assert!(!req.has_input());
    }

    #[test]
    fn scan_requires_pro() {
        let req: DiscoveryRequest =
            serde_json::from_str(r#"{"keyword": "k", "scanCompetitors": true, "tier": "pro"}"#)
                .unwrap();
        assert!(req.wants_scan());
        let req: DiscoveryRequest = serde_json::from_str(
            r#"{"keyword": "k", "scanCompetitors": true, "tier": "anonymous"}"#,
        )
        .unwrap();
        assert_eq!(req.tier, Tier::Free);
        assert!(!req.wants_scan());
    }

    #[test]
    fn unknown_tier_gets_free_limits() {
        let req: DiscoveryRequest =
            serde_json::from_str(r#"{"keyword": "linnen gordijnen", "tier": "business"}"#)
                .unwrap();
        assert_eq!(req.tier, Tier::Free);
        assert!(req.has_input());

        let req: DiscoveryRequest =
            serde_json::from_str(r#"{"keyword": "k", "tier": null}"#).unwrap();
        assert_eq!(req.tier, Tier::Free);
        assert_eq!(Tier::from_name(" PRO "), Tier::Pro);
    }
}
