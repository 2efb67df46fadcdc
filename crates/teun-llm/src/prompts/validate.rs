//! Per-element validation of the generator's JSON array.

use serde_json::Value;
use teun_core::clusters::FALLBACK_CLUSTER;
use teun_core::scoring::DEFAULT_GOOGLE_VOLUME;
use teun_core::{Difficulty, Intent, TrendSignal};

/// A generated prompt that passed validation, before scoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidPrompt {
    pub text: String,
    pub intent: Intent,
    pub intent_cluster: String,
    pub core_keyword: Option<String>,
    pub trend_signal: TrendSignal,
    pub estimated_google_volume: u32,
    pub difficulty: Difficulty,
}

fn str_field<'a>(obj: &'a serde_json::Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn parse_intent(raw: &str) -> Option<Intent> {
    match raw.to_ascii_lowercase().as_str() {
        "commercial" => Some(Intent::Commercial),
        "informational" => Some(Intent::Informational),
        _ => None,
    }
}

fn parse_trend(raw: &str) -> Option<TrendSignal> {
    match raw.to_ascii_lowercase().as_str() {
        "rising" => Some(TrendSignal::Rising),
        "stable" => Some(TrendSignal::Stable),
        "declining" => Some(TrendSignal::Declining),
        _ => None,
    }
}

fn parse_difficulty(raw: &str) -> Option<Difficulty> {
    match raw.to_ascii_lowercase().as_str() {
        "easy" => Some(Difficulty::Easy),
        "medium" => Some(Difficulty::Medium),
        "hard" => Some(Difficulty::Hard),
        _ => None,
    }
}

/// Numbers, numeric strings and floats are accepted; anything missing,
/// non-positive or unparseable becomes the default volume.
/// Reads `"1.200"` and `"12,500"` as thousands-grouped integers; any other
/// `.` or `,` is a decimal point.
fn parse_volume_text(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let mut groups = raw.split(['.', ',']);
    let head = groups.next()?;
    let rest: Vec<&str> = groups.collect();
    let digits = |g: &str| g.chars().all(|c| c.is_ascii_digit());
    let grouped = !rest.is_empty()
        && (1..=3).contains(&head.len())
        && digits(head)
        && rest.iter().all(|g| g.len() == 3 && digits(g));
    if grouped {
        raw.replace(['.', ','], "").parse().ok()
    } else {
        raw.replace(',', ".").parse().ok()
    }
}

fn parse_volume(value: Option<&Value>) -> u32 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => parse_volume_text(s),
        _ => None,
    };
    match parsed {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Some(v) if v >= 1.0 => v.round().min(f64::from(u32::MAX)) as u32,
        _ => DEFAULT_GOOGLE_VOLUME,
    }
}

/// Validates one array element.
///
/// # Errors
///
/// Returns a short reason when a required field is missing or an enum value
/// is out of range.
pub fn validate_element(value: &Value) -> Result<ValidPrompt, String> {
    let obj = value.as_object().ok_or("element is not an object")?;

    let text = str_field(obj, "text").ok_or("missing text")?;
    let intent_raw = str_field(obj, "intent").ok_or("missing intent")?;
    let intent = parse_intent(intent_raw).ok_or_else(|| format!("unknown intent {intent_raw:?}"))?;
    let difficulty_raw = str_field(obj, "difficulty").ok_or("missing difficulty")?;
    let difficulty = parse_difficulty(difficulty_raw)
        .ok_or_else(|| format!("unknown difficulty {difficulty_raw:?}"))?;
    let trend_signal = match str_field(obj, "trendSignal") {
        Some(raw) => parse_trend(raw).ok_or_else(|| format!("unknown trendSignal {raw:?}"))?,
        None => TrendSignal::Stable,
    };

    Ok(ValidPrompt {
        text: text.to_string(),
        intent,
        intent_cluster: str_field(obj, "intentCluster")
            .unwrap_or(FALLBACK_CLUSTER)
            .to_string(),
        core_keyword: str_field(obj, "coreKeyword").map(str::to_string),
        trend_signal,
        estimated_google_volume: parse_volume(obj.get("estimatedGoogleVolume")),
        difficulty,
    })
}

/// Validates every element, dropping invalid ones and case-insensitive
/// duplicate texts.
#[must_use]
pub fn validate_all(elements: &[Value]) -> Vec<ValidPrompt> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::with_capacity(elements.len());
    for (index, element) in elements.iter().enumerate() {
        match validate_element(element) {
            Ok(prompt) => {
                if seen.insert(prompt.text.to_lowercase()) {
                    out.push(prompt);
                } else {
                    tracing::debug!(index, text = %prompt.text, "dropping duplicate prompt");
                }
            }
            Err(reason) => {
                tracing::warn!(index, reason = %reason, "dropping invalid generated prompt");
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
