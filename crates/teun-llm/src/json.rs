//! Turning model text into typed values.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::error::LlmError;

/// Strips surrounding whitespace and Markdown code fences.
#[must_use]
pub fn strip_code_fences(response: &str) -> &str {
    let trimmed = response.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```JSON"))
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .trim_end()
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

/// Outermost `{...}` or `[...]` span, for replies that wrap JSON in prose.
fn json_span(s: &str) -> Option<&str> {
    let start = s.find(['{', '['])?;
    let close = if s[start..].starts_with('{') { '}' } else { ']' };
    let end = s.rfind(close)?;
    (end > start).then(|| &s[start..=end])
}

/// Parses model output as `T` after fence stripping.
///
/// Falls back to the outermost JSON object or array when the model wrapped
/// the payload in prose.
///
/// # Errors
///
/// Returns [`LlmError::InvalidJson`] with `context` when neither form parses.
pub fn parse_json<T: DeserializeOwned>(raw: &str, context: &str) -> Result<T, LlmError> {
    let stripped = strip_code_fences(raw);
    match serde_json::from_str::<T>(stripped) {
        Ok(value) => Ok(value),
        Err(first_err) => {
            if let Some(span) = json_span(stripped).filter(|span| *span != stripped) {
                if let Ok(value) = serde_json::from_str::<T>(span) {
                    tracing::debug!(context, "recovered JSON payload from surrounding prose");
                    return Ok(value);
                }
            }
            Err(LlmError::InvalidJson {
                context: context.to_string(),
                source: first_err,
            })
        }
    }
}

/// Accepts either a JSON string or an array of strings.
pub(crate) fn string_or_seq<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
        Null(()),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        OneOrMany::Many(v) => v,
        OneOrMany::Null(()) => Vec::new(),
    })
}

/// Trims a string and maps blanks and `"null"` to `None`.
pub(crate) fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("null"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_and_bare_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n[1]\n```  "), "[1]");
        assert_eq!(strip_code_fences("  {}  "), "{}");
    }

    #[test]
    fn parses_fenced_payload() {
        let v: Vec<u32> = parse_json("```json\n[1, 2, 3]\n```", "numbers").unwrap();
        assert_eq!(v, vec![1, 2, 3]);
    }

    #[test]
    fn recovers_payload_wrapped_in_prose() {
        let v: serde_json::Value =
            parse_json("Hier is het resultaat:\n{\"ok\": true}\nSucces!", "wrapped").unwrap();
        assert_eq!(v["ok"], true);
    }

    #[test]
    fn reports_context_on_garbage() {
        let err = parse_json::<serde_json::Value>("geen json hier", "keyword profile").unwrap_err();
        assert!(matches!(err, LlmError::InvalidJson { ref context, .. } if context == "keyword profile"));
    }

    #[test]
    fn string_or_seq_accepts_both_shapes() {
        #[derive(Deserialize)]
        struct S {
            #[serde(deserialize_with = "string_or_seq")]
            v: Vec<String>,
        }
        let a: S = serde_json::from_str(r#"{"v": "a, b"}"#).unwrap();
        let b: S = serde_json::from_str(r#"{"v": ["a", "b"]}"#).unwrap();
        let c: S = serde_json::from_str(r#"{"v": null}"#).unwrap();
        assert_eq!(a.v, vec!["a", "b"]);
        assert_eq!(b.v, vec!["a", "b"]);
        assert!(c.v.is_empty());
    }

    #[test]
    fn clean_optional_drops_blank_and_null() {
        assert_eq!(clean_optional(Some(" Utrecht ".to_string())).as_deref(), Some("Utrecht"));
        assert_eq!(clean_optional(Some("null".to_string())), None);
        assert_eq!(clean_optional(Some("  ".to_string())), None);
        assert_eq!(clean_optional(None), None);
    }
}
