use uuid::Uuid;

const MAX_TOKEN_LEN: usize = 128;

/// Reuses a caller-supplied session token, or issues a fresh UUID v4.
///
/// Supplied tokens must be non-blank, at most 128 characters, and made of
/// ASCII alphanumerics, `-` or `_`.
#[must_use]
pub fn resolve_session_token(supplied: Option<&str>) -> String {
    supplied
        .map(str::trim)
        .filter(|t| {
            !t.is_empty()
                && t.len() <= MAX_TOKEN_LEN
                && t.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        })
        .map_or_else(|| Uuid::new_v4().to_string(), str::to_string)
}
