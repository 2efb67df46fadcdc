use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid API key header value")]
    InvalidApiKey,

    #[error("rate limited by completion API (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("unexpected HTTP status {status} from completion API: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("completion API returned no text")]
    EmptyResponse,

    #[error("invalid JSON in {context}: {source}")]
    InvalidJson {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{context} failed validation: {message}")]
    Validation { context: String, message: String },

    #[error("only {got} usable prompts generated (minimum {min})")]
    TooFewPrompts { got: usize, min: usize },
}
