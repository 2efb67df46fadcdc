use thiserror::Error;

use crate::engine::EngineKind;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {engine}")]
    UnexpectedStatus { engine: EngineKind, status: u16 },

    #[error("rate limited by {engine}")]
    RateLimited { engine: EngineKind },

    #[error("{engine} reported an error: {message}")]
    Api { engine: EngineKind, message: String },

    #[error("{engine} returned an empty answer")]
    EmptyAnswer { engine: EngineKind },

    #[error("failed to deserialize {engine} response: {source}")]
    Deserialize {
        engine: EngineKind,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid API key header value")]
    InvalidApiKey,

    #[error(transparent)]
    Llm(#[from] teun_llm::LlmError),
}
